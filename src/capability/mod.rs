pub(crate) mod classifier;
pub(crate) mod probe;
