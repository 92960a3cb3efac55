pub(crate) mod backdrop;
pub(crate) mod host;
pub(crate) mod momentum;
pub(crate) mod scheduler;
pub(crate) mod scroll;
pub(crate) mod stats;
