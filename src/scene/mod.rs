pub(crate) mod blob;
pub(crate) mod outlines;
pub(crate) mod per_item;
