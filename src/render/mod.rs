pub(crate) mod blur;
pub(crate) mod cache;
pub(crate) mod dirty;
pub(crate) mod display;
pub(crate) mod draw;
pub(crate) mod gradient;
pub(crate) mod surface;
