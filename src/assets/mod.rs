pub(crate) mod cache;
pub(crate) mod context;
pub(crate) mod image;
pub(crate) mod latex;
