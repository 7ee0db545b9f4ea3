pub(crate) mod arrow;
pub(crate) mod command;
pub(crate) mod paint;
pub(crate) mod path;
pub(crate) mod text;
