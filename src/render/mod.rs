pub(crate) mod pass;
pub(crate) mod xml;
