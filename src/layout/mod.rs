pub(crate) mod lazy;
pub(crate) mod node;
pub(crate) mod value;
