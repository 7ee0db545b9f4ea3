pub(crate) mod highlight;
pub(crate) mod metrics;
pub(crate) mod parse;
pub(crate) mod style;
