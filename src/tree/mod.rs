pub(crate) mod boxlike;
pub(crate) mod slide;
