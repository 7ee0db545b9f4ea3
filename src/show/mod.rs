pub(crate) mod info;
