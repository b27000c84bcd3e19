pub(crate) mod decode;
pub(crate) mod pixel_source;
pub(crate) mod store;
