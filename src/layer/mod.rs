pub(crate) mod model;
pub(crate) mod token;
pub(crate) mod validate;
