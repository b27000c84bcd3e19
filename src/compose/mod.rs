pub(crate) mod compositor;
pub(crate) mod dimensions;
pub(crate) mod schedule;
pub(crate) mod tint;
