//! Default values for project configuration settings.

pub const ACCESS: &str = "public";
pub const TRANSFORM_SPEC: &str = "pass";
pub const DOC_BATCH_SIZE: usize = 32;
