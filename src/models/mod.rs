pub mod status;
pub mod tryon;
