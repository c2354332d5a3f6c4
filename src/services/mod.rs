pub mod fal;
pub mod images;
pub mod tryon;
