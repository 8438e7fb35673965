pub mod camera;
pub mod display;
pub mod field;
