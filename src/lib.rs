pub mod camera;
pub mod charge;
pub mod config;
pub mod cursor;
pub mod encoder;
pub mod error;
pub mod field;
pub mod frame;
pub mod input;
pub mod mesh;
pub mod view;
