// src/codec/mod.rs
pub mod ppm;

pub use ppm::Bitmap;
