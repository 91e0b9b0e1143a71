// src/render/mod.rs
mod composer;

pub use composer::{Composer, Layout, Slot};
