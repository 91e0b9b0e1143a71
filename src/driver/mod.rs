// src/driver/mod.rs
pub mod display;
pub mod network;
pub mod signal;
pub mod storage;
pub mod time_source;
