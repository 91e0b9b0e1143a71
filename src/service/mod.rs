// src/service/mod.rs
pub mod config_service;
pub mod scheduler;

pub use config_service::ConfigService;
pub use scheduler::{ClockScheduler, TickOutcome};
