pub mod analysis;
pub mod calendar;
pub mod config;
pub mod core;
pub mod error;
pub mod fetcher;
pub mod indicators;
pub mod models;

pub use crate::config::AppConfig;
pub use crate::core::orchestrator::IndicatorService;
pub use crate::error::{DashboardError, Result};
