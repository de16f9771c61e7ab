pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::HttpBmiApi;
pub use crate::config::TrackerConfig;
pub use crate::core::engine::{classify, compute_bmi};
pub use crate::core::tracker::BmiTracker;
pub use crate::utils::error::{Result, TrackerError};
