pub mod report;
#[cfg(feature = "cli")]
pub mod runner;
