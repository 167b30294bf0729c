//! Shared application service layer for lorenzflow.
//!
//! This crate provides a unified interface for both CLI and GUI frontends:
//! run configuration, trajectory generation, the sine-cosine curve, and
//! the plotting boundary.

pub mod config;
pub mod curve;
pub mod error;
pub mod plot;
pub mod run_service;

// Re-export key types for convenience
pub use config::{RunConfig, load_config};
pub use curve::{Curve, default_curve, sine_cosine_curve};
pub use error::{AppError, AppResult};
pub use plot::{
    CsvSink, JsonSink, PlotFormat, PlotSink, RecordingSink, plot_curve, plot_trajectory,
};
pub use run_service::{Comparison, RunResponse, compare_methods, run_lorenz};
