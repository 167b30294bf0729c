//! lf-core: stable foundation for lorenzflow.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - grid (evenly spaced time grids)
//! - error (shared error types)

pub mod error;
pub mod grid;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{LfError, LfResult};
pub use grid::TimeGrid;
pub use numeric::*;
