//! Trajectory generation for ODE systems.
//!
//! Provides:
//! - `OdeModel` trait for pluggable derivative functions
//! - Lorenz system model
//! - Adaptive Dormand-Prince RK45 integrator with dense output
//! - Fixed-step forward Euler and RK4 integrators
//! - Run dispatcher selecting an integrator at runtime

pub mod error;
pub mod integrator;
pub mod lorenz;
pub mod model;
pub mod rk45;
pub mod sim;
pub mod trajectory;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use integrator::{FixedStep, ForwardEuler, Integrator, RK4};
pub use lorenz::{LorenzParams, LorenzSystem, State};
pub use model::{FnModel, OdeModel};
pub use rk45::Rk45;
pub use sim::{IntegratorType, SimOptions, run_sim};
pub use trajectory::{SolveStats, Trajectory};
