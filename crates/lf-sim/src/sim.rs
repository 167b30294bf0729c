//! Simulation runner: integrator selection and dispatch.

use std::fmt;

use lf_core::{TimeGrid, Tolerances};
use nalgebra::SVector;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SimResult;
use crate::integrator::{ForwardEuler, Integrator, RK4};
use crate::model::OdeModel;
use crate::rk45::Rk45;
use crate::trajectory::Trajectory;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorType {
    /// Adaptive Dormand-Prince 5(4) (default, most accurate).
    #[default]
    Rk45,
    /// Forward Euler (1st-order, 1 rhs call per step).
    Euler,
    /// Fixed-step 4th-order Runge-Kutta (4 rhs calls per step).
    Rk4,
}

impl fmt::Display for IntegratorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntegratorType::Rk45 => "rk45",
            IntegratorType::Euler => "euler",
            IntegratorType::Rk4 => "rk4",
        };
        f.write_str(name)
    }
}

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    /// Integrator type (default: RK45)
    pub integrator: IntegratorType,
    /// Adaptive error budget (ignored by fixed-step integrators)
    pub tol: Tolerances,
    /// Adaptive step limit (safety)
    pub max_steps: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        let rk45 = Rk45::default();
        Self {
            integrator: IntegratorType::default(),
            tol: rk45.tol,
            max_steps: rk45.max_steps,
        }
    }
}

/// Integrate `model` from `y0` over `grid` with the selected integrator.
pub fn run_sim<const N: usize, M: OdeModel<N>>(
    model: &M,
    y0: &SVector<f64, N>,
    grid: &TimeGrid,
    opts: &SimOptions,
) -> SimResult<Trajectory<N>> {
    info!(
        integrator = %opts.integrator,
        samples = grid.len(),
        t_start = grid.start(),
        t_end = grid.end(),
        "integration started"
    );

    let trajectory = match opts.integrator {
        IntegratorType::Rk45 => {
            let integrator = Rk45 {
                tol: opts.tol,
                max_steps: opts.max_steps,
                ..Rk45::default()
            };
            integrator.integrate(model, y0, grid)?
        }
        IntegratorType::Euler => ForwardEuler.integrate(model, y0, grid)?,
        IntegratorType::Rk4 => RK4.integrate(model, y0, grid)?,
    };

    info!(
        rhs_calls = trajectory.stats.rhs_calls,
        accepted = trajectory.stats.accepted_steps,
        rejected = trajectory.stats.rejected_steps,
        "integration finished"
    );
    Ok(trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.integrator, IntegratorType::Rk45);
        assert_eq!(opts.tol.rel, 1e-3);
        assert_eq!(opts.tol.abs, 1e-6);
        assert_eq!(opts.max_steps, 1_000_000);
    }

    #[test]
    fn integrator_names() {
        assert_eq!(IntegratorType::Rk45.to_string(), "rk45");
        assert_eq!(IntegratorType::Euler.to_string(), "euler");
        assert_eq!(IntegratorType::Rk4.to_string(), "rk4");
    }
}
