//! Trajectory generation service.

use std::time::Instant;

use lf_sim::{IntegratorType, LorenzSystem, SimOptions, Trajectory, run_sim};
use tracing::info;

use crate::config::RunConfig;
use crate::error::AppResult;

/// Outcome of one integration run.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub method: IntegratorType,
    pub trajectory: Trajectory<3>,
    pub elapsed_s: f64,
}

impl RunResponse {
    pub fn title(&self) -> String {
        format!("Lorenz Attractor ({})", self.method.to_string().to_uppercase())
    }
}

/// Validate `config` and integrate the Lorenz system it describes.
pub fn run_lorenz(config: &RunConfig) -> AppResult<RunResponse> {
    run_with(config, config.sim_options())
}

fn run_with(config: &RunConfig, opts: SimOptions) -> AppResult<RunResponse> {
    config.validate()?;
    let model = LorenzSystem::new(config.params);
    let y0 = config.initial_state()?;
    let grid = config.time_grid()?;

    let start = Instant::now();
    let trajectory = run_sim(&model, &y0, &grid, &opts)?;
    let elapsed_s = start.elapsed().as_secs_f64();

    info!(method = %opts.integrator, elapsed_s, "lorenz run complete");
    Ok(RunResponse {
        method: opts.integrator,
        trajectory,
        elapsed_s,
    })
}

/// Two integrators over the same configuration and grid.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub reference: RunResponse,
    pub candidate: RunResponse,
    /// Largest distance between states at the same sample
    pub max_deviation: f64,
    /// Distance between the first samples
    pub initial_deviation: f64,
}

pub fn compare_methods(
    config: &RunConfig,
    reference: IntegratorType,
    candidate: IntegratorType,
) -> AppResult<Comparison> {
    let base = config.sim_options();
    let reference = run_with(
        config,
        SimOptions {
            integrator: reference,
            ..base.clone()
        },
    )?;
    let candidate = run_with(
        config,
        SimOptions {
            integrator: candidate,
            ..base
        },
    )?;

    let max_deviation = reference.trajectory.max_deviation(&candidate.trajectory)?;
    // Validated grids hold at least one sample
    let initial_deviation = (reference.trajectory.x[0] - candidate.trajectory.x[0]).norm();

    Ok(Comparison {
        reference,
        candidate,
        max_deviation,
        initial_deviation,
    })
}
