//! Integrators: the common `Integrator` capability and fixed-step schemes.

use lf_core::TimeGrid;
use nalgebra::SVector;

use crate::error::SimResult;
use crate::model::OdeModel;
use crate::trajectory::{SolveStats, Trajectory};

/// Produces a trajectory of `model` from `y0`, one state per grid sample.
pub trait Integrator {
    fn integrate<const N: usize, M: OdeModel<N>>(
        &self,
        model: &M,
        y0: &SVector<f64, N>,
        grid: &TimeGrid,
    ) -> SimResult<Trajectory<N>>;
}

/// Single-step scheme advancing the state from one grid sample to the next.
pub trait FixedStep {
    /// Derivative evaluations per step.
    const STAGES: usize;

    /// Advance state `x` from `t` to `t_next`.
    fn step<const N: usize, M: OdeModel<N>>(
        &self,
        model: &M,
        t: f64,
        t_next: f64,
        x: &SVector<f64, N>,
    ) -> SimResult<SVector<f64, N>>;
}

/// Drive a fixed-step scheme over consecutive grid samples.
///
/// The running state is carried as an accumulator; sample 0 is `y0` as given.
fn integrate_fixed<S: FixedStep, const N: usize, M: OdeModel<N>>(
    stepper: &S,
    model: &M,
    y0: &SVector<f64, N>,
    grid: &TimeGrid,
) -> SimResult<Trajectory<N>> {
    let times = grid.as_slice();
    let mut states = Vec::with_capacity(times.len());
    let mut x = *y0;
    states.push(x);

    for w in times.windows(2) {
        x = stepper.step(model, w[0], w[1], &x)?;
        states.push(x);
    }

    let steps = times.len() - 1;
    Ok(Trajectory {
        t: times.to_vec(),
        x: states,
        stats: SolveStats {
            rhs_calls: steps * S::STAGES,
            accepted_steps: steps,
            rejected_steps: 0,
        },
    })
}

/// Forward Euler (explicit, 1st order).
///
/// `x[i+1] = x[i] + (t[i+1] - t[i]) * f(t[i+1], x[i])`, one rhs call per step.
/// The derivative is sampled at the step's end time with the start state.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl FixedStep for ForwardEuler {
    const STAGES: usize = 1;

    fn step<const N: usize, M: OdeModel<N>>(
        &self,
        model: &M,
        t: f64,
        t_next: f64,
        x: &SVector<f64, N>,
    ) -> SimResult<SVector<f64, N>> {
        let dt = t_next - t;
        let xdot = model.rhs(t_next, x)?;
        Ok(x + xdot * dt)
    }
}

impl Integrator for ForwardEuler {
    fn integrate<const N: usize, M: OdeModel<N>>(
        &self,
        model: &M,
        y0: &SVector<f64, N>,
        grid: &TimeGrid,
    ) -> SimResult<Trajectory<N>> {
        integrate_fixed(self, model, y0, grid)
    }
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Copy, Debug, Default)]
pub struct RK4;

impl FixedStep for RK4 {
    const STAGES: usize = 4;

    fn step<const N: usize, M: OdeModel<N>>(
        &self,
        model: &M,
        t: f64,
        t_next: f64,
        x: &SVector<f64, N>,
    ) -> SimResult<SVector<f64, N>> {
        let dt = t_next - t;
        let k1 = model.rhs(t, x)?;
        let k2 = model.rhs(t + 0.5 * dt, &(x + k1 * (0.5 * dt)))?;
        let k3 = model.rhs(t + 0.5 * dt, &(x + k2 * (0.5 * dt)))?;
        let k4 = model.rhs(t_next, &(x + k3 * dt))?;

        // x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        Ok(x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0))
    }
}

impl Integrator for RK4 {
    fn integrate<const N: usize, M: OdeModel<N>>(
        &self,
        model: &M,
        y0: &SVector<f64, N>,
        grid: &TimeGrid,
    ) -> SimResult<Trajectory<N>> {
        integrate_fixed(self, model, y0, grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lorenz::{LorenzSystem, State};
    use crate::model::FnModel;
    use nalgebra::Vector1;

    #[test]
    fn euler_single_step_is_exact() {
        let lorenz = LorenzSystem::default();
        let y0 = State::new(1.0, 1.0, 1.0);
        let grid = TimeGrid::from_samples(vec![0.0, 0.01]).unwrap();

        let traj = ForwardEuler.integrate(&lorenz, &y0, &grid).unwrap();

        assert_eq!(traj.len(), 2);
        assert_eq!(traj.x[0], y0);
        assert_eq!(traj.x[1], y0 + lorenz.derivative(&y0) * 0.01);
    }

    #[test]
    fn euler_samples_derivative_at_step_end() {
        // dx/dt = t: the end-time sample gives x1 = dt * t1
        let model = FnModel(|t: f64, _x: &Vector1<f64>| Vector1::new(t));
        let grid = TimeGrid::from_samples(vec![0.0, 0.5]).unwrap();
        let traj = ForwardEuler
            .integrate(&model, &Vector1::new(0.0), &grid)
            .unwrap();
        assert_eq!(traj.x[1][0], 0.25);
    }

    #[test]
    fn fixed_step_stats_count_rhs_calls() {
        let lorenz = LorenzSystem::default();
        let grid = TimeGrid::linspace(0.0, 1.0, 101).unwrap();
        let y0 = State::new(1.0, 1.0, 1.0);

        let euler = ForwardEuler.integrate(&lorenz, &y0, &grid).unwrap();
        assert_eq!(euler.stats.rhs_calls, 100);
        assert_eq!(euler.stats.accepted_steps, 100);

        let rk4 = RK4.integrate(&lorenz, &y0, &grid).unwrap();
        assert_eq!(rk4.stats.rhs_calls, 400);
    }

    #[test]
    fn rk4_exponential_decay() {
        let model = FnModel(|_t: f64, x: &Vector1<f64>| -x);
        let grid = TimeGrid::linspace(0.0, 1.0, 101).unwrap();
        let traj = RK4.integrate(&model, &Vector1::new(1.0), &grid).unwrap();
        let end = traj.last().unwrap()[0];
        assert!((end - (-1.0_f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn single_sample_grid_returns_initial_state() {
        let lorenz = LorenzSystem::default();
        let grid = TimeGrid::linspace(0.0, 40.0, 1).unwrap();
        let y0 = State::new(1.0, 1.0, 1.0);
        let traj = ForwardEuler.integrate(&lorenz, &y0, &grid).unwrap();
        assert_eq!(traj.x, vec![y0]);
        assert_eq!(traj.stats.rhs_calls, 0);
    }
}
