//! Adaptive Dormand-Prince 5(4) integrator with dense output.
//!
//! Step-size control mirrors the usual explicit RK45 setup: an embedded
//! 4th-order solution estimates the local error, the step is accepted when
//! the scaled RMS error is below one, and the next step is scaled by
//! `0.9 * err^(-1/5)` clamped to `[0.2, 10]`. Internal steps are independent
//! of the requested grid; grid samples are filled from the 4th-order
//! continuous extension of the step that covers them.

use lf_core::{TimeGrid, Tolerances, rms_norm};
use nalgebra::SVector;
use tracing::{debug, trace};

use crate::error::{SimError, SimResult};
use crate::integrator::Integrator;
use crate::model::OdeModel;
use crate::trajectory::{SolveStats, Trajectory};

const STAGES: usize = 6;

const C: [f64; STAGES] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0];

const A: [[f64; 5]; STAGES] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
    ],
];

const B: [f64; STAGES] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];

// 5th minus 4th order weights; the last entry applies to f(t_new, y_new).
const E: [f64; STAGES + 1] = [
    -71.0 / 57600.0,
    0.0,
    71.0 / 16695.0,
    -71.0 / 1920.0,
    17253.0 / 339200.0,
    -22.0 / 525.0,
    1.0 / 40.0,
];

// Continuous extension: y(t_old + x*h) = y_old + h * sum_j k_j * sum_c P[j][c] * x^(c+1)
const P: [[f64; 4]; STAGES + 1] = [
    [
        1.0,
        -8048581381.0 / 2820520608.0,
        8663915743.0 / 2820520608.0,
        -12715105075.0 / 11282082432.0,
    ],
    [0.0, 0.0, 0.0, 0.0],
    [
        0.0,
        131558114200.0 / 32700410799.0,
        -68118460800.0 / 10900136933.0,
        87487479700.0 / 32700410799.0,
    ],
    [
        0.0,
        -1754552775.0 / 470086768.0,
        14199869525.0 / 1410260304.0,
        -10690763975.0 / 1880347072.0,
    ],
    [
        0.0,
        127303824393.0 / 49829197408.0,
        -318862633887.0 / 49829197408.0,
        701980252875.0 / 199316789632.0,
    ],
    [
        0.0,
        -282668133.0 / 205662961.0,
        2019193451.0 / 616988883.0,
        -1453857185.0 / 822651844.0,
    ],
    [
        0.0,
        40617522.0 / 29380423.0,
        -110615467.0 / 29380423.0,
        69997945.0 / 29380423.0,
    ],
];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
/// -1 / (error estimator order + 1)
const ERROR_EXPONENT: f64 = -1.0 / 5.0;

/// Adaptive Dormand-Prince RK45.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rk45 {
    /// Error budget: `abs` is atol, `rel` is rtol
    pub tol: Tolerances,
    /// Upper bound on the internal step size
    pub max_step: f64,
    /// Initial step; chosen automatically when `None`
    pub first_step: Option<f64>,
    /// Accepted step limit (safety)
    pub max_steps: usize,
}

impl Default for Rk45 {
    fn default() -> Self {
        Self {
            tol: Tolerances {
                abs: 1e-6,
                rel: 1e-3,
            },
            max_step: f64::INFINITY,
            first_step: None,
            max_steps: 1_000_000,
        }
    }
}

impl Rk45 {
    pub fn with_tolerances(rtol: f64, atol: f64) -> Self {
        Self {
            tol: Tolerances {
                abs: atol,
                rel: rtol,
            },
            ..Self::default()
        }
    }

    fn validate(&self) -> SimResult<()> {
        if !(self.tol.rel > 0.0) || !(self.tol.abs > 0.0) {
            return Err(SimError::InvalidArg {
                what: "rtol and atol must be positive",
            });
        }
        if !(self.max_step > 0.0) {
            return Err(SimError::InvalidArg {
                what: "max_step must be positive",
            });
        }
        if let Some(h) = self.first_step {
            if !(h > 0.0) || !h.is_finite() {
                return Err(SimError::InvalidArg {
                    what: "first_step must be positive and finite",
                });
            }
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        Ok(())
    }

    fn scaled_rms<const N: usize>(
        &self,
        v: &SVector<f64, N>,
        scale: &SVector<f64, N>,
    ) -> f64 {
        rms_norm(v.component_div(scale).as_slice())
    }

    /// Hairer-Wanner starting step heuristic.
    fn initial_step<const N: usize, M: OdeModel<N>>(
        &self,
        model: &M,
        t0: f64,
        y0: &SVector<f64, N>,
        f0: &SVector<f64, N>,
        interval: f64,
    ) -> SimResult<f64> {
        let scale = (y0.abs() * self.tol.rel).add_scalar(self.tol.abs);
        let d0 = self.scaled_rms(y0, &scale);
        let d1 = self.scaled_rms(f0, &scale);

        let h0 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        };
        let h0 = h0.min(interval);

        let y1 = y0 + f0 * h0;
        let f1 = model.rhs(t0 + h0, &y1)?;
        let d2 = self.scaled_rms(&(f1 - f0), &scale) / h0;

        let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d1.max(d2)).powf(-ERROR_EXPONENT)
        };

        Ok((100.0 * h0).min(h1).min(interval).min(self.max_step))
    }
}

/// One Dormand-Prince step: stage derivatives (k[6] is f at the new point)
/// and the 5th-order solution.
struct StepOutcome<const N: usize> {
    k: [SVector<f64, N>; STAGES + 1],
    y_new: SVector<f64, N>,
}

fn dopri_step<const N: usize, M: OdeModel<N>>(
    model: &M,
    t: f64,
    y: &SVector<f64, N>,
    f: &SVector<f64, N>,
    h: f64,
) -> SimResult<StepOutcome<N>> {
    let mut k = [SVector::<f64, N>::zeros(); STAGES + 1];
    k[0] = *f;

    for s in 1..STAGES {
        let mut dy = SVector::<f64, N>::zeros();
        for (a, kj) in A[s].iter().zip(&k[..s]) {
            dy += kj * *a;
        }
        k[s] = model.rhs(t + C[s] * h, &(y + dy * h))?;
    }

    let mut incr = SVector::<f64, N>::zeros();
    for (b, kj) in B.iter().zip(&k[..STAGES]) {
        incr += kj * *b;
    }
    let y_new = y + incr * h;
    k[STAGES] = model.rhs(t + h, &y_new)?;

    Ok(StepOutcome { k, y_new })
}

/// Continuous extension over one accepted step.
struct DenseStep<const N: usize> {
    t_old: f64,
    h: f64,
    y_old: SVector<f64, N>,
    q: [SVector<f64, N>; 4],
}

impl<const N: usize> DenseStep<N> {
    fn new(t_old: f64, h: f64, y_old: SVector<f64, N>, k: &[SVector<f64, N>; STAGES + 1]) -> Self {
        let mut q = [SVector::<f64, N>::zeros(); 4];
        for (kj, row) in k.iter().zip(&P) {
            for (qc, p) in q.iter_mut().zip(row) {
                *qc += kj * *p;
            }
        }
        Self { t_old, h, y_old, q }
    }

    fn eval(&self, t: f64) -> SVector<f64, N> {
        let x = (t - self.t_old) / self.h;
        let mut acc = SVector::<f64, N>::zeros();
        let mut p = x;
        for qc in &self.q {
            acc += qc * p;
            p *= x;
        }
        self.y_old + acc * self.h
    }
}

impl Integrator for Rk45 {
    fn integrate<const N: usize, M: OdeModel<N>>(
        &self,
        model: &M,
        y0: &SVector<f64, N>,
        grid: &TimeGrid,
    ) -> SimResult<Trajectory<N>> {
        self.validate()?;
        let times = grid.as_slice();
        if times.is_empty() {
            return Err(SimError::InvalidArg {
                what: "time grid is empty",
            });
        }

        let mut states = Vec::with_capacity(times.len());
        states.push(*y0);
        let mut stats = SolveStats::default();

        let t_bound = grid.end();
        let mut t = grid.start();
        let mut y = *y0;
        let mut next = 1;

        if times.len() > 1 {
            let mut f = model.rhs(t, &y)?;
            stats.rhs_calls += 1;

            let mut h_abs = match self.first_step {
                Some(h) => h.min(t_bound - t),
                None => {
                    stats.rhs_calls += 1;
                    self.initial_step(model, t, &y, &f, t_bound - t)?
                }
            };

            while next < times.len() {
                let min_step = (10.0 * f64::EPSILON * t.abs()).max(f64::MIN_POSITIVE);
                if h_abs > self.max_step {
                    h_abs = self.max_step;
                } else if h_abs < min_step {
                    h_abs = min_step;
                }

                let mut step_rejected = false;
                let (t_new, h, outcome) = loop {
                    if h_abs < min_step {
                        return Err(SimError::StepTooSmall { t, h: h_abs });
                    }

                    let t_new = (t + h_abs).min(t_bound);
                    let h = t_new - t;
                    h_abs = h;

                    let outcome = dopri_step(model, t, &y, &f, h)?;
                    stats.rhs_calls += STAGES;

                    let mut err = SVector::<f64, N>::zeros();
                    for (e, kj) in E.iter().zip(&outcome.k) {
                        err += kj * *e;
                    }
                    err *= h;
                    let scale =
                        (y.abs().sup(&outcome.y_new.abs()) * self.tol.rel).add_scalar(self.tol.abs);
                    let error_norm = self.scaled_rms(&err, &scale);

                    if error_norm < 1.0 {
                        let mut factor = if error_norm == 0.0 {
                            MAX_FACTOR
                        } else {
                            (SAFETY * error_norm.powf(ERROR_EXPONENT)).min(MAX_FACTOR)
                        };
                        if step_rejected {
                            factor = factor.min(1.0);
                        }
                        h_abs *= factor;
                        break (t_new, h, outcome);
                    }

                    // NaN error norms land here too and keep shrinking the step
                    h_abs *= MIN_FACTOR.max(SAFETY * error_norm.powf(ERROR_EXPONENT));
                    step_rejected = true;
                    stats.rejected_steps += 1;
                    debug!(t, h, error_norm, "rk45 step rejected");
                };

                stats.accepted_steps += 1;
                if stats.accepted_steps > self.max_steps {
                    return Err(SimError::MaxStepsExceeded {
                        max_steps: self.max_steps,
                        t_end: t_bound,
                    });
                }
                trace!(t = t_new, h, "rk45 step accepted");

                let dense = DenseStep::new(t, h, y, &outcome.k);
                while next < times.len() && times[next] <= t_new {
                    let sample = if times[next] == t_new {
                        outcome.y_new
                    } else {
                        dense.eval(times[next])
                    };
                    states.push(sample);
                    next += 1;
                }

                t = t_new;
                y = outcome.y_new;
                f = outcome.k[STAGES];
            }
        }

        Ok(Trajectory {
            t: times.to_vec(),
            x: states,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FnModel;
    use nalgebra::{Vector1, Vector2};

    #[test]
    fn tableau_rows_are_consistent() {
        for (s, row) in A.iter().enumerate() {
            let sum: f64 = row.iter().sum();
            assert!((sum - C[s]).abs() < 1e-14, "row {s}");
        }
        assert!((B.iter().sum::<f64>() - 1.0).abs() < 1e-14);
        assert!(E.iter().sum::<f64>().abs() < 1e-15);
    }

    #[test]
    fn dense_output_hits_step_end() {
        // At x = 1 the continuous extension reproduces the 5th-order weights
        for (j, row) in P.iter().enumerate().take(STAGES) {
            let sum: f64 = row.iter().sum();
            assert!((sum - B[j]).abs() < 1e-12, "stage {j}");
        }
    }

    #[test]
    fn exponential_decay_within_tolerance() {
        let model = FnModel(|_t: f64, x: &Vector1<f64>| -x);
        let grid = TimeGrid::linspace(0.0, 5.0, 501).unwrap();
        let solver = Rk45::with_tolerances(1e-8, 1e-10);

        let traj = solver.integrate(&model, &Vector1::new(1.0), &grid).unwrap();

        assert_eq!(traj.len(), 501);
        for (t, x) in traj.t.iter().zip(&traj.x) {
            assert!((x[0] - (-t).exp()).abs() < 1e-6, "t={t}");
        }
        assert!(traj.stats.accepted_steps < 500, "steps decouple from grid");
    }

    #[test]
    fn harmonic_oscillator_interpolates_between_steps() {
        let model = FnModel(|_t: f64, x: &Vector2<f64>| Vector2::new(x[1], -x[0]));
        let grid = TimeGrid::linspace(0.0, 2.0 * std::f64::consts::PI, 1000).unwrap();
        let traj = Rk45::with_tolerances(1e-9, 1e-12)
            .integrate(&model, &Vector2::new(1.0, 0.0), &grid)
            .unwrap();

        for (t, x) in traj.t.iter().zip(&traj.x) {
            assert!((x[0] - t.cos()).abs() < 1e-5, "t={t}");
        }
    }

    #[test]
    fn first_sample_is_initial_state() {
        let model = FnModel(|_t: f64, x: &Vector1<f64>| x * 2.0);
        let grid = TimeGrid::linspace(0.0, 1.0, 10).unwrap();
        let y0 = Vector1::new(0.5);
        let traj = Rk45::default().integrate(&model, &y0, &grid).unwrap();
        assert_eq!(traj.x[0], y0);
    }

    #[test]
    fn blow_up_is_reported() {
        // y' = y^2 from y(0) = 1 explodes at t = 1
        let model = FnModel(|_t: f64, x: &Vector1<f64>| Vector1::new(x[0] * x[0]));
        let grid = TimeGrid::linspace(0.0, 2.0, 20).unwrap();
        let err = Rk45::default()
            .integrate(&model, &Vector1::new(1.0), &grid)
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::StepTooSmall { .. } | SimError::MaxStepsExceeded { .. }
        ));
    }

    #[test]
    fn rejects_non_positive_tolerances() {
        let model = FnModel(|_t: f64, x: &Vector1<f64>| -x);
        let grid = TimeGrid::linspace(0.0, 1.0, 2).unwrap();
        let solver = Rk45::with_tolerances(0.0, 1e-6);
        assert!(matches!(
            solver.integrate(&model, &Vector1::new(1.0), &grid),
            Err(SimError::InvalidArg { .. })
        ));
    }
}
