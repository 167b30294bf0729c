//! The Lorenz system.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::model::OdeModel;

/// Point (x, y, z) in Lorenz phase space.
pub type State = Vector3<f64>;

/// Lorenz parameters.
///
/// - `sigma`: Prandtl number
/// - `rho`: Rayleigh number
/// - `beta`: geometric factor
///
/// The classical chaotic regime is σ=10, ρ=28, β=8/3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LorenzParams {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
        }
    }
}

/// Lorenz system with a fixed parameter set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LorenzSystem {
    pub params: LorenzParams,
}

impl LorenzSystem {
    pub fn new(params: LorenzParams) -> Self {
        Self { params }
    }

    /// dx = σ(y − x), dy = x(ρ − z) − y, dz = xy − βz
    ///
    /// Non-finite inputs are not guarded and propagate into the result.
    pub fn derivative(&self, s: &State) -> State {
        let LorenzParams { sigma, rho, beta } = self.params;
        let (x, y, z) = (s.x, s.y, s.z);
        State::new(sigma * (y - x), x * (rho - z) - y, x * y - beta * z)
    }

    /// Equilibria of the system.
    ///
    /// The origin always; for ρ > 1 also the pair
    /// C± = (±√(β(ρ−1)), ±√(β(ρ−1)), ρ−1).
    pub fn fixed_points(&self) -> Vec<State> {
        let LorenzParams { rho, beta, .. } = self.params;
        if rho <= 1.0 {
            return vec![State::zeros()];
        }
        let c = (beta * (rho - 1.0)).sqrt();
        vec![
            State::zeros(),
            State::new(c, c, rho - 1.0),
            State::new(-c, -c, rho - 1.0),
        ]
    }
}

impl OdeModel<3> for LorenzSystem {
    // Autonomous: t is accepted for the integrator interface only.
    fn rhs(&self, _t: f64, x: &State) -> SimResult<State> {
        Ok(self.derivative(x))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn derivative_respects_xy_symmetry(
            x in -50.0_f64..50.0,
            y in -50.0_f64..50.0,
            z in -10.0_f64..60.0,
        ) {
            let lorenz = LorenzSystem::default();
            let d = lorenz.derivative(&State::new(x, y, z));
            let m = lorenz.derivative(&State::new(-x, -y, z));
            prop_assert_eq!(m.x, -d.x);
            prop_assert_eq!(m.y, -d.y);
            prop_assert_eq!(m.z, d.z);
        }
    }
}
