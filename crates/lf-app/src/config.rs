//! Run configuration.
//!
//! Built once at startup (defaults or a YAML file), validated, then passed
//! read-only into the run service.

use std::path::Path;

use lf_core::{TimeGrid, Tolerances, ensure_finite};
use lf_sim::{IntegratorType, LorenzParams, SimError, SimOptions, State};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub params: LorenzParams,
    /// Must hold exactly three values (x, y, z)
    pub initial_state: Vec<f64>,
    pub t_start: f64,
    pub t_end: f64,
    pub samples: usize,
    pub method: IntegratorType,
    pub rtol: f64,
    pub atol: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        let tol = SimOptions::default().tol;
        Self {
            params: LorenzParams::default(),
            initial_state: vec![1.0, 1.0, 1.0],
            t_start: 0.0,
            t_end: 40.0,
            samples: 10_000,
            method: IntegratorType::default(),
            rtol: tol.rel,
            atol: tol.abs,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> AppResult<()> {
        let LorenzParams { sigma, rho, beta } = self.params;
        ensure_finite(sigma, "sigma")?;
        ensure_finite(rho, "rho")?;
        ensure_finite(beta, "beta")?;
        ensure_finite(self.rtol, "rtol")?;
        ensure_finite(self.atol, "atol")?;
        ensure_finite(self.t_start, "t_start")?;
        ensure_finite(self.t_end, "t_end")?;

        if self.t_end <= self.t_start {
            return Err(AppError::Config(
                "t_end must be greater than t_start".to_string(),
            ));
        }

        if self.rtol <= 0.0 || self.atol <= 0.0 {
            return Err(AppError::Config(
                "rtol and atol must be positive".to_string(),
            ));
        }

        self.initial_state()?;
        self.time_grid()?;
        Ok(())
    }

    /// Initial state as a 3-vector.
    pub fn initial_state(&self) -> AppResult<State> {
        match self.initial_state.as_slice() {
            &[x, y, z] => {
                for v in [x, y, z] {
                    ensure_finite(v, "initial state")?;
                }
                Ok(State::new(x, y, z))
            }
            other => Err(SimError::ShapeMismatch {
                what: "initial state",
                expected: 3,
                got: other.len(),
            }
            .into()),
        }
    }

    pub fn time_grid(&self) -> AppResult<TimeGrid> {
        Ok(TimeGrid::linspace(self.t_start, self.t_end, self.samples)?)
    }

    pub fn sim_options(&self) -> SimOptions {
        SimOptions {
            integrator: self.method,
            tol: Tolerances {
                abs: self.atol,
                rel: self.rtol,
            },
            ..SimOptions::default()
        }
    }

    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let config: RunConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Load and validate a YAML run configuration.
pub fn load_config(path: &Path) -> AppResult<RunConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    RunConfig::from_yaml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_setup() {
        let config = RunConfig::default();
        config.validate().unwrap();
        assert_eq!(config.params.sigma, 10.0);
        assert_eq!(config.params.rho, 28.0);
        assert_eq!(config.params.beta, 8.0 / 3.0);
        assert_eq!(config.initial_state().unwrap(), State::new(1.0, 1.0, 1.0));
        assert_eq!(config.time_grid().unwrap().len(), 10_000);
        assert_eq!(config.method, IntegratorType::Rk45);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = RunConfig::from_yaml_str("method: euler\nsamples: 500\n").unwrap();
        assert_eq!(config.method, IntegratorType::Euler);
        assert_eq!(config.samples, 500);
        assert_eq!(config.t_end, 40.0);

        let config = RunConfig::from_yaml_str("params:\n  rho: 14.0\n").unwrap();
        assert_eq!(config.params.rho, 14.0);
        assert_eq!(config.params.sigma, 10.0);
    }

    #[test]
    fn wrong_initial_state_width_is_shape_error() {
        let config = RunConfig {
            initial_state: vec![1.0, 1.0],
            ..RunConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            AppError::Simulation(SimError::ShapeMismatch {
                expected: 3,
                got: 2,
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_grid_and_tolerances() {
        let zero_samples = RunConfig {
            samples: 0,
            ..RunConfig::default()
        };
        assert!(matches!(zero_samples.validate(), Err(AppError::Config(_))));

        let bad_tol = RunConfig {
            rtol: -1.0,
            ..RunConfig::default()
        };
        assert!(bad_tol.validate().is_err());

        let nan_param = RunConfig {
            params: LorenzParams {
                sigma: f64::NAN,
                ..LorenzParams::default()
            },
            ..RunConfig::default()
        };
        assert!(nan_param.validate().is_err());

        // A single sample must not hide a reversed span
        let reversed = RunConfig {
            t_start: 5.0,
            t_end: 0.0,
            samples: 1,
            ..RunConfig::default()
        };
        assert!(matches!(reversed.validate(), Err(AppError::Config(_))));

        let empty_span = RunConfig {
            t_start: 2.0,
            t_end: 2.0,
            samples: 1,
            ..RunConfig::default()
        };
        assert!(empty_span.validate().is_err());
    }
}
