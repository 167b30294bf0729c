//! Integration output.

use nalgebra::SVector;

use crate::error::{SimError, SimResult};

/// Work counters collected during one integration run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Number of derivative evaluations
    pub rhs_calls: usize,
    /// Steps kept
    pub accepted_steps: usize,
    /// Steps thrown away by error control (adaptive only)
    pub rejected_steps: usize,
}

/// Ordered states, one per time grid sample.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory<const N: usize> {
    /// Sample times
    pub t: Vec<f64>,
    /// State at each sample time
    pub x: Vec<SVector<f64, N>>,
    pub stats: SolveStats,
}

impl<const N: usize> Trajectory<N> {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn initial(&self) -> Option<&SVector<f64, N>> {
        self.x.first()
    }

    pub fn last(&self) -> Option<&SVector<f64, N>> {
        self.x.last()
    }

    /// One coordinate across all samples.
    pub fn component(&self, index: usize) -> SimResult<Vec<f64>> {
        if index >= N {
            return Err(SimError::InvalidArg {
                what: "component index out of range",
            });
        }
        Ok(self.x.iter().map(|s| s[index]).collect())
    }

    /// Largest Euclidean distance between states at the same sample index.
    pub fn max_deviation(&self, other: &Trajectory<N>) -> SimResult<f64> {
        if self.len() != other.len() {
            return Err(SimError::ShapeMismatch {
                what: "trajectory length",
                expected: self.len(),
                got: other.len(),
            });
        }
        Ok(self
            .x
            .iter()
            .zip(&other.x)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max))
    }
}

impl Trajectory<3> {
    /// Coordinate columns in (x, y, z) order, for plotting.
    pub fn xyz(&self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let mut xs = Vec::with_capacity(self.len());
        let mut ys = Vec::with_capacity(self.len());
        let mut zs = Vec::with_capacity(self.len());
        for s in &self.x {
            xs.push(s.x);
            ys.push(s.y);
            zs.push(s.z);
        }
        (xs, ys, zs)
    }
}
