//! Ordered time grids.

use crate::error::{LfError, LfResult};
use crate::numeric::{Real, ensure_finite};

/// Ordered sequence of sample times, strictly increasing.
///
/// Built once and never mutated; integrators read it to decide where
/// trajectory samples are produced.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid {
    samples: Vec<Real>,
}

impl TimeGrid {
    /// `n` evenly spaced samples from `start` to `end` inclusive.
    ///
    /// The last sample is exactly `end`. A single sample yields `[start]`.
    pub fn linspace(start: Real, end: Real, n: usize) -> LfResult<Self> {
        ensure_finite(start, "grid start")?;
        ensure_finite(end, "grid end")?;
        if n == 0 {
            return Err(LfError::InvalidArg {
                what: "time grid needs at least one sample",
            });
        }
        if n == 1 {
            return Ok(Self {
                samples: vec![start],
            });
        }
        if end <= start {
            return Err(LfError::InvalidArg {
                what: "time grid end must be greater than start",
            });
        }

        let step = (end - start) / (n - 1) as Real;
        let mut samples: Vec<Real> = (0..n).map(|i| start + i as Real * step).collect();
        samples[n - 1] = end;
        Ok(Self { samples })
    }

    /// Grid from explicit sample times.
    pub fn from_samples(samples: Vec<Real>) -> LfResult<Self> {
        if samples.is_empty() {
            return Err(LfError::InvalidArg {
                what: "time grid needs at least one sample",
            });
        }
        for &t in &samples {
            ensure_finite(t, "grid sample")?;
        }
        if samples.windows(2).any(|w| w[1] <= w[0]) {
            return Err(LfError::InvalidArg {
                what: "time grid samples must be strictly increasing",
            });
        }
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn start(&self) -> Real {
        self.samples[0]
    }

    pub fn end(&self) -> Real {
        self.samples[self.samples.len() - 1]
    }

    pub fn as_slice(&self) -> &[Real] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = Real> + '_ {
        self.samples.iter().copied()
    }
}
