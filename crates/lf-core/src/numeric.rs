use crate::LfError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute/relative tolerance pair: the error budget of the adaptive
/// integrator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, LfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(LfError::NonFinite { what, value: v })
    }
}

/// Root-mean-square of a slice. Empty input has norm zero.
pub fn rms_norm(values: &[Real]) -> Real {
    if values.is_empty() {
        return 0.0;
    }
    let sum_sq: Real = values.iter().map(|v| v * v).sum();
    (sum_sq / values.len() as Real).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn rms_of_constant_slice() {
        assert_eq!(rms_norm(&[3.0, 3.0, 3.0, 3.0]), 3.0);
        assert_eq!(rms_norm(&[]), 0.0);
        assert!((rms_norm(&[3.0, 4.0]) - 12.5_f64.sqrt()).abs() < 1e-15);
    }
}
