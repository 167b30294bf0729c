//! The y = 2·sin(x)·cos(x) curve.

use lf_core::TimeGrid;

use crate::error::AppResult;

/// Paired coordinate sequences for a 2-D line.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

pub fn sine_cosine_curve(grid: &TimeGrid) -> Curve {
    let x = grid.as_slice().to_vec();
    let y = x.iter().map(|&v| 2.0 * v.sin() * v.cos()).collect();
    Curve { x, y }
}

/// 1000 samples over [0, 10].
pub fn default_curve() -> AppResult<Curve> {
    Ok(sine_cosine_curve(&TimeGrid::linspace(0.0, 10.0, 1000)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_curve_shape() {
        let curve = default_curve().unwrap();
        assert_eq!(curve.x.len(), 1000);
        assert_eq!(curve.y.len(), 1000);
        assert_eq!(curve.x[0], 0.0);
        assert_eq!(curve.x[999], 10.0);
        assert_eq!(curve.y[0], 0.0);
    }

    #[test]
    fn matches_double_angle_identity() {
        let curve = default_curve().unwrap();
        for (x, y) in curve.x.iter().zip(&curve.y) {
            assert!((y - (2.0 * x).sin()).abs() < 1e-12, "x={x}");
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn curve_follows_grid_and_identity(
            start in -50.0_f64..50.0,
            span in 0.1_f64..100.0,
            n in 1_usize..2000,
        ) {
            let grid = TimeGrid::linspace(start, start + span, n).unwrap();
            let curve = sine_cosine_curve(&grid);

            prop_assert_eq!(curve.x.as_slice(), grid.as_slice());
            prop_assert_eq!(curve.y.len(), n);
            for (x, y) in curve.x.iter().zip(&curve.y) {
                prop_assert!((y - (2.0 * x).sin()).abs() < 1e-12, "x={}", x);
            }
        }
    }
}
