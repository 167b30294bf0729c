//! OdeModel trait for pluggable dynamic systems.

use nalgebra::SVector;

use crate::error::SimResult;

/// A first-order ODE system `dx/dt = f(t, x)` over an `N`-dimensional state.
///
/// Implementations must be pure: the same `(t, x)` always yields the same
/// derivative. Integrators rely on this for reproducible trajectories.
pub trait OdeModel<const N: usize> {
    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&self, t: f64, x: &SVector<f64, N>) -> SimResult<SVector<f64, N>>;
}

/// Adapts a plain closure into an [`OdeModel`].
///
/// ```
/// use lf_sim::{FnModel, OdeModel};
/// use nalgebra::Vector1;
///
/// let decay = FnModel(|_t: f64, x: &Vector1<f64>| -x);
/// assert_eq!(decay.rhs(0.0, &Vector1::new(2.0)).unwrap()[0], -2.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FnModel<F>(pub F);

impl<F, const N: usize> OdeModel<N> for FnModel<F>
where
    F: Fn(f64, &SVector<f64, N>) -> SVector<f64, N>,
{
    fn rhs(&self, t: f64, x: &SVector<f64, N>) -> SimResult<SVector<f64, N>> {
        Ok((self.0)(t, x))
    }
}
