//! Numerical quadrature on finite intervals.
//!
//! - [`gauss_legendre`] - Fixed-order Gauss-Legendre rules on [-1, 1]
//! - [`kronrod`] - Adaptive Gauss-Kronrod (G7/K15) integration with interval bisection
//!
//! Both are used by resolution smearing to integrate the reflectivity against a
//! Gaussian instrument function.

pub mod gauss_legendre;
pub mod kronrod;
