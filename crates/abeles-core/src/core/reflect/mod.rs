//! # Reflectivity Module
//!
//! Pure numerical routines operating on a [`SlabStack`](crate::core::models::slab::SlabStack).
//!
//! - [`kernel`] - Abeles/Parratt recursion giving the unsmeared specular reflectivity
//!   `R(Q) = background + scale * |r(Q)|²`
//! - [`profile`] - Real-space SLD depth profile with error-function interfaces
//!
//! ## Conventions
//!
//! SLDs are in units of 10⁻⁶ Å⁻², thicknesses and roughnesses in Å, Q in Å⁻¹.
//! Wavevectors are taken on the principal branch of the complex square root
//! (`Re k ≥ 0`), after shifting every SLD so the fronting medium has zero potential.

pub mod kernel;
pub mod profile;
