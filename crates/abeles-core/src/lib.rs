//! # Abeles Core Library
//!
//! Specular reflectivity and scattering-length-density (SLD) profiles of layered
//! materials described by a slab model, computed with the Abeles/Parratt optical
//! matrix recursion.
//!
//! ## Architectural Philosophy
//!
//! The library is split into three layers with a strict dependency direction.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Slab`, `SlabStack`), the
//!   canonical coefficient-vector layout, and the pure numerical routines: the
//!   reflectivity kernel, Gauss-Legendre and Gauss-Kronrod quadrature, the SLD
//!   profile generator, and small readers for Q data and model files.
//!
//! - **[`engine`]: The Execution Layer.** Execution configuration (quadrature
//!   order, worker count), error types, the serial/parallel execution strategy,
//!   instrumental-resolution smearing, and numeric-degeneracy diagnostics.
//!
//! - **[`workflows`]: The Public API.** The model-function adapter consumed by
//!   external curve fitters, and SLD profile generation from a coefficient vector.

pub mod core;
pub mod engine;
pub mod workflows;
