//! # Engine Module
//!
//! The execution layer between the pure numerical routines in [`crate::core`] and
//! the public entry points in [`crate::workflows`].
//!
//! ## Overview
//!
//! Reflectivity is evaluated independently at every Q point, so a whole calculation is
//! a map over the Q array. The engine decides how that map runs (serially, on the
//! global worker pool, or on a pool of a requested size) and what function is mapped:
//! the bare kernel, or the kernel integrated against the instrument resolution.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Quadrature order, worker count and chunking, with a
//!   validating builder
//! - **Parallel Execution** ([`parallel`]) - The ordered map over Q points and the
//!   process-wide default worker setting with its scoped override guard
//! - **Resolution Smearing** ([`smearing`]) - Gaussian resolution kernels by fixed
//!   Gauss-Legendre or adaptive Gauss-Kronrod quadrature
//! - **Diagnostics** ([`diagnostics`]) - Degenerate inputs that have defined results
//! - **Error Handling** ([`error`]) - Engine error types wrapping model and
//!   configuration errors
//!
//! ## Guarantees
//!
//! - **Worker-count independence**: every output element is produced by the same
//!   sequence of floating-point operations whatever the degree of parallelism, so results
//!   are bit-identical between serial and parallel runs.
//! - **No hidden state**: the only process-wide setting is the default worker count,
//!   and it changes only for the lifetime of a [`parallel::DefaultWorkersGuard`].

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod parallel;
pub mod smearing;
