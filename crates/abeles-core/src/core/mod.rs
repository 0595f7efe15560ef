//! # Core Module
//!
//! The stateless foundation of the library: slab-model data structures and the
//! numerical routines that operate on them.
//!
//! ## Architecture
//!
//! - **Slab Models** ([`models`]) - `Slab`, `SlabStack`, and the conversion to and
//!   from the flat coefficient vector used to store and exchange models
//! - **Reflectivity** ([`reflect`]) - The Abeles/Parratt kernel and the SLD profile
//! - **Quadrature** ([`quadrature`]) - Gauss-Legendre rules and adaptive Gauss-Kronrod
//!   integration used by resolution smearing
//! - **File I/O** ([`io`]) - Column data files and TOML model files
//!
//! Everything in this module is a pure function of its inputs. Execution strategy,
//! configuration and diagnostics live in [`crate::engine`].

pub mod io;
pub mod models;
pub mod quadrature;
pub mod reflect;
