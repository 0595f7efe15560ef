//! # Workflows Module
//!
//! The public entry points of the library, each taking a parameter set in the form a
//! fitting front-end holds it and returning finished results.
//!
//! ## Overview
//!
//! A workflow converts [`Parameters`](evaluate::Parameters) into a slab stack, runs the
//! engine, and reports anything degenerate it noticed on the way. No workflow performs
//! fitting: parameter bounds, objectives and minimisers belong to the caller.
//!
//! ## Architecture
//!
//! - **Evaluation** ([`evaluate`]) - The [`ModelFunction`](evaluate::ModelFunction)
//!   capability, the [`ReflectivityModel`](evaluate::ReflectivityModel) that implements
//!   it, and the `evaluate` call returning reflectivity with its degeneracies
//! - **SLD Profile** ([`profile`]) - The scattering-length-density depth profile of a
//!   parameter set

pub mod evaluate;
pub mod profile;
