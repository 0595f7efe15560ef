//! Slab-model data structures.
//!
//! A model is an ordered stack of slabs from the fronting medium (where the beam
//! enters) to the backing medium. [`slab`] holds the structured representation and
//! [`layer_model`] the bijection with the flat coefficient vector.

pub mod layer_model;
pub mod slab;
