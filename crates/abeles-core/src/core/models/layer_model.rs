use super::slab::{Slab, SlabStack};
use thiserror::Error;

/// Number of leading coefficients that do not belong to a layer.
pub const HEADER_LEN: usize = 8;
/// Coefficients per layer: thickness, SLD real, SLD imaginary, roughness.
pub const PER_LAYER: usize = 4;

pub const IDX_NLAYERS: usize = 0;
pub const IDX_SCALE: usize = 1;
pub const IDX_SLD_FRONTING: usize = 2;
pub const IDX_ISLD_FRONTING: usize = 3;
pub const IDX_SLD_BACKING: usize = 4;
pub const IDX_ISLD_BACKING: usize = 5;
pub const IDX_BACKGROUND: usize = 6;
pub const IDX_ROUGHNESS_BACKING: usize = 7;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ModelError {
    #[error("Coefficient vector has {len} entries; at least 8 are required")]
    TooShort { len: usize },

    #[error("Layer count {value} is not an integer")]
    NonIntegerLayerCount { value: f64 },

    #[error("Layer count {value} is negative")]
    NegativeLayerCount { value: f64 },

    #[error("Coefficient vector for {nlayers} layer(s) must have {expected} entries, found {found}")]
    LengthMismatch {
        nlayers: usize,
        expected: usize,
        found: usize,
    },

    #[error("Slab stack has {found} slab(s); fronting and backing are required")]
    TooFewSlabs { found: usize },

    #[error("Profile depth range [{start}, {end}] is not finite")]
    NonFiniteDepthRange { start: f64, end: f64 },
}

/// Length of a coefficient vector describing `nlayers` layers.
#[inline]
pub fn coefficient_len(nlayers: usize) -> usize {
    PER_LAYER * nlayers + HEADER_LEN
}

/// Validates the layer count stored at index 0 against the vector length.
pub fn layer_count(coefficients: &[f64]) -> Result<usize, ModelError> {
    if coefficients.len() < HEADER_LEN {
        return Err(ModelError::TooShort {
            len: coefficients.len(),
        });
    }

    let value = coefficients[IDX_NLAYERS];
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(ModelError::NonIntegerLayerCount { value });
    }
    if value < 0.0 {
        return Err(ModelError::NegativeLayerCount { value });
    }

    let implied = (coefficients.len() - HEADER_LEN) / PER_LAYER;
    let expected_len = coefficient_len(implied);
    if value as usize != implied || expected_len != coefficients.len() {
        return Err(ModelError::LengthMismatch {
            nlayers: value as usize,
            expected: coefficient_len(value as usize),
            found: coefficients.len(),
        });
    }
    Ok(implied)
}

pub fn to_slabs(coefficients: &[f64]) -> Result<SlabStack, ModelError> {
    let nlayers = layer_count(coefficients)?;

    let fronting = Slab::semi_infinite(
        coefficients[IDX_SLD_FRONTING],
        coefficients[IDX_ISLD_FRONTING],
    );
    let backing = Slab::new(
        0.0,
        coefficients[IDX_SLD_BACKING],
        coefficients[IDX_ISLD_BACKING],
        coefficients[IDX_ROUGHNESS_BACKING],
    );
    let layers: Vec<Slab> = coefficients[HEADER_LEN..]
        .chunks_exact(PER_LAYER)
        .map(|c| Slab::new(c[0], c[1], c[2], c[3]))
        .collect();
    debug_assert_eq!(layers.len(), nlayers);

    Ok(SlabStack::new(
        coefficients[IDX_SCALE],
        coefficients[IDX_BACKGROUND],
        fronting,
        &layers,
        backing,
    ))
}

pub fn to_coefficients(stack: &SlabStack) -> Result<Vec<f64>, ModelError> {
    let (Some(fronting), Some(backing)) = (stack.fronting(), stack.backing()) else {
        return Err(ModelError::TooFewSlabs {
            found: stack.slabs.len(),
        });
    };
    let layers = stack.layers();

    let mut coefficients = vec![0.0; coefficient_len(layers.len())];
    coefficients[IDX_NLAYERS] = layers.len() as f64;
    coefficients[IDX_SCALE] = stack.scale;
    coefficients[IDX_SLD_FRONTING] = fronting.sld_real;
    coefficients[IDX_ISLD_FRONTING] = fronting.sld_imag;
    coefficients[IDX_SLD_BACKING] = backing.sld_real;
    coefficients[IDX_ISLD_BACKING] = backing.sld_imag;
    coefficients[IDX_BACKGROUND] = stack.background;
    coefficients[IDX_ROUGHNESS_BACKING] = backing.roughness;

    for (slot, layer) in coefficients[HEADER_LEN..]
        .chunks_exact_mut(PER_LAYER)
        .zip(layers)
    {
        slot.copy_from_slice(&[
            layer.thickness,
            layer.sld_real,
            layer.sld_imag,
            layer.roughness,
        ]);
    }
    Ok(coefficients)
}

/// Canonical names for every slot of a coefficient vector with `nlayers` layers.
/// Layers are numbered from 1 starting at the fronting side.
pub fn parameter_names(nlayers: usize) -> Vec<String> {
    let mut names: Vec<String> = [
        "nlayers",
        "scale",
        "sld_fronting",
        "isld_fronting",
        "sld_backing",
        "isld_backing",
        "background",
        "roughness_backing",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    for k in 1..=nlayers {
        names.push(format!("thickness_{k}"));
        names.push(format!("sld_{k}"));
        names.push(format!("isld_{k}"));
        names.push(format!("roughness_{k}"));
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_coefficients() -> Vec<f64> {
        vec![1.0, 1.0, 0.0, 0.0, 2.07, 0.0, 0.0, 3.0, 100.0, 3.47, 0.0, 2.0]
    }

    #[test]
    fn to_slabs_slices_reference_vector_into_rows() {
        let stack = to_slabs(&reference_coefficients()).unwrap();
        assert_eq!(stack.scale, 1.0);
        assert_eq!(stack.background, 0.0);
        assert_eq!(stack.slabs.len(), 3);
        assert_eq!(stack.slabs[0], Slab::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(stack.slabs[1], Slab::new(100.0, 3.47, 0.0, 2.0));
        assert_eq!(stack.slabs[2], Slab::new(0.0, 2.07, 0.0, 3.0));
    }

    #[test]
    fn coefficient_round_trip_is_exact() {
        let coefficients = vec![
            2.0, 0.98, 0.1, 1e-4, 6.36, 2e-3, 3e-7, 4.5, 12.5, 1.2, 0.0, 3.0, 250.0, -0.56, 1e-5,
            7.25,
        ];
        let stack = to_slabs(&coefficients).unwrap();
        assert_eq!(to_coefficients(&stack).unwrap(), coefficients);
    }

    #[test]
    fn slab_round_trip_is_exact_when_unused_slots_are_zero() {
        let stack = SlabStack::new(
            0.9,
            2e-6,
            Slab::semi_infinite(2.07, 0.0),
            &[Slab::new(40.0, 4.0, 0.1, 3.0)],
            Slab::new(0.0, 6.36, 0.0, 5.0),
        );
        let coefficients = to_coefficients(&stack).unwrap();
        assert_eq!(to_slabs(&coefficients).unwrap(), stack);
    }

    #[test]
    fn zero_layer_vector_has_eight_entries() {
        let coefficients = vec![0.0, 1.0, 0.0, 0.0, 2.07, 0.0, 1e-6, 3.0];
        let stack = to_slabs(&coefficients).unwrap();
        assert_eq!(stack.num_layers(), 0);
        assert_eq!(to_coefficients(&stack).unwrap(), coefficients);
    }

    #[test]
    fn non_integer_layer_count_is_rejected() {
        let mut coefficients = reference_coefficients();
        coefficients[0] = 1.5;
        assert_eq!(
            to_slabs(&coefficients),
            Err(ModelError::NonIntegerLayerCount { value: 1.5 })
        );
    }

    #[test]
    fn nan_layer_count_is_rejected() {
        let mut coefficients = reference_coefficients();
        coefficients[0] = f64::NAN;
        assert!(matches!(
            to_slabs(&coefficients),
            Err(ModelError::NonIntegerLayerCount { .. })
        ));
    }

    #[test]
    fn negative_layer_count_is_rejected() {
        let mut coefficients = reference_coefficients();
        coefficients[0] = -1.0;
        assert_eq!(
            to_slabs(&coefficients),
            Err(ModelError::NegativeLayerCount { value: -1.0 })
        );
    }

    #[test]
    fn layer_count_inconsistent_with_length_is_rejected() {
        let mut coefficients = reference_coefficients();
        coefficients[0] = 2.0;
        assert_eq!(
            to_slabs(&coefficients),
            Err(ModelError::LengthMismatch {
                nlayers: 2,
                expected: 16,
                found: 12
            })
        );
    }

    #[test]
    fn ragged_length_is_rejected() {
        let mut coefficients = reference_coefficients();
        coefficients.push(1.0);
        assert!(matches!(
            to_slabs(&coefficients),
            Err(ModelError::LengthMismatch { found: 13, .. })
        ));
    }

    #[test]
    fn vector_shorter_than_header_is_rejected() {
        assert_eq!(
            to_slabs(&[0.0, 1.0, 0.0]),
            Err(ModelError::TooShort { len: 3 })
        );
    }

    #[test]
    fn stack_without_backing_cannot_be_flattened() {
        let stack = SlabStack {
            scale: 1.0,
            background: 0.0,
            slabs: vec![Slab::default()],
        };
        assert_eq!(
            to_coefficients(&stack),
            Err(ModelError::TooFewSlabs { found: 1 })
        );
    }

    #[test]
    fn parameter_names_match_coefficient_layout() {
        let names = parameter_names(2);
        assert_eq!(names.len(), coefficient_len(2));
        assert_eq!(names[IDX_BACKGROUND], "background");
        assert_eq!(names[IDX_ROUGHNESS_BACKING], "roughness_backing");
        assert_eq!(names[8], "thickness_1");
        assert_eq!(names[15], "roughness_2");
    }
}
