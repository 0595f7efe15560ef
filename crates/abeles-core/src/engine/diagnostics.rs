use crate::core::models::slab::SlabStack;
use std::fmt;

/// An input that evaluates to a defined but special-cased result.
///
/// These never abort an evaluation. They are returned beside the reflectivity so a
/// caller can decide whether the input was intended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericDegeneracy {
    /// `Q == 0`; the reflectivity is `background + scale` (or `background` without contrast).
    ZeroQ { index: usize },
    /// A layer of zero thickness, which has no effect on the reflectivity.
    ZeroThicknessLayer { layer: usize },
    /// A Q value that is NaN or infinite; its reflectivity is not meaningful.
    NonFiniteQ { index: usize, value: f64 },
}

impl fmt::Display for NumericDegeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroQ { index } => write!(f, "Q is zero at point {index}"),
            Self::ZeroThicknessLayer { layer } => write!(f, "layer {layer} has zero thickness"),
            Self::NonFiniteQ { index, value } => write!(f, "Q at point {index} is {value}"),
        }
    }
}

/// Degenerate inputs of one evaluation. Layers are numbered from 1.
pub fn scan(q: &[f64], stack: &SlabStack) -> Vec<NumericDegeneracy> {
    let layers = stack
        .layers()
        .iter()
        .enumerate()
        .filter(|(_, s)| s.thickness == 0.0)
        .map(|(k, _)| NumericDegeneracy::ZeroThicknessLayer { layer: k + 1 });

    let points = q.iter().enumerate().filter_map(|(index, &value)| {
        if !value.is_finite() {
            Some(NumericDegeneracy::NonFiniteQ { index, value })
        } else if value == 0.0 {
            Some(NumericDegeneracy::ZeroQ { index })
        } else {
            None
        }
    });

    layers.chain(points).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::slab::Slab;

    fn stack_with_thicknesses(thicknesses: &[f64]) -> SlabStack {
        let layers: Vec<Slab> = thicknesses
            .iter()
            .map(|&d| Slab::new(d, 3.47, 0.0, 2.0))
            .collect();
        SlabStack::new(
            1.0,
            0.0,
            Slab::semi_infinite(0.0, 0.0),
            &layers,
            Slab::new(0.0, 2.07, 0.0, 3.0),
        )
    }

    #[test]
    fn clean_input_has_no_degeneracies() {
        let stack = stack_with_thicknesses(&[100.0, 20.0]);
        assert!(scan(&[0.01, 0.1, -0.2], &stack).is_empty());
    }

    #[test]
    fn zero_q_points_are_reported_by_index() {
        let stack = stack_with_thicknesses(&[100.0]);
        let found = scan(&[0.0, 0.1, -0.0], &stack);
        assert_eq!(
            found,
            vec![
                NumericDegeneracy::ZeroQ { index: 0 },
                NumericDegeneracy::ZeroQ { index: 2 },
            ]
        );
    }

    #[test]
    fn zero_thickness_layers_are_numbered_from_one() {
        let stack = stack_with_thicknesses(&[100.0, 0.0, 15.0, 0.0]);
        let found = scan(&[0.05], &stack);
        assert_eq!(
            found,
            vec![
                NumericDegeneracy::ZeroThicknessLayer { layer: 2 },
                NumericDegeneracy::ZeroThicknessLayer { layer: 4 },
            ]
        );
    }

    #[test]
    fn non_finite_q_is_reported() {
        let stack = stack_with_thicknesses(&[]);
        let found = scan(&[f64::INFINITY], &stack);
        assert!(matches!(found[0], NumericDegeneracy::NonFiniteQ { index: 0, .. }));
        assert_eq!(found[0].to_string(), "Q at point 0 is inf");
    }
}
