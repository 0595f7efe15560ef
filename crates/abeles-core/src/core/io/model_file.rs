use super::IoError;
use crate::core::models::layer_model::{self, ModelError};
use crate::core::models::slab::{Slab, SlabStack};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediumTable {
    pub sld: f64,
    #[serde(default)]
    pub isld: f64,
    /// Roughness of the interface above this medium. Ignored for the fronting.
    #[serde(default)]
    pub roughness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerTable {
    pub thickness: f64,
    pub sld: f64,
    #[serde(default)]
    pub isld: f64,
    #[serde(default)]
    pub roughness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuredModel {
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub background: f64,
    pub fronting: MediumTable,
    #[serde(default)]
    pub layers: Vec<LayerTable>,
    pub backing: MediumTable,
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoefficientModel {
    pub coefficients: Vec<f64>,
}

/// A slab model file: either the flat coefficient vector or one table per medium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelFile {
    Coefficients(CoefficientModel),
    Structured(StructuredModel),
}

impl ModelFile {
    pub fn load(path: &Path) -> Result<Self, IoError> {
        let content = std::fs::read_to_string(path).map_err(|e| IoError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    pub fn parse(content: &str, label: &str) -> Result<Self, IoError> {
        toml::from_str(content).map_err(|e| IoError::Toml {
            path: label.to_string(),
            source: e,
        })
    }

    pub fn to_stack(&self) -> Result<SlabStack, ModelError> {
        match self {
            Self::Coefficients(model) => layer_model::to_slabs(&model.coefficients),
            Self::Structured(model) => {
                let layers: Vec<Slab> = model
                    .layers
                    .iter()
                    .map(|l| Slab::new(l.thickness, l.sld, l.isld, l.roughness))
                    .collect();
                Ok(SlabStack::new(
                    model.scale,
                    model.background,
                    Slab::semi_infinite(model.fronting.sld, model.fronting.isld),
                    &layers,
                    Slab::new(0.0, model.backing.sld, model.backing.isld, model.backing.roughness),
                ))
            }
        }
    }

    /// Structured tables describing `stack`.
    pub fn structured(stack: &SlabStack) -> Result<Self, ModelError> {
        let (Some(fronting), Some(backing)) = (stack.fronting(), stack.backing()) else {
            return Err(ModelError::TooFewSlabs {
                found: stack.slabs.len(),
            });
        };
        Ok(Self::Structured(StructuredModel {
            scale: stack.scale,
            background: stack.background,
            fronting: MediumTable {
                sld: fronting.sld_real,
                isld: fronting.sld_imag,
                roughness: 0.0,
            },
            layers: stack
                .layers()
                .iter()
                .map(|s| LayerTable {
                    thickness: s.thickness,
                    sld: s.sld_real,
                    isld: s.sld_imag,
                    roughness: s.roughness,
                })
                .collect(),
            backing: MediumTable {
                sld: backing.sld_real,
                isld: backing.sld_imag,
                roughness: backing.roughness,
            },
        }))
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

/// Reads a model file straight into a slab stack.
pub fn load_stack(path: &Path) -> Result<SlabStack, IoError> {
    ModelFile::load(path)?
        .to_stack()
        .map_err(|e| IoError::Model {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
}
