use crate::core::models::layer_model::{self, ModelError};
use crate::engine::config::EngineConfig;
use crate::engine::diagnostics::{self, NumericDegeneracy};
use crate::engine::error::EngineError;
use crate::engine::smearing::{self, Resolution};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Model parameters as handed over by a fitting front-end.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameters {
    /// The coefficient vector in its canonical layout.
    Positional(Vec<f64>),
    /// Coefficients keyed by [`layer_model::parameter_names`]. Every name must be present.
    Named(BTreeMap<String, f64>),
}

impl Parameters {
    pub fn to_coefficients(&self) -> Result<Vec<f64>, EngineError> {
        match self {
            Self::Positional(values) => Ok(values.clone()),
            Self::Named(values) => named_to_coefficients(values),
        }
    }
}

impl From<Vec<f64>> for Parameters {
    fn from(values: Vec<f64>) -> Self {
        Self::Positional(values)
    }
}

fn named_to_coefficients(values: &BTreeMap<String, f64>) -> Result<Vec<f64>, EngineError> {
    let nlayers = *values
        .get("nlayers")
        .ok_or_else(|| EngineError::InvalidParameters("missing parameter 'nlayers'".to_string()))?;
    if !nlayers.is_finite() || nlayers.fract() != 0.0 {
        return Err(ModelError::NonIntegerLayerCount { value: nlayers }.into());
    }
    if nlayers < 0.0 {
        return Err(ModelError::NegativeLayerCount { value: nlayers }.into());
    }

    let names = layer_model::parameter_names(nlayers as usize);
    if let Some(unknown) = values.keys().find(|k| !names.contains(k)) {
        return Err(EngineError::InvalidParameters(format!(
            "unknown parameter '{unknown}' for a {nlayers}-layer model"
        )));
    }
    names
        .iter()
        .map(|name| {
            values
                .get(name)
                .copied()
                .ok_or_else(|| EngineError::InvalidParameters(format!("missing parameter '{name}'")))
        })
        .collect()
}

/// The capability a curve fitter needs from a model: predictions at `x` for a parameter set.
pub trait ModelFunction {
    fn evaluate(&self, params: &Parameters, x: &[f64]) -> Result<Vec<f64>, EngineError>;

    /// Extra log-probability the model contributes to the fitter's objective.
    fn lnprob(&self, _params: &Parameters) -> f64 {
        0.0
    }
}

/// Specular reflectivity of a slab model, optionally resolution-smeared.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReflectivityModel {
    pub resolution: Resolution,
    pub config: EngineConfig,
}

impl ReflectivityModel {
    pub fn new(resolution: Resolution, config: EngineConfig) -> Self {
        Self { resolution, config }
    }
}

impl ModelFunction for ReflectivityModel {
    fn evaluate(&self, params: &Parameters, x: &[f64]) -> Result<Vec<f64>, EngineError> {
        evaluate(params, x, &self.resolution, &self.config).map(|e| e.reflectivity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub reflectivity: Vec<f64>,
    pub degeneracies: Vec<NumericDegeneracy>,
}

#[instrument(skip_all, name = "evaluate_workflow")]
pub fn evaluate(
    params: &Parameters,
    q: &[f64],
    resolution: &Resolution,
    config: &EngineConfig,
) -> Result<Evaluation, EngineError> {
    let coefficients = params.to_coefficients()?;
    let stack = layer_model::to_slabs(&coefficients)?;

    let degeneracies = diagnostics::scan(q, &stack);
    if let Some(first) = degeneracies.first() {
        warn!(
            count = degeneracies.len(),
            "Degenerate input evaluated with its defined result: {first}"
        );
        for degeneracy in &degeneracies {
            debug!("{degeneracy}");
        }
    }

    info!(
        points = q.len(),
        layers = stack.num_layers(),
        "Evaluating reflectivity."
    );
    let reflectivity = smearing::smear(q, &stack, resolution, config)?;

    Ok(Evaluation {
        reflectivity,
        degeneracies,
    })
}
