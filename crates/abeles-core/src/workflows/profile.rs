use super::evaluate::Parameters;
use crate::core::models::layer_model;
use crate::core::reflect::profile::{self as sld, ProfileOptions, SldProfile};
use crate::engine::error::EngineError;
use tracing::{info, instrument};

/// SLD depth profile of a parameter set, on `z` or on a generated grid.
#[instrument(skip_all, name = "profile_workflow")]
pub fn profile(
    params: &Parameters,
    z: Option<&[f64]>,
    options: &ProfileOptions,
) -> Result<SldProfile, EngineError> {
    let coefficients = params.to_coefficients()?;
    let stack = layer_model::to_slabs(&coefficients)?;

    info!(
        layers = stack.num_layers(),
        thickness = stack.total_thickness(),
        "Generating SLD profile."
    );
    match z {
        Some(z) => Ok(SldProfile {
            z: z.to_vec(),
            sld: sld::sld_profile(&stack, z)?,
        }),
        None => Ok(sld::generate(&stack, options)?),
    }
}
