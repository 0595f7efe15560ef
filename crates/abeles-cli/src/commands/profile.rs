use super::write_output;
use crate::cli::ProfileArgs;
use crate::config::RunSettings;
use crate::error::Result;
use abeles::core::io::model_file;
use abeles::core::models::layer_model;
use abeles::engine::error::EngineError;
use abeles::workflows::evaluate::Parameters;
use abeles::workflows::profile;
use tracing::info;

pub fn run(args: ProfileArgs, settings: &RunSettings) -> Result<()> {
    info!("Loading slab model from {:?}", &args.model);
    let stack = model_file::load_stack(&args.model)?;
    let coefficients = layer_model::to_coefficients(&stack).map_err(EngineError::from)?;

    let result = profile::profile(
        &Parameters::Positional(coefficients),
        None,
        &settings.profile,
    )?;

    write_output(
        args.output.as_deref(),
        &["z", "sld"],
        &[&result.z[..], &result.sld[..]],
    )
}
