use super::write_output;
use crate::cli::{QSource, ReflectArgs, ResolutionArgs};
use crate::config::RunSettings;
use crate::error::{CliError, Result};
use abeles::core::io::dataset::Dataset;
use abeles::core::io::model_file;
use abeles::core::models::layer_model;
use abeles::engine::error::EngineError;
use abeles::engine::smearing::Resolution;
use abeles::workflows::evaluate::{self, Parameters};
use tracing::info;

pub fn run(args: ReflectArgs, settings: &RunSettings) -> Result<()> {
    info!("Loading slab model from {:?}", &args.model);
    let stack = model_file::load_stack(&args.model)?;
    let coefficients = layer_model::to_coefficients(&stack).map_err(EngineError::from)?;

    let (q, data_dq) = load_q(&args.q_source)?;
    let resolution = select_resolution(args.resolution, data_dq)?;
    info!(
        "Evaluating {} Q point(s) with resolution {:?} and {:?}.",
        q.len(),
        resolution_kind(&resolution),
        settings.engine.quad_order
    );

    let evaluation = evaluate::evaluate(
        &Parameters::Positional(coefficients),
        &q,
        &resolution,
        &settings.engine,
    )?;
    if !evaluation.degeneracies.is_empty() {
        info!(
            "{} degenerate input(s) were evaluated with their defined results.",
            evaluation.degeneracies.len()
        );
    }

    write_output(
        args.output.as_deref(),
        &["q", "r"],
        &[&q[..], &evaluation.reflectivity[..]],
    )
}

fn load_q(source: &QSource) -> Result<(Vec<f64>, Option<Vec<f64>>)> {
    if let Some(path) = &source.data {
        info!("Loading Q points from {:?}", path);
        let data = Dataset::load(path)?;
        if data.is_empty() {
            return Err(CliError::Argument(format!(
                "Data file '{}' contains no Q points.",
                path.display()
            )));
        }
        return Ok((data.q, data.dq));
    }

    match source.q_range.as_deref() {
        Some([min, max, count]) => Ok((q_range(*min, *max, *count)?, None)),
        _ => Err(CliError::Argument(
            "Either --data or --q-range MIN MAX N is required.".to_string(),
        )),
    }
}

fn q_range(min: f64, max: f64, count: f64) -> Result<Vec<f64>> {
    if !(count.fract() == 0.0 && count >= 1.0) {
        return Err(CliError::Argument(format!(
            "Q range point count must be a positive integer, got {count}."
        )));
    }
    if !(min.is_finite() && max.is_finite()) {
        return Err(CliError::Argument(
            "Q range limits must be finite.".to_string(),
        ));
    }
    let count = count as usize;
    if count == 1 {
        return Ok(vec![min]);
    }
    let step = (max - min) / (count - 1) as f64;
    Ok((0..count)
        .map(|i| if i == count - 1 { max } else { min + step * i as f64 })
        .collect())
}

fn select_resolution(args: ResolutionArgs, data_dq: Option<Vec<f64>>) -> Result<Resolution> {
    if args.pointwise {
        return data_dq.map(Resolution::Pointwise).ok_or_else(|| {
            CliError::Argument(
                "--pointwise needs a data file with a fourth (dQ) column.".to_string(),
            )
        });
    }
    Ok(match args.dq {
        Some(fraction) => Resolution::Constant(fraction),
        None => Resolution::None,
    })
}

fn resolution_kind(resolution: &Resolution) -> String {
    match resolution {
        Resolution::None => "none".to_string(),
        Resolution::Constant(fraction) => format!("dQ/Q = {fraction}"),
        Resolution::Pointwise(_) => "pointwise".to_string(),
    }
}
