use crate::cli::ConvertArgs;
use crate::error::{CliError, Result};
use abeles::core::io::model_file::{self, ModelFile};
use abeles::core::models::layer_model;
use abeles::core::models::slab::SlabStack;
use abeles::engine::error::EngineError;
use tracing::info;

pub fn run(args: ConvertArgs) -> Result<()> {
    info!("Loading slab model from {:?}", &args.model);
    let stack = model_file::load_stack(&args.model)?;
    print!("{}", render(&stack, args.structured)?);
    Ok(())
}

fn render(stack: &SlabStack, structured: bool) -> Result<String> {
    if structured {
        let file = ModelFile::structured(stack).map_err(EngineError::from)?;
        return file
            .to_toml_string()
            .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to serialize model: {}", e)));
    }

    let coefficients = layer_model::to_coefficients(stack).map_err(EngineError::from)?;
    let names = layer_model::parameter_names(stack.num_layers());
    let width = names.iter().map(|n| n.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (index, (name, value)) in names.iter().zip(&coefficients).enumerate() {
        out.push_str(&format!("{index:>3}  {name:<width$}  {value}\n"));
    }
    Ok(out)
}
