pub mod convert;
pub mod profile;
pub mod reflect;

use crate::error::Result;
use abeles::core::io::dataset;
use std::path::Path;
use tracing::info;

/// Writes columns to `output`, or to standard output when no path is given.
fn write_output(output: Option<&Path>, headers: &[&str], columns: &[&[f64]]) -> Result<()> {
    match output {
        Some(path) => {
            info!("Writing {} row(s) to {:?}", columns.first().map_or(0, |c| c.len()), path);
            dataset::write_columns(path, headers, columns)?;
            println!("✅ Results written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            dataset::write_columns_to(stdout.lock(), "<stdout>", headers, columns)?;
        }
    }
    Ok(())
}
