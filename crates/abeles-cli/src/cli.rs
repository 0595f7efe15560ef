use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "abeles - Specular reflectivity and SLD profiles of layered slab models.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of worker threads; -1 uses every available core.
    #[arg(short = 'j', long, global = true, value_name = "NUM", allow_negative_numbers = true)]
    pub threads: Option<i64>,

    /// Path to a run configuration file in TOML format (engine and profile defaults).
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the reflectivity of a slab model.
    Reflect(ReflectArgs),
    /// Compute the SLD depth profile of a slab model.
    Profile(ProfileArgs),
    /// Print the coefficient vector of a model file with its parameter names.
    Convert(ConvertArgs),
}

/// Arguments for the `reflect` subcommand.
#[derive(Args, Debug)]
pub struct ReflectArgs {
    // --- Model and Q points ---
    /// Path to the slab model file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub model: PathBuf,

    #[command(flatten)]
    pub q_source: QSource,

    // --- Resolution ---
    #[command(flatten)]
    pub resolution: ResolutionArgs,

    /// Quadrature order for resolution smearing, or 'ultimate' for adaptive integration.
    #[arg(long, value_name = "N|ultimate")]
    pub quad_order: Option<String>,

    // --- Output ---
    /// Path for the output CSV file. Written to standard output when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Where the Q points come from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct QSource {
    /// Column data file whose first column is Q (and fourth, if present, dQ).
    #[arg(short, long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Evenly spaced Q points: first, last and count.
    #[arg(long, num_args = 3, value_names = ["MIN", "MAX", "N"], allow_negative_numbers = true)]
    pub q_range: Option<Vec<f64>>,
}

/// Mutually exclusive ways of describing the instrument resolution.
#[derive(Args, Debug, Clone, Copy)]
#[group(required = false, multiple = false)]
pub struct ResolutionArgs {
    /// Constant fractional resolution dQ/Q as Gaussian FWHM (0.05 for 5 %).
    #[arg(long, value_name = "FRAC")]
    pub dq: Option<f64>,

    /// Use the per-point dQ column (FWHM) of the --data file.
    #[arg(long)]
    pub pointwise: bool,
}

/// Arguments for the `profile` subcommand.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Path to the slab model file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub model: PathBuf,

    /// Exact number of depth points, overriding the automatic sampling.
    #[arg(short, long, value_name = "INT")]
    pub points: Option<usize>,

    /// Path for the output CSV file. Written to standard output when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Path to the slab model file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub model: PathBuf,

    /// Print the model as structured TOML tables instead of a coefficient listing.
    #[arg(long)]
    pub structured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_accepts_q_range_and_constant_resolution() {
        let cli = Cli::parse_from([
            "abeles", "reflect", "-m", "model.toml", "--q-range", "0.005", "0.3", "100", "--dq",
            "0.05", "-j", "-1",
        ]);
        assert_eq!(cli.threads, Some(-1));
        let Commands::Reflect(args) = cli.command else {
            panic!("Expected 'reflect' subcommand");
        };
        assert_eq!(args.q_source.q_range, Some(vec![0.005, 0.3, 100.0]));
        assert_eq!(args.resolution.dq, Some(0.05));
        assert!(!args.resolution.pointwise);
    }

    #[test]
    fn reflect_requires_a_q_source() {
        let result = Cli::try_parse_from(["abeles", "reflect", "-m", "model.toml"]);
        assert!(result.is_err());
    }

    #[test]
    fn reflect_rejects_both_resolution_modes() {
        let result = Cli::try_parse_from([
            "abeles", "reflect", "-m", "model.toml", "-d", "data.dat", "--dq", "0.05",
            "--pointwise",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::parse_from(["abeles", "profile", "-m", "model.toml", "-vv", "-c", "run.toml"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("run.toml")));
    }
}
