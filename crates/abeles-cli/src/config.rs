use crate::error::{CliError, Result};
use abeles::core::quadrature::kronrod::AdaptiveOptions;
use abeles::core::reflect::profile::ProfileOptions;
use abeles::engine::config::{self as core_config, EngineConfig, QuadOrder, Workers};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// `quad-order = 17` or `quad-order = "ultimate"`.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
enum PartialQuadOrder {
    Order(usize),
    Name(String),
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialAdaptiveConfig {
    absolute_tolerance: Option<f64>,
    relative_tolerance: Option<f64>,
    max_subdivisions: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialEngineConfig {
    quad_order: Option<PartialQuadOrder>,
    workers: Option<i64>,
    min_chunk_len: Option<usize>,
    adaptive: Option<PartialAdaptiveConfig>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialProfileConfig {
    points_per_sigma: Option<f64>,
    min_points: Option<usize>,
    max_points: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    engine: Option<PartialEngineConfig>,
    profile: Option<PartialProfileConfig>,
}

/// Command-line values that take precedence over the run file.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides<'a> {
    pub threads: Option<i64>,
    pub quad_order: Option<&'a str>,
    pub points: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub engine: EngineConfig,
    pub profile: ProfileOptions,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading run configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(mut self, overrides: &CliOverrides<'_>) -> Result<RunSettings> {
        let engine_file = self.engine.take().unwrap_or_default();
        let profile_file = self.profile.take().unwrap_or_default();

        let workers = match overrides.threads.or(engine_file.workers) {
            Some(raw) => Workers::from_raw(raw).map_err(|e| CliError::Config(e.to_string()))?,
            None => EngineConfig::default().workers,
        };

        let adaptive = Self::merge_adaptive(engine_file.adaptive);
        let quad_order = match overrides.quad_order {
            Some(text) => Some(Self::parse_quad_order(text, adaptive)?),
            None => match engine_file.quad_order {
                Some(PartialQuadOrder::Order(n)) => Some(QuadOrder::Fixed(n)),
                Some(PartialQuadOrder::Name(name)) => Some(Self::parse_quad_order(&name, adaptive)?),
                None => None,
            },
        };

        let mut builder = core_config::EngineConfigBuilder::new().workers(workers);
        if let Some(order) = quad_order {
            builder = builder.quad_order(order);
        }
        if let Some(len) = engine_file.min_chunk_len {
            builder = builder.min_chunk_len(len);
        }
        let engine = builder.build().map_err(|e| CliError::Config(e.to_string()))?;

        let profile = Self::merge_profile(profile_file, overrides.points)?;

        Ok(RunSettings { engine, profile })
    }

    fn merge_adaptive(partial: Option<PartialAdaptiveConfig>) -> AdaptiveOptions {
        let partial = partial.unwrap_or_default();
        let defaults = AdaptiveOptions::default();
        AdaptiveOptions {
            absolute_tolerance: partial
                .absolute_tolerance
                .unwrap_or(defaults.absolute_tolerance),
            relative_tolerance: partial
                .relative_tolerance
                .unwrap_or(defaults.relative_tolerance),
            max_subdivisions: partial.max_subdivisions.unwrap_or(defaults.max_subdivisions),
        }
    }

    fn parse_quad_order(text: &str, adaptive: AdaptiveOptions) -> Result<QuadOrder> {
        match text.parse::<QuadOrder>() {
            Ok(QuadOrder::Adaptive(_)) => Ok(QuadOrder::Adaptive(adaptive)),
            Ok(order) => Ok(order),
            Err(e) => Err(CliError::Config(e.to_string())),
        }
    }

    fn merge_profile(
        partial: PartialProfileConfig,
        cli_points: Option<usize>,
    ) -> Result<ProfileOptions> {
        let defaults = ProfileOptions::default();
        let mut options = ProfileOptions {
            points_per_sigma: partial.points_per_sigma.unwrap_or(defaults.points_per_sigma),
            min_points: partial.min_points.unwrap_or(defaults.min_points),
            max_points: partial.max_points.unwrap_or(defaults.max_points),
        };
        if let Some(points) = cli_points {
            options.min_points = points;
            options.max_points = points;
        }

        if options.min_points < 2 || options.max_points < options.min_points {
            return Err(CliError::Config(format!(
                "Profile point limits must satisfy 2 <= min-points <= max-points, got {} and {}.",
                options.min_points, options.max_points
            )));
        }
        if !(options.points_per_sigma.is_finite() && options.points_per_sigma > 0.0) {
            return Err(CliError::Config(format!(
                "`profile.points-per-sigma` must be positive, got {}.",
                options.points_per_sigma
            )));
        }
        Ok(options)
    }
}
