use crate::core::quadrature::kronrod::AdaptiveOptions;
use thiserror::Error;

/// Order of the fixed Gauss-Legendre rule used when none is requested.
pub const DEFAULT_QUAD_ORDER: usize = 17;
/// Smallest number of Q points handed to one parallel task.
pub const DEFAULT_MIN_CHUNK_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// How the resolution integral is evaluated at each point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuadOrder {
    /// Gauss-Legendre rule with this many nodes. Orders 0 and 1 evaluate the bare kernel.
    Fixed(usize),
    /// Per-point adaptive Gauss-Kronrod integration.
    Adaptive(AdaptiveOptions),
}

impl Default for QuadOrder {
    fn default() -> Self {
        Self::Fixed(DEFAULT_QUAD_ORDER)
    }
}

impl std::str::FromStr for QuadOrder {
    type Err = ConfigError;

    /// Parses an order such as `"17"`, or `"ultimate"` for adaptive integration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("ultimate") || s.eq_ignore_ascii_case("adaptive") {
            return Ok(Self::Adaptive(AdaptiveOptions::default()));
        }
        s.parse::<usize>()
            .map(Self::Fixed)
            .map_err(|_| ConfigError::InvalidParameter {
                name: "quad_order",
                reason: format!("'{s}' is neither a non-negative integer nor 'ultimate'"),
            })
    }
}

/// Number of worker threads used to evaluate a Q array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Workers {
    /// Every available core.
    #[default]
    All,
    Count(usize),
}

impl Workers {
    /// Interprets the integer convention of fitting front-ends, where `-1` means all cores.
    pub fn from_raw(value: i64) -> Result<Self, ConfigError> {
        match value {
            -1 => Ok(Self::All),
            n if n >= 1 => Ok(Self::Count(n as usize)),
            n => Err(ConfigError::InvalidParameter {
                name: "workers",
                reason: format!("{n} is not a positive count or -1"),
            }),
        }
    }

    pub fn is_serial(&self) -> bool {
        matches!(self, Self::Count(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub quad_order: QuadOrder,
    pub workers: Workers,
    pub min_chunk_len: usize,
}

/// The worker setting defaults to [`default_workers`](super::parallel::default_workers).
impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quad_order: QuadOrder::default(),
            workers: super::parallel::default_workers(),
            min_chunk_len: DEFAULT_MIN_CHUNK_LEN,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct EngineConfigBuilder {
    quad_order: Option<QuadOrder>,
    workers: Option<Workers>,
    min_chunk_len: Option<usize>,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quad_order(mut self, order: QuadOrder) -> Self {
        self.quad_order = Some(order);
        self
    }
    pub fn workers(mut self, workers: Workers) -> Self {
        self.workers = Some(workers);
        self
    }
    pub fn min_chunk_len(mut self, len: usize) -> Self {
        self.min_chunk_len = Some(len);
        self
    }

    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let defaults = EngineConfig::default();

        let workers = self.workers.unwrap_or(defaults.workers);
        if workers == Workers::Count(0) {
            return Err(ConfigError::InvalidParameter {
                name: "workers",
                reason: "worker count must be at least 1".to_string(),
            });
        }

        let quad_order = self.quad_order.unwrap_or(defaults.quad_order);
        if let QuadOrder::Adaptive(options) = quad_order {
            let tolerances_ok = options.absolute_tolerance >= 0.0
                && options.relative_tolerance >= 0.0
                && (options.absolute_tolerance > 0.0 || options.relative_tolerance > 0.0);
            if !tolerances_ok {
                return Err(ConfigError::InvalidParameter {
                    name: "quad_order",
                    reason: "adaptive tolerances must be non-negative and not both zero"
                        .to_string(),
                });
            }
        }

        let min_chunk_len = self.min_chunk_len.unwrap_or(defaults.min_chunk_len);
        if min_chunk_len == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "min_chunk_len",
                reason: "chunk length must be at least 1".to_string(),
            });
        }

        Ok(EngineConfig {
            quad_order,
            workers,
            min_chunk_len,
        })
    }
}
