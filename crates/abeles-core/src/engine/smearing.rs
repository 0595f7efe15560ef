use super::config::{EngineConfig, QuadOrder};
use super::error::EngineError;
use super::parallel::Executor;
use crate::core::models::slab::SlabStack;
use crate::core::quadrature::gauss_legendre::GaussLegendre;
use crate::core::quadrature::kronrod::{self, AdaptiveOptions};
use crate::core::reflect::kernel::PreparedStack;
use std::f64::consts::{PI, SQRT_2};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// Ratio of a Gaussian's full width at half maximum to its standard deviation, `2√(2 ln 2)`.
pub const FWHM: f64 = 2.354_820_045_030_949_3;
/// Half-width of the integration window, in standard deviations.
pub const INTEGRATION_LIMIT: f64 = 3.5;

/// Instrumental Q resolution, expressed as Gaussian FWHM.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Resolution {
    #[default]
    None,
    /// FWHM proportional to Q, `dQ = |Q| * fraction` (`0.05` for 5 %).
    Constant(f64),
    /// Absolute FWHM at each Q point.
    Pointwise(Vec<f64>),
}

impl Resolution {
    /// Absolute FWHM at each point of `q`, or `None` when no smearing is requested.
    pub fn widths(&self, q: &[f64]) -> Result<Option<Vec<f64>>, EngineError> {
        match self {
            Self::None => Ok(None),
            Self::Constant(fraction) => {
                check_width(0, *fraction)?;
                Ok(Some(q.iter().map(|qi| qi.abs() * fraction).collect()))
            }
            Self::Pointwise(dq) => {
                if dq.len() != q.len() {
                    return Err(EngineError::ShapeMismatch {
                        q_len: q.len(),
                        resolution_len: dq.len(),
                    });
                }
                for (index, value) in dq.iter().enumerate() {
                    check_width(index, *value)?;
                }
                Ok(Some(dq.clone()))
            }
        }
    }
}

fn check_width(index: usize, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidResolution { index, value })
    }
}

/// Gauss-Legendre rule mapped onto the ±3.5σ window with Gaussian-weighted,
/// unit-sum weights.
#[derive(Debug, Clone)]
struct GaussianRule {
    abscissae: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussianRule {
    fn new(order: usize) -> Self {
        let rule = GaussLegendre::new(order);
        let abscissae: Vec<f64> = rule.nodes.iter().map(|x| INTEGRATION_LIMIT * x).collect();
        let mut weights: Vec<f64> = abscissae
            .iter()
            .zip(&rule.weights)
            .map(|(x, w)| w * (-0.5 * x * x).exp())
            .collect();
        let total: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        Self { abscissae, weights }
    }

    fn apply(&self, prepared: &PreparedStack, q: f64, dq: f64) -> f64 {
        self.abscissae
            .iter()
            .zip(&self.weights)
            .fold(0.0, |acc, (x, w)| {
                acc + w * prepared.reflectivity_at(q + x * dq / FWHM)
            })
    }
}

/// Integral of the truncated unit Gaussian over the window.
fn window_norm() -> f64 {
    (2.0 * PI).sqrt() * libm::erf(INTEGRATION_LIMIT / SQRT_2)
}

fn adaptive(prepared: &PreparedStack, q: f64, dq: f64, options: &AdaptiveOptions) -> (f64, bool) {
    let integral = kronrod::integrate(
        |x| (-0.5 * x * x).exp() * prepared.reflectivity_at(q + x * dq / FWHM),
        -INTEGRATION_LIMIT,
        INTEGRATION_LIMIT,
        options,
    );
    (integral.value / window_norm(), integral.converged)
}

/// Reflectivity of `stack` at each Q, convolved with the Gaussian resolution.
///
/// Points with zero width, and every point when the quadrature order is 0 or 1,
/// take the bare kernel value.
pub fn smear(
    q: &[f64],
    stack: &SlabStack,
    resolution: &Resolution,
    config: &EngineConfig,
) -> Result<Vec<f64>, EngineError> {
    let prepared = PreparedStack::new(stack)?;
    let executor = Executor::new(config);

    let Some(dq) = resolution.widths(q)? else {
        return executor.map(q.len(), |i| prepared.reflectivity_at(q[i]));
    };

    match config.quad_order {
        QuadOrder::Fixed(order) if order <= 1 => {
            debug!(order, "Quadrature order too low to smear; using the bare kernel");
            executor.map(q.len(), |i| prepared.reflectivity_at(q[i]))
        }
        QuadOrder::Fixed(order) => {
            let rule = GaussianRule::new(order);
            executor.map(q.len(), |i| {
                if dq[i] == 0.0 {
                    prepared.reflectivity_at(q[i])
                } else {
                    rule.apply(&prepared, q[i], dq[i])
                }
            })
        }
        QuadOrder::Adaptive(options) => {
            let unconverged = AtomicUsize::new(0);
            let values = executor.map(q.len(), |i| {
                if dq[i] == 0.0 {
                    return prepared.reflectivity_at(q[i]);
                }
                let (value, converged) = adaptive(&prepared, q[i], dq[i], &options);
                if !converged {
                    unconverged.fetch_add(1, Ordering::Relaxed);
                }
                value
            })?;
            let unconverged = unconverged.into_inner();
            if unconverged > 0 {
                warn!(
                    points = unconverged,
                    "Adaptive resolution integral did not reach tolerance within the subdivision budget"
                );
            }
            Ok(values)
        }
    }
}
