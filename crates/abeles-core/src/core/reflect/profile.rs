use crate::core::models::layer_model::ModelError;
use crate::core::models::slab::SlabStack;
use std::f64::consts::SQRT_2;

/// Extra depth, in Å, padded before the first and after the last interface.
const EDGE_PADDING: f64 = 5.0;
/// Roughness widths padded beyond the outermost interfaces.
const EDGE_SIGMAS: f64 = 4.0;

/// Sampling controls for [`default_z`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileOptions {
    /// Points placed within one width of the smallest non-zero roughness.
    pub points_per_sigma: f64,
    pub min_points: usize,
    pub max_points: usize,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            points_per_sigma: 10.0,
            min_points: 500,
            max_points: 100_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SldProfile {
    pub z: Vec<f64>,
    pub sld: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Interface {
    depth: f64,
    step: f64,
    width: f64,
}

fn interfaces(stack: &SlabStack) -> Result<(f64, Vec<Interface>), ModelError> {
    if stack.slabs.len() < 2 {
        return Err(ModelError::TooFewSlabs {
            found: stack.slabs.len(),
        });
    }

    let mut depth = 0.0;
    let mut out = Vec::with_capacity(stack.slabs.len() - 1);
    for j in 1..stack.slabs.len() {
        if j > 1 {
            depth += stack.slabs[j - 1].thickness.abs();
        }
        out.push(Interface {
            depth,
            step: stack.slabs[j].sld_real - stack.slabs[j - 1].sld_real,
            width: stack.slabs[j].roughness.abs(),
        });
    }
    Ok((stack.slabs[0].sld_real, out))
}

#[inline]
fn smoothed_step(z: f64, interface: &Interface) -> f64 {
    if interface.width == 0.0 {
        return if z > interface.depth {
            1.0
        } else if z < interface.depth {
            0.0
        } else {
            0.5
        };
    }
    0.5 * (1.0 + libm::erf((z - interface.depth) / (interface.width * SQRT_2)))
}

/// Real part of the SLD at each depth in `z`. Depth 0 is the fronting interface and
/// increases toward the backing.
pub fn sld_profile(stack: &SlabStack, z: &[f64]) -> Result<Vec<f64>, ModelError> {
    let (fronting, interfaces) = interfaces(stack)?;
    Ok(z.iter()
        .map(|&zi| {
            interfaces
                .iter()
                .fold(fronting, |acc, i| acc + i.step * smoothed_step(zi, i))
        })
        .collect())
}

/// Evenly spaced depths covering every interface with room for the roughness tails.
pub fn default_z(stack: &SlabStack, options: &ProfileOptions) -> Result<Vec<f64>, ModelError> {
    let (_, interfaces) = interfaces(stack)?;
    let (Some(first), Some(last)) = (interfaces.first(), interfaces.last()) else {
        return Err(ModelError::TooFewSlabs {
            found: stack.slabs.len(),
        });
    };

    let start = -EDGE_PADDING - EDGE_SIGMAS * first.width;
    let end = last.depth + EDGE_PADDING + EDGE_SIGMAS * last.width;
    let span = end - start;
    if !span.is_finite() {
        return Err(ModelError::NonFiniteDepthRange { start, end });
    }

    let finest = interfaces
        .iter()
        .map(|i| i.width)
        .filter(|w| *w > 0.0)
        .fold(f64::INFINITY, f64::min);

    let cap = options.max_points.max(2);
    let mut points = options.min_points.max(2);
    if finest.is_finite() && options.points_per_sigma > 0.0 {
        let intervals = (span * options.points_per_sigma / finest).ceil();
        points = if intervals.is_finite() && intervals < cap as f64 {
            points.max(intervals as usize + 1)
        } else {
            cap
        };
    }
    points = points.min(cap);

    Ok(linspace(start, end, points))
}

/// Profile sampled on [`default_z`].
pub fn generate(stack: &SlabStack, options: &ProfileOptions) -> Result<SldProfile, ModelError> {
    let z = default_z(stack, options)?;
    let sld = sld_profile(stack, &z)?;
    Ok(SldProfile { z, sld })
}

fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    let step = (end - start) / (points - 1) as f64;
    (0..points)
        .map(|i| {
            if i == points - 1 {
                end
            } else {
                start + step * i as f64
            }
        })
        .collect()
}
