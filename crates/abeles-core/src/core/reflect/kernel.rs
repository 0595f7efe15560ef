use crate::core::models::layer_model::ModelError;
use crate::core::models::slab::SlabStack;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Converts an SLD in 10⁻⁶ Å⁻² into the potential term of `k² = Q²/4 - ρ'`.
const SLD_TO_POTENTIAL: f64 = PI * 4e-6;

/// A slab stack laid out in the flat form the recursion consumes.
///
/// Built once per call and shared read-only between worker threads.
#[derive(Debug, Clone)]
pub struct PreparedStack {
    thickness: Vec<f64>,
    potential: Vec<Complex64>,
    roughness_sq: Vec<f64>,
    scale: f64,
    background: f64,
    has_contrast: bool,
}

impl PreparedStack {
    pub fn new(stack: &SlabStack) -> Result<Self, ModelError> {
        let Some(fronting) = stack.fronting().filter(|_| stack.slabs.len() >= 2) else {
            return Err(ModelError::TooFewSlabs {
                found: stack.slabs.len(),
            });
        };
        let reference = fronting.sld();

        let potential: Vec<Complex64> = stack
            .slabs
            .iter()
            .map(|s| (s.sld() - reference) * SLD_TO_POTENTIAL)
            .collect();
        let has_contrast = potential.iter().any(|p| *p != Complex64::new(0.0, 0.0));

        Ok(Self {
            thickness: stack.slabs.iter().map(|s| s.thickness).collect(),
            potential,
            roughness_sq: stack.slabs.iter().map(|s| s.roughness * s.roughness).collect(),
            scale: stack.scale,
            background: stack.background,
            has_contrast,
        })
    }

    /// Reflectivity at a single Q point.
    ///
    /// At `Q == 0` the amplitude is fixed at `-1` (total reflection) when any medium
    /// differs from the fronting and `0` otherwise, so the result is
    /// `background + scale` or `background`.
    pub fn reflectivity_at(&self, q: f64) -> f64 {
        self.background + self.scale * self.amplitude(q).norm_sqr()
    }

    /// Complex reflection amplitude `r(Q)` at the fronting interface.
    pub fn amplitude(&self, q: f64) -> Complex64 {
        if q == 0.0 {
            return if self.has_contrast {
                Complex64::new(-1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            };
        }

        let q2 = 0.25 * q * q;
        let n = self.potential.len();

        let mut kn = wavevector(q2, self.potential[n - 2]);
        let mut kn_next = wavevector(q2, self.potential[n - 1]);
        let mut amplitude = fresnel(kn, kn_next, self.roughness_sq[n - 1]);
        kn_next = kn;

        for j in (0..n - 2).rev() {
            kn = wavevector(q2, self.potential[j]);
            let rj = fresnel(kn, kn_next, self.roughness_sq[j + 1]);
            let beta = (Complex64::new(0.0, -2.0) * kn_next * self.thickness[j + 1]).exp();

            amplitude = (rj + amplitude * beta) / (1.0 + amplitude * beta * rj);
            kn_next = kn;
        }
        amplitude
    }
}

/// Normal wavevector component in a medium, principal branch.
#[inline]
pub fn wavevector(q2: f64, potential: Complex64) -> Complex64 {
    (Complex64::new(q2, 0.0) - potential).sqrt()
}

/// Roughness-attenuated Fresnel coefficient between two media.
///
/// Media whose wavevectors are both exactly zero are indistinguishable at this Q and
/// give a coefficient of zero. A zero roughness leaves the bare coefficient untouched.
#[inline]
pub fn fresnel(kn: Complex64, kn_next: Complex64, roughness_sq: f64) -> Complex64 {
    let sum = kn + kn_next;
    if sum == Complex64::new(0.0, 0.0) {
        return sum;
    }
    let r = (kn - kn_next) / sum;
    if roughness_sq == 0.0 {
        r
    } else {
        r * (-2.0 * kn * kn_next * roughness_sq).exp()
    }
}

/// Serial unsmeared reflectivity for every Q point.
pub fn abeles(q: &[f64], stack: &SlabStack) -> Result<Vec<f64>, ModelError> {
    let prepared = PreparedStack::new(stack)?;
    Ok(q.iter().map(|&qi| prepared.reflectivity_at(qi)).collect())
}
