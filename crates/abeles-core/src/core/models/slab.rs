use num_complex::Complex64;

/// One homogeneous medium of a slab model.
///
/// `roughness` is the width of the interface between this slab and the one above
/// it (closer to the fronting medium). The fronting slab's roughness and the
/// thickness of both semi-infinite media are unused.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Slab {
    pub thickness: f64,
    pub sld_real: f64,
    pub sld_imag: f64,
    pub roughness: f64,
}

impl Slab {
    pub fn new(thickness: f64, sld_real: f64, sld_imag: f64, roughness: f64) -> Self {
        Self {
            thickness,
            sld_real,
            sld_imag,
            roughness,
        }
    }

    /// A semi-infinite medium (thickness and roughness unused).
    pub fn semi_infinite(sld_real: f64, sld_imag: f64) -> Self {
        Self::new(0.0, sld_real, sld_imag, 0.0)
    }

    #[inline]
    pub fn sld(&self) -> Complex64 {
        Complex64::new(self.sld_real, self.sld_imag)
    }
}

/// A complete slab model: fronting, zero or more layers, backing, plus the
/// overall scale factor and additive background applied to the reflectivity.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabStack {
    pub scale: f64,
    pub background: f64,
    pub slabs: Vec<Slab>,
}

impl SlabStack {
    /// Assembles a stack from its parts. The backing slab's `roughness` is the
    /// roughness of the deepest interface.
    pub fn new(scale: f64, background: f64, fronting: Slab, layers: &[Slab], backing: Slab) -> Self {
        let mut slabs = Vec::with_capacity(layers.len() + 2);
        slabs.push(fronting);
        slabs.extend_from_slice(layers);
        slabs.push(backing);
        Self {
            scale,
            background,
            slabs,
        }
    }

    /// Number of finite layers between fronting and backing.
    pub fn num_layers(&self) -> usize {
        self.slabs.len().saturating_sub(2)
    }

    pub fn fronting(&self) -> Option<&Slab> {
        self.slabs.first()
    }

    pub fn backing(&self) -> Option<&Slab> {
        if self.slabs.len() < 2 {
            return None;
        }
        self.slabs.last()
    }

    pub fn layers(&self) -> &[Slab] {
        if self.slabs.len() < 2 {
            return &[];
        }
        &self.slabs[1..self.slabs.len() - 1]
    }

    /// Total thickness of the finite layers.
    pub fn total_thickness(&self) -> f64 {
        self.layers().iter().map(|s| s.thickness.abs()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stack() -> SlabStack {
        SlabStack::new(
            1.0,
            1e-7,
            Slab::semi_infinite(0.0, 0.0),
            &[Slab::new(100.0, 3.47, 0.0, 2.0), Slab::new(25.0, -0.5, 0.01, 4.0)],
            Slab::new(0.0, 2.07, 0.0, 3.0),
        )
    }

    #[test]
    fn new_orders_fronting_layers_backing() {
        let stack = sample_stack();
        assert_eq!(stack.slabs.len(), 4);
        assert_eq!(stack.num_layers(), 2);
        assert_eq!(stack.fronting().unwrap().sld_real, 0.0);
        assert_eq!(stack.backing().unwrap().sld_real, 2.07);
        assert_eq!(stack.layers()[0].thickness, 100.0);
        assert_eq!(stack.layers()[1].sld_imag, 0.01);
    }

    #[test]
    fn total_thickness_sums_only_finite_layers() {
        assert_eq!(sample_stack().total_thickness(), 125.0);
    }

    #[test]
    fn stack_without_layers_has_empty_layer_slice() {
        let stack = SlabStack::new(
            1.0,
            0.0,
            Slab::semi_infinite(0.0, 0.0),
            &[],
            Slab::semi_infinite(2.07, 0.0),
        );
        assert_eq!(stack.num_layers(), 0);
        assert!(stack.layers().is_empty());
        assert_eq!(stack.total_thickness(), 0.0);
    }

    #[test]
    fn degenerate_stack_reports_no_backing() {
        let stack = SlabStack {
            scale: 1.0,
            background: 0.0,
            slabs: vec![Slab::default()],
        };
        assert!(stack.backing().is_none());
        assert!(stack.layers().is_empty());
    }

    #[test]
    fn sld_combines_real_and_imaginary_parts() {
        let slab = Slab::new(10.0, 2.0, 0.5, 1.0);
        assert_eq!(slab.sld(), Complex64::new(2.0, 0.5));
    }
}
