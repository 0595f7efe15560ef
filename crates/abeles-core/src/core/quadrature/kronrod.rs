//! Adaptive Gauss-Kronrod quadrature.
//!
//! Each interval is integrated with the 15-point Kronrod rule; the embedded 7-point
//! Gauss rule gives the error estimate. The interval with the largest estimated
//! error is bisected until the total error meets the tolerance or the subdivision
//! budget is exhausted.

const XGK: [f64; 8] = [
    0.991455371120812639206854697526329,
    0.949107912342758524526189684047851,
    0.864864423359769072789712788640926,
    0.741531185599394439863864773280788,
    0.586087235467691130294144845693013,
    0.405845151377397166906606412076961,
    0.207784955007898467600689403773245,
    0.000000000000000000000000000000000,
];

const WGK: [f64; 8] = [
    0.022935322010529224963732008058970,
    0.063092092629978553290700663189204,
    0.104790010322250183839876322541518,
    0.140653259715525918745189590510238,
    0.169004726639267902826583426598550,
    0.190350578064785409913256402421014,
    0.204432940075298892414161999234649,
    0.209482141084727828012999174891714,
];

/// Gauss weights for the nodes XGK[1], XGK[3], XGK[5] and the centre.
const WG: [f64; 4] = [
    0.129484966168869693270611432679082,
    0.279705391489276667901467771423780,
    0.381830050505118944950369775488975,
    0.417959183673469387755102040816327,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveOptions {
    pub absolute_tolerance: f64,
    pub relative_tolerance: f64,
    pub max_subdivisions: usize,
}

impl Default for AdaptiveOptions {
    fn default() -> Self {
        Self {
            absolute_tolerance: 0.0,
            relative_tolerance: 1e-10,
            max_subdivisions: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integral {
    pub value: f64,
    pub error: f64,
    pub evaluations: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

fn kronrod_15<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> Segment {
    let centre = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let f_centre = f(centre);
    let mut kronrod = f_centre * WGK[7];
    let mut gauss = f_centre * WG[3];

    for j in 0..7 {
        let dx = half * XGK[j];
        let pair = f(centre - dx) + f(centre + dx);
        kronrod += WGK[j] * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }

    Segment {
        a,
        b,
        value: kronrod * half,
        error: ((kronrod - gauss) * half).abs(),
    }
}

/// Integral of `f` over [a, b].
pub fn integrate<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, options: &AdaptiveOptions) -> Integral {
    let mut segments = vec![kronrod_15(&f, a, b)];
    let mut evaluations = 15;

    loop {
        let value: f64 = segments.iter().map(|s| s.value).sum();
        let error: f64 = segments.iter().map(|s| s.error).sum();
        let target = options
            .absolute_tolerance
            .max(options.relative_tolerance * value.abs());

        if error <= target || segments.len() > options.max_subdivisions {
            return Integral {
                value,
                error,
                evaluations,
                converged: error <= target,
            };
        }

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, x), (_, y)| x.error.total_cmp(&y.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let segment = segments.swap_remove(worst);
        let mid = 0.5 * (segment.a + segment.b);
        segments.push(kronrod_15(&f, segment.a, mid));
        segments.push(kronrod_15(&f, mid, segment.b));
        evaluations += 30;
    }
}
