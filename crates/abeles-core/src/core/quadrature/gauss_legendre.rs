//! Gauss-Legendre nodes and weights.
//!
//! The `n` nodes are the roots of the Legendre polynomial P_n(x) on [-1, 1]; the
//! rule integrates polynomials of degree 2n - 1 exactly.

use std::f64::consts::PI;

const NEWTON_TOLERANCE: f64 = 1e-15;
const NEWTON_MAX_ITERATIONS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct GaussLegendre {
    /// Nodes in ascending order.
    pub nodes: Vec<f64>,
    pub weights: Vec<f64>,
}

/// Evaluate P_n(x) and P'_n(x) with the three-term recurrence
/// (k+1) P_{k+1} = (2k+1) x P_k - k P_{k-1}.
///
/// The derivative uses P'_n = n (x P_n - P_{n-1}) / (x² - 1) and is only valid
/// away from the endpoints, which Gauss nodes never reach.
fn legendre_and_derivative(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }

    let mut p_prev = 1.0;
    let mut p_curr = x;
    for k in 1..n {
        let p_next = ((2 * k + 1) as f64 * x * p_curr - k as f64 * p_prev) / (k + 1) as f64;
        p_prev = p_curr;
        p_curr = p_next;
    }

    let dp = n as f64 * (x * p_curr - p_prev) / (x * x - 1.0);
    (p_curr, dp)
}

impl GaussLegendre {
    /// Rule of the given order, computed by Newton iteration from the asymptotic
    /// guess x_i ≈ cos(π (i + 3/4) / (n + 1/2)).
    pub fn new(order: usize) -> Self {
        let mut nodes = Vec::with_capacity(order);
        let mut weights = Vec::with_capacity(order);

        for i in 0..order {
            let mut x = (PI * (i as f64 + 0.75) / (order as f64 + 0.5)).cos();
            for _ in 0..NEWTON_MAX_ITERATIONS {
                let (p, dp) = legendre_and_derivative(order, x);
                let dx = p / dp;
                x -= dx;
                if dx.abs() < NEWTON_TOLERANCE {
                    break;
                }
            }
            let (_, dp) = legendre_and_derivative(order, x);
            nodes.push(-x);
            weights.push(2.0 / ((1.0 - x * x) * dp * dp));
        }

        Self { nodes, weights }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-13;

    fn approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn integrate<F: Fn(f64) -> f64>(rule: &GaussLegendre, a: f64, b: f64, f: F) -> f64 {
        let half = 0.5 * (b - a);
        let mid = 0.5 * (b + a);
        rule.nodes
            .iter()
            .zip(&rule.weights)
            .map(|(x, w)| w * f(mid + half * x))
            .sum::<f64>()
            * half
    }

    #[test]
    fn three_point_rule_matches_closed_form() {
        let rule = GaussLegendre::new(3);
        let root = (3.0f64 / 5.0).sqrt();
        assert!(approx_equal(rule.nodes[0], -root));
        assert!(approx_equal(rule.nodes[1], 0.0));
        assert!(approx_equal(rule.nodes[2], root));
        assert!(approx_equal(rule.weights[0], 5.0 / 9.0));
        assert!(approx_equal(rule.weights[1], 8.0 / 9.0));
        assert!(approx_equal(rule.weights[2], 5.0 / 9.0));
    }

    #[test]
    fn single_point_rule_is_midpoint() {
        let rule = GaussLegendre::new(1);
        assert_eq!(rule.nodes.len(), 1);
        assert!(approx_equal(rule.nodes[0], 0.0));
        assert!(approx_equal(rule.weights[0], 2.0));
    }

    #[test]
    fn zero_order_rule_is_empty() {
        assert!(GaussLegendre::new(0).nodes.is_empty());
    }

    #[test]
    fn weights_sum_to_interval_length() {
        for order in [2, 7, 13, 17, 50] {
            let sum: f64 = GaussLegendre::new(order).weights.iter().sum();
            assert!((sum - 2.0).abs() < 1e-12, "order {order}: sum {sum}");
        }
    }

    #[test]
    fn nodes_are_ascending_and_symmetric() {
        let rule = GaussLegendre::new(13);
        assert!(rule.nodes.windows(2).all(|w| w[1] > w[0]));
        for (a, b) in rule.nodes.iter().zip(rule.nodes.iter().rev()) {
            assert!((a + b).abs() < 1e-14);
        }
    }

    #[test]
    fn rule_integrates_polynomials_of_degree_two_n_minus_one_exactly() {
        let rule = GaussLegendre::new(5);
        let integral = integrate(&rule, 0.0, 2.0, |x| x.powi(9) - 3.0 * x.powi(4) + 1.0);
        let exact = 2f64.powi(10) / 10.0 - 3.0 * 2f64.powi(5) / 5.0 + 2.0;
        assert!((integral - exact).abs() < 1e-10);
    }

    #[test]
    fn high_order_rule_integrates_gaussian() {
        let rule = GaussLegendre::new(40);
        let integral = integrate(&rule, -6.0, 6.0, |x| (-0.5 * x * x).exp());
        let exact = (2.0 * PI).sqrt() * libm::erf(6.0 / 2f64.sqrt());
        assert!((integral - exact).abs() < 1e-12);
    }
}
