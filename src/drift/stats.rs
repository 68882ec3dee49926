//! Two-sample Kolmogorov-Smirnov test.
//!
//! The statistic is the largest vertical distance between the empirical CDFs of the
//! two samples. It is tracked internally on the integer scale `m * n * D` so that the
//! exact null distribution can decide "at least as extreme" without rounding.
use crate::constants::EXACT_KS_MAX_SIZE;
use crate::errors::DriftError;
use crate::utils::{items_to_strings, sort_floats};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::str::FromStr;

/// How the p-value of the KS statistic is computed.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum KsMethod {
    /// Exact while both samples hold at most `EXACT_KS_MAX_SIZE` values, asymptotic otherwise.
    #[default]
    Auto,
    /// Exact null distribution, `O(m * n)`.
    Exact,
    /// Kolmogorov limiting distribution with a small sample correction.
    Asymptotic,
}

impl KsMethod {
    /// Resolve `Auto` for the given sample sizes.
    pub fn resolve(self, m: usize, n: usize) -> KsMethod {
        match self {
            KsMethod::Auto if m.max(n) <= EXACT_KS_MAX_SIZE => KsMethod::Exact,
            KsMethod::Auto => KsMethod::Asymptotic,
            other => other,
        }
    }
}

impl FromStr for KsMethod {
    type Err = DriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Auto" | "auto" => Ok(KsMethod::Auto),
            "Exact" | "exact" => Ok(KsMethod::Exact),
            "Asymptotic" | "asymptotic" | "asymp" => Ok(KsMethod::Asymptotic),
            _ => Err(DriftError::ParseString(
                s.to_string(),
                "KsMethod".to_string(),
                items_to_strings(vec!["Auto", "Exact", "Asymptotic"]),
            )),
        }
    }
}

/// Outcome of a two-sample KS test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsTest {
    /// Maximum absolute difference between the two empirical CDFs, in `[0, 1]`.
    pub statistic: f64,
    /// Probability of a statistic at least this large if both samples share a distribution.
    pub p_value: f64,
    /// Number of non-missing reference values.
    pub n_reference: usize,
    /// Number of non-missing current values.
    pub n_current: usize,
}

/// Run a two-sample KS test.
///
/// `NaN` values are dropped from both samples first. Returns `None` when either
/// sample has no values left, there is nothing meaningful to compare then.
///
/// * `reference` - Baseline sample.
/// * `current` - Sample under evaluation.
/// * `method` - How to compute the p-value.
pub fn ks_2samp(reference: &[f64], current: &[f64], method: KsMethod) -> Option<KsTest> {
    let mut x: Vec<f64> = reference.iter().copied().filter(|v| !v.is_nan()).collect();
    let mut y: Vec<f64> = current.iter().copied().filter(|v| !v.is_nan()).collect();
    if x.is_empty() || y.is_empty() {
        return None;
    }
    sort_floats(&mut x);
    sort_floats(&mut y);

    let (m, n) = (x.len(), y.len());
    let d_scaled = scaled_statistic(&x, &y);
    let statistic = d_scaled as f64 / (m as f64 * n as f64);
    let p_value = match method.resolve(m, n) {
        KsMethod::Exact => exact_p_value(m, n, d_scaled),
        _ => asymptotic_p_value(m, n, statistic),
    };

    Some(KsTest {
        statistic: statistic.clamp(0.0, 1.0),
        p_value: p_value.clamp(0.0, 1.0),
        n_reference: m,
        n_current: n,
    })
}

/// `m * n * D` for two sorted samples.
fn scaled_statistic(x: &[f64], y: &[f64]) -> u128 {
    let (m, n) = (x.len(), y.len());
    let (mut i, mut j) = (0, 0);
    let mut d_max = 0;
    // Once one sample is exhausted the distance can only shrink.
    while i < m && j < n {
        let v = if x[i] <= y[j] { x[i] } else { y[j] };
        while i < m && x[i] <= v {
            i += 1;
        }
        while j < n && y[j] <= v {
            j += 1;
        }
        d_max = d_max.max(lattice_distance(i, j, m, n));
    }
    d_max
}

#[inline]
fn lattice_distance(i: usize, j: usize, m: usize, n: usize) -> u128 {
    let a = i as u128 * n as u128;
    let b = j as u128 * m as u128;
    a.abs_diff(b)
}

/// Exact two-sided p-value, `P(D >= d)` under the null hypothesis.
///
/// Walks every monotone lattice path from `(0, 0)` to `(m, n)`, each equally likely,
/// keeping the probability mass of the paths that never reach distance `d_scaled`.
/// `u[j]` holds that mass at `(i, j)` normalised by the number of paths to `(i, j)`.
pub fn exact_p_value(m: usize, n: usize, d_scaled: u128) -> f64 {
    if d_scaled == 0 {
        return 1.0;
    }
    let reached = |i: usize, j: usize| lattice_distance(i, j, m, n) >= d_scaled;

    let mut u = vec![0.0_f64; n + 1];
    u[0] = 1.0;
    for j in 1..=n {
        u[j] = if reached(0, j) { 0.0 } else { u[j - 1] };
    }
    for i in 1..=m {
        if reached(i, 0) {
            u[0] = 0.0;
        }
        for j in 1..=n {
            u[j] = if reached(i, j) { 0.0 } else { (u[j] * i as f64 + u[j - 1] * j as f64) / (i + j) as f64 };
        }
    }
    (1.0 - u[n]).clamp(0.0, 1.0)
}

/// Asymptotic two-sided p-value with Stephens' effective sample size correction.
pub fn asymptotic_p_value(m: usize, n: usize, statistic: f64) -> f64 {
    if statistic <= 0.0 {
        return 1.0;
    }
    let en = (m as f64 * n as f64) / (m + n) as f64;
    let sqrt_en = en.sqrt();
    kolmogorov_survival((sqrt_en + 0.12 + 0.11 / sqrt_en) * statistic)
}

/// Survival function of the Kolmogorov distribution, `Q(lambda) = P(K > lambda)`.
pub fn kolmogorov_survival(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    if lambda < 1.18 {
        // Jacobi theta form converges quickly for small lambda.
        let y = (-PI * PI / (8.0 * lambda * lambda)).exp();
        let cdf = (2.0 * PI).sqrt() / lambda * (y + y.powi(9) + y.powi(25) + y.powi(49));
        (1.0 - cdf).clamp(0.0, 1.0)
    } else {
        let mut p = 0.0;
        for k in 1..=100 {
            let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
            let term = sign * (-2.0 * f64::from(k).powi(2) * lambda.powi(2)).exp();
            p += term;
            if term.abs() < 1e-16 {
                break;
            }
        }
        (2.0 * p).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn range(a: i32, b: i32) -> Vec<f64> {
        (a..b).map(f64::from).collect()
    }

    #[test]
    fn test_identical_samples() {
        let x = range(1, 101);
        let res = ks_2samp(&x, &x, KsMethod::Auto).unwrap();
        assert_eq!(res.statistic, 0.0);
        assert_eq!(res.p_value, 1.0);
        assert_eq!(res.n_reference, 100);
        assert_eq!(res.n_current, 100);
    }

    #[test]
    fn test_disjoint_samples() {
        let x = range(1, 101);
        let y = range(1001, 1101);
        let res = ks_2samp(&x, &y, KsMethod::Auto).unwrap();
        assert_eq!(res.statistic, 1.0);
        assert!(res.p_value < 1e-10);
    }

    #[test]
    fn test_exact_small_known_values() {
        // Fully separated samples, p = 2 / C(10, 5).
        let res = ks_2samp(&range(1, 6), &range(6, 11), KsMethod::Exact).unwrap();
        assert_eq!(res.statistic, 1.0);
        assert!((res.p_value - 2.0 / 252.0).abs() < 1e-12);

        let res = ks_2samp(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], KsMethod::Exact).unwrap();
        assert!((res.p_value - 0.1).abs() < 1e-12);

        // Paths staying within one step of the diagonal: 8 of 20.
        let res = ks_2samp(&[1.0, 2.0, 3.0], &[2.5, 4.0, 5.0], KsMethod::Exact).unwrap();
        assert!((res.statistic - 2.0 / 3.0).abs() < 1e-12);
        assert!((res.p_value - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_unequal_sizes_statistic() {
        let res = ks_2samp(&[1.0, 2.0], &[1.5, 2.5, 3.5, 4.5], KsMethod::Auto).unwrap();
        // After 2.0 the reference CDF is 1.0 and the current CDF is 0.25.
        assert!((res.statistic - 0.75).abs() < 1e-12);
        assert!(res.p_value > 0.05);
    }

    #[test]
    fn test_missing_values_excluded() {
        let x = vec![1.0, f64::NAN, 2.0, 3.0];
        let y = vec![f64::NAN, 4.0, 5.0, 6.0];
        let with_nan = ks_2samp(&x, &y, KsMethod::Auto).unwrap();
        let without = ks_2samp(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], KsMethod::Auto).unwrap();
        assert_eq!(with_nan, without);
    }

    #[test]
    fn test_empty_sample_skipped() {
        assert!(ks_2samp(&[], &[1.0], KsMethod::Auto).is_none());
        assert!(ks_2samp(&[1.0], &[f64::NAN, f64::NAN], KsMethod::Auto).is_none());
    }

    #[test]
    fn test_exact_and_asymptotic_agree() {
        let x = range(0, 200);
        let y = range(20, 220);
        let exact = ks_2samp(&x, &y, KsMethod::Exact).unwrap();
        let asymp = ks_2samp(&x, &y, KsMethod::Asymptotic).unwrap();
        assert!((exact.statistic - 0.1).abs() < 1e-12);
        assert_eq!(exact.statistic, asymp.statistic);
        assert!(exact.p_value > 0.2 && exact.p_value < 0.35);
        assert!(asymp.p_value > 0.2 && asymp.p_value < 0.35);
        assert!((exact.p_value - asymp.p_value).abs() < 0.06);
    }

    #[test]
    fn test_auto_resolution() {
        assert_eq!(KsMethod::Auto.resolve(100, 100), KsMethod::Exact);
        assert_eq!(KsMethod::Auto.resolve(5600, 1400), KsMethod::Exact);
        assert_eq!(KsMethod::Auto.resolve(10_000, 10_000), KsMethod::Exact);
        assert_eq!(KsMethod::Auto.resolve(10_001, 20), KsMethod::Asymptotic);
        assert_eq!(KsMethod::Auto.resolve(usize::MAX, 2), KsMethod::Asymptotic);
        assert_eq!(KsMethod::Exact.resolve(50_000, 50_000), KsMethod::Exact);
        assert_eq!(KsMethod::Asymptotic.resolve(10, 10), KsMethod::Asymptotic);
    }

    #[test]
    fn test_auto_exact_for_unbalanced_split() {
        // A 80/20 split of a few thousand rows stays on the exact distribution.
        let mut rng = StdRng::seed_from_u64(42);
        let x: Vec<f64> = (0..5600).map(|_| rng.gen::<f64>()).collect();
        let y: Vec<f64> = (0..1400).map(|_| rng.gen::<f64>() + 0.02).collect();
        let auto = ks_2samp(&x, &y, KsMethod::Auto).unwrap();
        let exact = ks_2samp(&x, &y, KsMethod::Exact).unwrap();
        assert_eq!(auto, exact);
    }

    #[test]
    fn test_kolmogorov_survival() {
        assert_eq!(kolmogorov_survival(0.0), 1.0);
        assert!((kolmogorov_survival(1.3581) - 0.05).abs() < 1e-3);
        assert!((kolmogorov_survival(1.2238) - 0.10).abs() < 1e-3);
        assert!(kolmogorov_survival(0.3) > 0.99);
        assert!(kolmogorov_survival(3.0) < 1e-6);
        // Both series meet at the branch point.
        let below = kolmogorov_survival(1.18 - 1e-9);
        let above = kolmogorov_survival(1.18);
        assert!((below - above).abs() < 1e-6);
    }

    #[test]
    fn test_bounds_random_samples() {
        let mut rng = StdRng::seed_from_u64(1903);
        for _ in 0..50 {
            let m = rng.gen_range(1..60);
            let n = rng.gen_range(1..60);
            let shift: f64 = rng.gen_range(-1.0..1.0);
            let x: Vec<f64> = (0..m).map(|_| rng.gen::<f64>()).collect();
            let y: Vec<f64> = (0..n).map(|_| rng.gen::<f64>() + shift).collect();
            for method in [KsMethod::Exact, KsMethod::Asymptotic] {
                let res = ks_2samp(&x, &y, method).unwrap();
                assert!((0.0..=1.0).contains(&res.statistic));
                assert!((0.0..=1.0).contains(&res.p_value));
            }
        }
    }

    #[test]
    fn test_ks_method_from_str() {
        assert_eq!("Auto".parse::<KsMethod>().unwrap(), KsMethod::Auto);
        assert_eq!("exact".parse::<KsMethod>().unwrap(), KsMethod::Exact);
        assert_eq!("asymp".parse::<KsMethod>().unwrap(), KsMethod::Asymptotic);
        assert!(matches!("ks".parse::<KsMethod>(), Err(DriftError::ParseString(..))));
    }
}
