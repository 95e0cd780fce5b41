//! Descriptive statistics and Welch's t-test
//!
//! The t-distribution tail is evaluated through the regularized incomplete
//! beta function: for `T ~ t(df)`,
//! `P(|T| >= |t|) = I_x(df/2, 1/2)` with `x = df / (df + t²)`.

use serde::Serialize;
use std::f64::consts::PI;

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Unbiased sample variance (n - 1 denominator), `None` below two values
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Result of a two-sample t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTest {
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    /// Two-sided p-value
    pub p_value: f64,
}

/// Welch's unequal-variance t-test of `mean(a) - mean(b)`
///
/// Returns `None` when the test is undefined: a sample with fewer than two
/// values, or zero variance in both samples.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Option<TTest> {
    let mean_a = mean(a)?;
    let mean_b = mean(b)?;
    let se2_a = sample_variance(a)? / a.len() as f64;
    let se2_b = sample_variance(b)? / b.len() as f64;

    let se2 = se2_a + se2_b;
    if se2 <= 0.0 || !se2.is_finite() {
        return None;
    }

    let t_statistic = (mean_a - mean_b) / se2.sqrt();

    // Welch-Satterthwaite
    let degrees_of_freedom = se2.powi(2)
        / (se2_a.powi(2) / (a.len() - 1) as f64 + se2_b.powi(2) / (b.len() - 1) as f64);

    Some(TTest {
        t_statistic,
        degrees_of_freedom,
        p_value: student_t_two_sided(t_statistic, degrees_of_freedom),
    })
}

/// Two-sided tail probability `P(|T| >= |t|)` for Student's t with `df`
pub fn student_t_two_sided(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    let x = df / (df + t * t);
    regularized_incomplete_beta(df / 2.0, 0.5, x).clamp(0.0, 1.0)
}

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEF: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the gamma function (Lanczos approximation), `x > 0`
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection formula
        return PI.ln() - (PI * x).sin().abs().ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let mut series = LANCZOS_COEF[0];
    for (i, coef) in LANCZOS_COEF.iter().enumerate().skip(1) {
        series += coef / (x + i as f64);
    }

    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

/// Regularized incomplete beta function `I_x(a, b)`
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();

    // The continued fraction converges fastest on this side of the mode
    if x < (a + 1.0) / (a + b + 2.0) {
        ln_front.exp() * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - ln_front.exp() * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Continued fraction for the incomplete beta (modified Lentz)
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITERATIONS: usize = 300;
    const EPSILON: f64 = 1e-15;
    const TINY: f64 = 1e-300;

    let guard = |v: f64| if v.abs() < TINY { TINY } else { v };

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        // Even step
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        h *= d * c;

        // Odd step
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }

    h
}

/// Five-number summary with Tukey whiskers, as drawn by a box plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within `q1 - 1.5 * IQR`
    pub whisker_low: f64,
    /// Largest value within `q3 + 1.5 * IQR`
    pub whisker_high: f64,
    /// Values beyond the whiskers
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Summarize a sample, `None` when empty
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let inside: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|v| *v >= low_fence && *v <= high_fence)
            .collect();
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            whisker_low: inside.first().copied().unwrap_or(q1),
            whisker_high: inside.last().copied().unwrap_or(q3),
            outliers,
        })
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_mean_and_variance() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[30.0, 34.0]), Some(32.0));
        assert_eq!(sample_variance(&[4.0]), None);
        assert_eq!(sample_variance(&[30.0, 34.0]), Some(8.0));
        assert_eq!(sample_variance(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), Some(32.0 / 7.0));
    }

    #[test]
    fn test_ln_gamma_known_values() {
        assert!(approx_eq(ln_gamma(1.0), 0.0, 1e-12));
        assert!(approx_eq(ln_gamma(5.0), 24.0_f64.ln(), 1e-12));
        assert!(approx_eq(ln_gamma(0.5), PI.sqrt().ln(), 1e-12));
        assert!(approx_eq(ln_gamma(0.25), 3.625_609_908_221_908_f64.ln(), 1e-10));
    }

    #[test]
    fn test_incomplete_beta_bounds_and_symmetry() {
        assert_eq!(regularized_incomplete_beta(2.0, 3.0, 0.0), 0.0);
        assert_eq!(regularized_incomplete_beta(2.0, 3.0, 1.0), 1.0);
        // I_x(1, 1) is the uniform CDF
        assert!(approx_eq(regularized_incomplete_beta(1.0, 1.0, 0.3), 0.3, 1e-12));
        // I_x(a, b) = 1 - I_{1-x}(b, a)
        let lhs = regularized_incomplete_beta(2.5, 4.0, 0.35);
        let rhs = 1.0 - regularized_incomplete_beta(4.0, 2.5, 0.65);
        assert!(approx_eq(lhs, rhs, 1e-12));
    }

    #[test]
    fn test_t_tail_closed_forms() {
        // df = 1 is Cauchy: P(|T| >= 1) = 0.5
        assert!(approx_eq(student_t_two_sided(1.0, 1.0), 0.5, 1e-12));
        // df = 2: P(|T| >= t) = 1 - t / sqrt(t² + 2)
        let expected = 1.0 - 2.0 / 6.0_f64.sqrt();
        assert!(approx_eq(student_t_two_sided(2.0, 2.0), expected, 1e-12));
        // Textbook critical value t(0.975, 10) = 2.228139
        assert!(approx_eq(student_t_two_sided(2.228_138_851_986, 10.0), 0.05, 1e-9));
        assert_eq!(student_t_two_sided(0.0, 5.0), 1.0);
        assert_eq!(student_t_two_sided(f64::INFINITY, 5.0), 0.0);
        assert!(student_t_two_sided(1.0, 0.0).is_nan());
    }

    #[test]
    fn test_welch_small_example() {
        let test = welch_t_test(&[30.0, 34.0], &[25.0, 27.0]).unwrap();
        assert!(approx_eq(test.t_statistic, 6.0 / 5.0_f64.sqrt(), 1e-12));
        assert!(approx_eq(test.degrees_of_freedom, 25.0 / 17.0, 1e-12));
        assert!(approx_eq(test.p_value, 0.157_963_453_949, 1e-9));
    }

    #[test]
    fn test_welch_matches_closed_form_at_two_df() {
        // Equal variances, n = 2 each: df = 2 exactly
        let test = welch_t_test(&[20.0, 18.0], &[14.0, 16.0]).unwrap();
        assert!(approx_eq(test.degrees_of_freedom, 2.0, 1e-12));
        assert!(approx_eq(test.t_statistic, 8.0_f64.sqrt(), 1e-12));
        let expected = 1.0 - 8.0_f64.sqrt() / 10.0_f64.sqrt();
        assert!(approx_eq(test.p_value, expected, 1e-12));
    }

    #[test]
    fn test_welch_is_not_the_pooled_test() {
        let a = [31.2, 29.8, 35.1, 33.0, 28.4, 30.9, 36.2, 32.5];
        let b = [27.1, 25.3, 28.8, 26.0, 24.9, 29.4];
        let test = welch_t_test(&a, &b).unwrap();

        assert!(approx_eq(test.t_statistic, 4.361_716_180_296, 1e-9));
        assert!(approx_eq(test.degrees_of_freedom, 11.989_036_023_174, 1e-9));
        assert!(approx_eq(test.p_value, 0.000_927_524_097, 1e-9));

        // The pooled test would use n_a + n_b - 2 = 12 degrees of freedom
        assert!((test.degrees_of_freedom - 12.0).abs() > 1e-3);
    }

    #[test]
    fn test_welch_sign_follows_difference() {
        let forward = welch_t_test(&[1.0, 2.0, 3.0], &[4.0, 5.0, 7.0]).unwrap();
        let reverse = welch_t_test(&[4.0, 5.0, 7.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!(forward.t_statistic < 0.0);
        assert!(approx_eq(forward.t_statistic, -reverse.t_statistic, 1e-12));
        assert!(approx_eq(forward.p_value, reverse.p_value, 1e-12));
    }

    #[test]
    fn test_welch_undefined_cases() {
        assert_eq!(welch_t_test(&[], &[1.0, 2.0]), None);
        assert_eq!(welch_t_test(&[1.0, 2.0], &[]), None);
        assert_eq!(welch_t_test(&[1.0], &[1.0, 2.0]), None);
        assert_eq!(welch_t_test(&[3.0, 3.0], &[5.0, 5.0]), None);
    }

    #[test]
    fn test_quantiles() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), 1.0);
        assert_eq!(quantile_sorted(&sorted, 0.5), 2.5);
        assert_eq!(quantile_sorted(&sorted, 0.25), 1.75);
        assert_eq!(quantile_sorted(&sorted, 1.0), 4.0);
        assert_eq!(quantile_sorted(&[7.0], 0.75), 7.0);
    }

    #[test]
    fn test_box_stats_with_outlier() {
        let stats = BoxStats::from_values(&[10.0, 12.0, 11.0, 13.0, 12.0, 40.0]).unwrap();
        assert_eq!(stats.count, 6);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 40.0);
        assert_eq!(stats.median, 12.0);
        assert_eq!(stats.outliers, vec![40.0]);
        assert_eq!(stats.whisker_high, 13.0);
        assert_eq!(stats.whisker_low, 10.0);
    }

    #[test]
    fn test_box_stats_empty() {
        assert_eq!(BoxStats::from_values(&[]), None);
    }
}
