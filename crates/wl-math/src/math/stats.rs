//! Descriptive statistics and probability-plot helpers.

/// Arithmetic mean. NaN for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`). NaN for empty input.
pub fn population_std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    if m.is_nan() {
        return f64::NAN;
    }
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Pearson correlation coefficient of two equal-length series.
///
/// NaN when the lengths differ, fewer than two pairs are given, or either
/// series has zero variance.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }
    let mx = mean(x);
    let my = mean(y);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mx;
        let dy = yi - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let denom = (sxx * syy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return f64::NAN;
    }
    (sxy / denom).clamp(-1.0, 1.0)
}

/// Bernard's median-rank approximation `(rank - 0.3) / (n + 0.4)`.
///
/// `rank` is 1-based.
pub fn median_rank(rank: usize, n: usize) -> f64 {
    (rank as f64 - 0.3) / (n as f64 + 0.4)
}

/// Weibull probability-paper ordinate `ln(-ln(1 - p))`.
pub fn weibull_plot_y(p: f64) -> f64 {
    (-(-p).ln_1p()).ln()
}
