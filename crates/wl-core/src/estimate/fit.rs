//! Probability-plot goodness of fit.

use wl_math::{median_rank, pearson_correlation, weibull_plot_y};

use crate::model::{CensoringKind, Observation};

/// R² of the Weibull probability plot.
///
/// Complete times and interval midpoints are pooled and sorted; the i-th
/// (1-based) time is plotted at `(ln t, ln(−ln(1 − MR)))` with Bernard's
/// median rank `MR = (i − 0.3) / (n + 0.4)`. Left-censored and
/// right-censored records do not enter the plot.
///
/// Returns 0 with fewer than two points or when the correlation is
/// undefined (all times equal).
pub fn r_squared(observations: &[Observation]) -> f64 {
    let mut times: Vec<f64> = observations
        .iter()
        .filter(|obs| {
            matches!(
                obs.kind,
                CensoringKind::Complete | CensoringKind::IntervalCensored
            )
        })
        .filter_map(Observation::pseudo_failure_time)
        .filter(|t| t.is_finite() && *t > 0.0)
        .collect();

    if times.len() < 2 {
        return 0.0;
    }
    times.sort_by(f64::total_cmp);

    let n = times.len();
    let x: Vec<f64> = times.iter().map(|t| t.ln()).collect();
    let y: Vec<f64> = (1..=n).map(|rank| weibull_plot_y(median_rank(rank, n))).collect();

    let r = pearson_correlation(&x, &y);
    if r.is_nan() {
        return 0.0;
    }
    (r * r).clamp(0.0, 1.0)
}
