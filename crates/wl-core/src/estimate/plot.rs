//! Weibull probability-plot coordinates.
//!
//! Points live on Weibull paper: `x = ln t`, `y = ln(−ln(1 − F))`. Each
//! censoring kind is ranked on its own:
//!
//! - complete times use Bernard's median rank
//! - interval midpoints use Bernard's median rank
//! - left-censored times use half the median rank (failure happened earlier)
//! - right-censored times have no rank and are spread evenly on `y ∈ [−2, 0.5]`
//!
//! The fitted distribution is the straight line `y = β x − β ln η`.

use serde::Serialize;
use wl_math::{median_rank, weibull_plot_y};

use crate::model::{CensoringKind, Observation};

const RIGHT_CENSORED_Y_MIN: f64 = -2.0;
const RIGHT_CENSORED_Y_MAX: f64 = 0.5;
const LEFT_CENSORED_RANK_SCALE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub kind: CensoringKind,
}

/// The fitted line on Weibull paper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FittedLine {
    pub slope: f64,
    pub intercept: f64,
}

impl FittedLine {
    pub fn from_parameters(beta: f64, eta: f64) -> Self {
        Self {
            slope: beta,
            intercept: -beta * eta.ln(),
        }
    }

    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityPlot {
    /// Points grouped by kind (complete, interval, left, right), each group
    /// ascending in time.
    pub points: Vec<PlotPoint>,
    pub fitted_line: FittedLine,
}

impl ProbabilityPlot {
    pub fn build(observations: &[Observation], beta: f64, eta: f64) -> Self {
        let mut points = Vec::with_capacity(observations.len());

        for (kind, rank_scale) in [
            (CensoringKind::Complete, 1.0),
            (CensoringKind::IntervalCensored, 1.0),
            (CensoringKind::LeftCensored, LEFT_CENSORED_RANK_SCALE),
        ] {
            let times = sorted_times(observations, kind);
            let n = times.len();
            points.extend(times.into_iter().enumerate().map(|(i, t)| PlotPoint {
                x: t.ln(),
                y: weibull_plot_y(median_rank(i + 1, n) * rank_scale),
                kind,
            }));
        }

        let survivors = sorted_times(observations, CensoringKind::RightCensored);
        let span = survivors.len().saturating_sub(1).max(1) as f64;
        points.extend(survivors.into_iter().enumerate().map(|(i, t)| PlotPoint {
            x: t.ln(),
            y: RIGHT_CENSORED_Y_MIN + (RIGHT_CENSORED_Y_MAX - RIGHT_CENSORED_Y_MIN) * i as f64 / span,
            kind: CensoringKind::RightCensored,
        }));

        Self {
            points,
            fitted_line: FittedLine::from_parameters(beta, eta),
        }
    }

    pub fn points_of(&self, kind: CensoringKind) -> impl Iterator<Item = &PlotPoint> {
        self.points.iter().filter(move |p| p.kind == kind)
    }
}

/// Plotting time per record of `kind`, ascending. Records without a
/// positive time are skipped.
fn sorted_times(observations: &[Observation], kind: CensoringKind) -> Vec<f64> {
    let mut times: Vec<f64> = observations
        .iter()
        .filter(|obs| obs.kind == kind)
        .map(|obs| obs.pseudo_failure_time().unwrap_or(obs.time))
        .filter(|t| t.is_finite() && *t > 0.0)
        .collect();
    times.sort_by(f64::total_cmp);
    times
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed() -> Vec<Observation> {
        vec![
            Observation::complete(200.0),
            Observation::complete(100.0),
            Observation::right_censored(400.0),
            Observation::right_censored(320.0),
            Observation::right_censored(350.0),
            Observation::interval(100.0, 150.0),
            Observation::left_censored(80.0),
        ]
    }

    #[test]
    fn one_point_per_record() {
        let plot = ProbabilityPlot::build(&mixed(), 1.6, 290.0);
        assert_eq!(plot.points.len(), 7);
        assert_eq!(plot.points_of(CensoringKind::Complete).count(), 2);
        assert_eq!(plot.points_of(CensoringKind::RightCensored).count(), 3);
    }

    #[test]
    fn complete_points_are_ranked_in_time_order() {
        let plot = ProbabilityPlot::build(&mixed(), 1.6, 290.0);
        let complete: Vec<_> = plot.points_of(CensoringKind::Complete).collect();
        assert!((complete[0].x - 100.0f64.ln()).abs() < 1e-12);
        assert!((complete[0].y - weibull_plot_y(median_rank(1, 2))).abs() < 1e-12);
        assert!(complete[1].y > complete[0].y);
    }

    #[test]
    fn interval_uses_midpoint_and_left_uses_half_rank() {
        let plot = ProbabilityPlot::build(&mixed(), 1.6, 290.0);
        let interval = plot.points_of(CensoringKind::IntervalCensored).next().unwrap();
        assert!((interval.x - 125.0f64.ln()).abs() < 1e-12);
        let left = plot.points_of(CensoringKind::LeftCensored).next().unwrap();
        assert!((left.y - weibull_plot_y(median_rank(1, 1) * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn right_censored_spread_over_fixed_band() {
        let plot = ProbabilityPlot::build(&mixed(), 1.6, 290.0);
        let right: Vec<_> = plot.points_of(CensoringKind::RightCensored).collect();
        assert_eq!(right[0].y, -2.0);
        assert!((right[1].y - (-0.75)).abs() < 1e-12);
        assert_eq!(right[2].y, 0.5);
        assert!((right[0].x - 320.0f64.ln()).abs() < 1e-12);

        let single = ProbabilityPlot::build(&[Observation::right_censored(10.0)], 2.0, 5.0);
        assert_eq!(single.points[0].y, -2.0);
    }

    #[test]
    fn fitted_line_crosses_zero_at_eta() {
        let line = FittedLine::from_parameters(2.5, 300.0);
        assert!(line.y_at(300.0f64.ln()).abs() < 1e-12);
        assert_eq!(line.slope, 2.5);
    }

    #[test]
    fn empty_input_has_no_points() {
        let plot = ProbabilityPlot::build(&[], 2.0, 10.0);
        assert!(plot.points.is_empty());
    }
}
