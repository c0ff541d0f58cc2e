//! Two-parameter Nelder–Mead simplex minimizer.
//!
//! Standard coefficients (ρ, χ, γ, σ) = (1, 2, ½, ½). Each iteration
//! sorts the three vertices, tests convergence, then tries in turn:
//!
//! 1. reflection `x_r = c + ρ(c − x_w)`, accepted when `f_b ≤ f_r < f_s`
//! 2. expansion `x_e = c + χ(x_r − c)` when `f_r < f_b`, keeping the better
//! 3. outside contraction `c + γ(x_r − c)` when `f_s ≤ f_r < f_w`, accepted if `f_c ≤ f_r`
//! 4. inside contraction `c − γ(c − x_w)` when `f_r ≥ f_w`, accepted if `f_c < f_w`
//! 5. otherwise shrink the two worst vertices toward the best by σ
//!
//! where `c` is the centroid of the best (b) and second-worst (s) vertices.
//! Reaching the iteration cap is not an error: the best vertex is returned
//! with `converged = false`.

use serde::Serialize;
use wl_config::SimplexParams;

type Point = [f64; 2];

/// Terminal state of one simplex run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimplexOutcome {
    /// Best vertex found.
    pub point: Point,
    /// Objective value at `point`.
    pub value: f64,
    pub iterations: usize,
    pub evaluations: usize,
    /// Whether both spreads fell below tolerance before the cap.
    pub converged: bool,
}

/// Nelder–Mead minimizer configured from [`SimplexParams`].
#[derive(Debug, Clone)]
pub struct NelderMead {
    params: SimplexParams,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self::new(SimplexParams::default())
    }
}

impl NelderMead {
    pub fn new(params: SimplexParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SimplexParams {
        &self.params
    }

    /// Initial simplex around `start`, perturbing one coordinate per vertex.
    pub fn initial_simplex(&self, start: Point) -> [Point; 3] {
        let scale = 1.0 + self.params.initial_step;
        let offset = self.params.initial_offset;
        [
            start,
            [start[0] * scale + offset, start[1]],
            [start[0], start[1] * scale + offset],
        ]
    }

    /// Minimize `f` starting from `start`.
    pub fn minimize<F>(&self, f: F, start: Point) -> SimplexOutcome
    where
        F: Fn(Point) -> f64,
    {
        let p = &self.params;
        let mut evaluations = 0usize;
        let mut eval = |x: Point| {
            evaluations += 1;
            f(x)
        };

        let mut simplex = self.initial_simplex(start);
        let mut values = [eval(simplex[0]), eval(simplex[1]), eval(simplex[2])];
        let mut iterations = 0usize;
        let mut converged = false;

        while iterations < p.max_iterations {
            sort_simplex(&mut simplex, &mut values);

            if spreads_within(&simplex, &values, p.tol_fun, p.tol_x) {
                converged = true;
                break;
            }
            iterations += 1;

            let centroid = midpoint(simplex[0], simplex[1]);
            let worst = simplex[2];

            let reflected = along(centroid, worst, -p.reflection);
            let f_r = eval(reflected);

            if f_r >= values[0] && f_r < values[1] {
                simplex[2] = reflected;
                values[2] = f_r;
                continue;
            }

            if f_r < values[0] {
                let expanded = along(centroid, reflected, p.expansion);
                let f_e = eval(expanded);
                if f_e < f_r {
                    simplex[2] = expanded;
                    values[2] = f_e;
                } else {
                    simplex[2] = reflected;
                    values[2] = f_r;
                }
                continue;
            }

            if f_r < values[2] {
                let contracted = along(centroid, reflected, p.contraction);
                let f_c = eval(contracted);
                if f_c <= f_r {
                    simplex[2] = contracted;
                    values[2] = f_c;
                    continue;
                }
            } else {
                let contracted = along(centroid, worst, p.contraction);
                let f_c = eval(contracted);
                if f_c < values[2] {
                    simplex[2] = contracted;
                    values[2] = f_c;
                    continue;
                }
            }

            let best = simplex[0];
            for i in 1..3 {
                simplex[i] = along(best, simplex[i], p.shrink);
                values[i] = eval(simplex[i]);
            }
        }

        sort_simplex(&mut simplex, &mut values);
        SimplexOutcome {
            point: simplex[0],
            value: values[0],
            iterations,
            evaluations,
            converged,
        }
    }
}

/// `from + t · (to − from)`. Negative `t` reflects through `from`.
fn along(from: Point, to: Point, t: f64) -> Point {
    [from[0] + t * (to[0] - from[0]), from[1] + t * (to[1] - from[1])]
}

fn midpoint(a: Point, b: Point) -> Point {
    [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]
}

/// Ascending by value; stable, so equal values keep their vertex order.
fn sort_simplex(simplex: &mut [Point; 3], values: &mut [f64; 3]) {
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let (s, v) = (*simplex, *values);
    for (slot, &i) in order.iter().enumerate() {
        simplex[slot] = s[i];
        values[slot] = v[i];
    }
}

fn spreads_within(simplex: &[Point; 3], values: &[f64; 3], tol_fun: f64, tol_x: f64) -> bool {
    let f_spread = (values[2] - values[0]).abs();
    let x_spread = (0..2)
        .map(|j| (simplex[2][j] - simplex[0][j]).abs())
        .fold(0.0, f64::max);
    f_spread < tol_fun && x_spread < tol_x
}
