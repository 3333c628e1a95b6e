use crate::consts::SIMPLEX_SIZE;
use crate::space::{ParamConfig, ParamSpace};
use itertools::Itertools;

#[inline(always)]
fn euclidean_dist(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Largest pairwise distance between the vertices once mapped into the unit cube.
pub fn max_vertex_distance(space: &ParamSpace, configs: [&ParamConfig; SIMPLEX_SIZE]) -> f64 {
    let points: Vec<Vec<f64>> = configs.iter().map(|c| space.normalize(c)).collect();

    points
        .iter()
        .tuple_combinations()
        .map(|(a, b)| euclidean_dist(a, b))
        .fold(0.0, f64::max)
}

/// Circumradius of a regular simplex with edge `max_dist` in `space.len()`
/// dimensions. Used as an approximation for the actual (irregular) simplex.
pub fn simplex_radius(space: &ParamSpace, configs: [&ParamConfig; SIMPLEX_SIZE]) -> f64 {
    let max_dist = max_vertex_distance(space, configs);
    let ndim = space.len() as f64;
    max_dist * (ndim / (2.0 * (ndim + 1.0))).sqrt()
}

pub fn is_converged(
    space: &ParamSpace,
    configs: [&ParamConfig; SIMPLEX_SIZE],
    convergence_sphere: f64,
) -> bool {
    simplex_radius(space, configs) < convergence_sphere
}
