//! # Mutation Primitives
//!
//! Bounded perturbations of decision vectors. Every primitive draws only from
//! the [`RandomNumberGenerator`] it is handed, so a run is reproduced exactly by
//! replaying the same stream.
//!
//! A perturbation that leaves the box is reflected back across the violated
//! bound; if it is still outside after one reflection (a step larger than the
//! box) it is clamped. Mutation therefore never rejects a candidate and never
//! loops.

use crate::problem::Bounds;
use crate::rng::RandomNumberGenerator;

/// Reflects `value` into `[lower, upper]`, clamping if one reflection is not enough.
pub fn reflect_into(value: f64, lower: f64, upper: f64) -> f64 {
    let reflected = if value < lower {
        lower + (lower - value)
    } else if value > upper {
        upper - (value - upper)
    } else {
        return value;
    };
    reflected.clamp(lower, upper)
}

/// Replaces coordinate `index` of `x` with a uniform draw from its bounds.
pub fn resample_uniform(
    x: &mut [f64],
    index: usize,
    bounds: &Bounds,
    rng: &mut RandomNumberGenerator,
) {
    x[index] = rng.uniform(bounds.lower()[index], bounds.upper()[index]);
}

/// Adds Gaussian noise with standard deviation `sigma * (upper - lower)` to
/// coordinate `index` of `x`, then reflects it into the bounds.
pub fn gaussian_perturb(
    x: &mut [f64],
    index: usize,
    sigma: f64,
    bounds: &Bounds,
    rng: &mut RandomNumberGenerator,
) {
    let lower = bounds.lower()[index];
    let upper = bounds.upper()[index];
    let step = rng.normal() * sigma * (upper - lower);
    x[index] = reflect_into(x[index] + step, lower, upper);
}

/// Perturbs each coordinate of `x` with probability `1 / dim`.
///
/// At least one coordinate is always perturbed. Returns the number of
/// perturbed coordinates.
pub fn mutate_coordinates(
    x: &mut [f64],
    sigma: f64,
    bounds: &Bounds,
    rng: &mut RandomNumberGenerator,
) -> usize {
    let dim = x.len();
    let rate = 1.0 / dim as f64;
    let mut mutated = 0;
    for index in 0..dim {
        if rng.probability() < rate {
            gaussian_perturb(x, index, sigma, bounds, rng);
            mutated += 1;
        }
    }
    if mutated == 0 {
        let index = rng.index(dim);
        gaussian_perturb(x, index, sigma, bounds, rng);
        mutated = 1;
    }
    mutated
}
