//! Initial-condition generation
//!
//! Starting states depend on the trajectory count alone, so the result can be
//! cached by count (see [`crate::perf::ResultCache::initial_conditions`]).

use std::f64::consts::PI;

use crate::constants::initial::*;

/// Starting `(position, velocity)` of one trajectory
pub type InitialState = (f64, f64);

/// Generate exactly `count` starting states
///
/// Small counts get a systematic lattice over `[-π, π] × [-2, 2]`; larger
/// counts get a golden-ratio spiral, which avoids the clustering of a coarse
/// lattice once it no longer fits a square grid.
pub fn generate(count: usize) -> Vec<InitialState> {
    match count {
        0 => Vec::new(),
        1 => vec![SINGLE_STATE],
        n if n <= LATTICE_MAX_COUNT => lattice(n),
        n => golden_spiral(n),
    }
}

fn lattice(count: usize) -> Vec<InitialState> {
    let side = (count as f64).sqrt().floor() as usize + 1;
    let positions = linspace(-PI, PI, side);
    let velocities = linspace(-LATTICE_VELOCITY_SPAN, LATTICE_VELOCITY_SPAN, side);

    positions
        .iter()
        .flat_map(|&x| velocities.iter().map(move |&v| (x, v)))
        .take(count)
        .collect()
}

fn golden_spiral(count: usize) -> Vec<InitialState> {
    let phi = (1.0 + 5f64.sqrt()) / 2.0;
    let n = count as f64;

    (0..count)
        .map(|i| {
            let i = i as f64;
            let angle = 2.0 * PI * i / n;
            let position = (2.0 * PI * (i / phi)).rem_euclid(2.0 * PI) - PI;
            let velocity = SPIRAL_VELOCITY_AMPLITUDE * (angle * phi).sin();
            (position, velocity)
        })
        .collect()
}

/// `n` evenly spaced values over `[start, end]`, endpoints included
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
