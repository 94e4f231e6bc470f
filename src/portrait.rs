//! Phase-portrait geometry, the rendered artifact cached next to batches
//!
//! Building a portrait is much cheaper than solving the batch, so portraits
//! get a shorter TTL and are rebuilt from a still-live batch when they expire.

use serde::{Deserialize, Serialize};

use crate::constants::plot::*;
use crate::fingerprint::Fingerprint;
use crate::perf::stride_downsample;
use crate::solver::TrajectoryBatch;

/// How trajectories are drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortraitStyle {
    pub line_width: f32,
    pub alpha: f32,
    /// Only the first trajectories of a batch are drawn
    pub max_trajectories: usize,
}

impl Default for PortraitStyle {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            alpha: DEFAULT_ALPHA,
            max_trajectories: MAX_DISPLAYED_TRAJECTORIES,
        }
    }
}

/// Cache key of a portrait: batch fingerprint plus style in hundredths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortraitKey {
    pub fingerprint: Fingerprint,
    width_centi: u32,
    alpha_centi: u32,
    max_trajectories: usize,
}

impl PortraitKey {
    pub fn new(fingerprint: Fingerprint, style: &PortraitStyle) -> Self {
        Self {
            fingerprint,
            width_centi: (style.line_width.max(0.0) * 100.0).round() as u32,
            alpha_centi: (style.alpha.clamp(0.0, 1.0) * 100.0).round() as u32,
            max_trajectories: style.max_trajectories,
        }
    }
}

/// One drawn trajectory
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// `[position, velocity]` samples
    pub points: Vec<[f64; 2]>,
    /// Initial state marker
    pub start: [f64; 2],
    pub color: Rgba,
}

/// Straight (unmultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

/// Axis-aligned bounds of everything drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Bounds {
    fn include(&mut self, p: [f64; 2]) {
        for i in 0..2 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }
}

/// Prepared plot geometry for one batch and style
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhasePortrait {
    pub curves: Vec<Curve>,
    pub line_width: f32,
    /// Marker alpha is a little stronger than the line alpha
    pub marker_alpha: f32,
    pub bounds: Option<Bounds>,
}

impl PhasePortrait {
    pub fn build(batch: &TrajectoryBatch, style: &PortraitStyle) -> Self {
        profiling::scope!("build_portrait");

        let shown = &batch.trajectories()[..batch.len().min(style.max_trajectories)];
        let alpha = style.alpha.clamp(0.0, 1.0);
        let mut bounds: Option<Bounds> = None;

        let curves: Vec<Curve> = shown
            .iter()
            .enumerate()
            .map(|(i, traj)| {
                let raw: Vec<(f64, f64)> = traj
                    .position()
                    .iter()
                    .copied()
                    .zip(traj.velocity().iter().copied())
                    .collect();
                let points = stride_downsample(&raw, MAX_CURVE_POINTS);
                let start = [traj.initial().0, traj.initial().1];

                let b = bounds.get_or_insert(Bounds {
                    min: start,
                    max: start,
                });
                for &p in &points {
                    b.include(p);
                }
                b.include(start);

                Curve {
                    points,
                    start,
                    color: ramp_color(i, shown.len(), alpha),
                }
            })
            .collect();

        Self {
            curves,
            line_width: style.line_width,
            marker_alpha: (alpha + 0.2).min(0.8),
            bounds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

/// Color `index` of `count`, spread over the viridis window
fn ramp_color(index: usize, count: usize, alpha: f32) -> Rgba {
    let t = if count <= 1 {
        COLOR_RAMP_START
    } else {
        COLOR_RAMP_START + (COLOR_RAMP_END - COLOR_RAMP_START) * index as f64 / (count - 1) as f64
    };
    let [r, g, b] = viridis(t);
    Rgba([r, g, b, (alpha * 255.0).round() as u8])
}

/// Piecewise-linear viridis approximation
pub fn viridis(t: f64) -> [u8; 3] {
    const STOPS: [[u8; 3]; 9] = [
        [68, 1, 84],
        [71, 44, 122],
        [59, 81, 139],
        [44, 113, 142],
        [33, 144, 141],
        [39, 173, 129],
        [92, 200, 99],
        [170, 220, 50],
        [253, 231, 37],
    ];

    let scaled = t.clamp(0.0, 1.0) * (STOPS.len() - 1) as f64;
    let lo = (scaled.floor() as usize).min(STOPS.len() - 2);
    let frac = scaled - lo as f64;

    let mut out = [0u8; 3];
    for (c, slot) in out.iter_mut().enumerate() {
        let a = STOPS[lo][c] as f64;
        let b = STOPS[lo + 1][c] as f64;
        *slot = (a + (b - a) * frac).round() as u8;
    }
    out
}
