//! Curve downsampling for drawing
//!
//! Phase-space curves are not monotonic in x, so bucket-based schemes do not
//! apply; a fixed stride keeps the shape and the ordering.

/// Keep every n-th point so that at most `target` points remain
pub fn stride_downsample(data: &[(f64, f64)], target: usize) -> Vec<[f64; 2]> {
    if target == 0 {
        return Vec::new();
    }
    if data.len() <= target {
        return data.iter().map(|&(x, y)| [x, y]).collect();
    }

    let step = data.len().div_ceil(target);
    data.iter().step_by(step).map(|&(x, y)| [x, y]).collect()
}
