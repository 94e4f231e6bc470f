//! Performance layer
//!
//! - TTL result cache for batches, portraits and initial conditions
//! - Background worker that keeps solving off the UI thread
//! - Curve downsampling for drawing
//! - Instrumentation via the `profiling` crate (puffin/tracy backends)

mod cache;
mod downsample;
mod worker;

pub use cache::{CacheEntry, CacheStats, CacheTtls, ResultCache, TtlCache};
pub use downsample::stride_downsample;
pub use worker::{BackgroundWorker, WorkerRequest, WorkerResult};

// Re-export profiling macros for convenience
// When no profiling feature is enabled, these become no-ops
pub use profiling;

/// Timing macro for instrumentation
#[macro_export]
macro_rules! timed {
    ($name:expr, $block:expr) => {{
        profiling::scope!($name);
        let _t = std::time::Instant::now();
        let r = $block;
        tracing::debug!(elapsed = ?_t.elapsed(), "{}", $name);
        r
    }};
}
