use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A pollable fraction-complete in `[0.0, 1.0]`.
pub trait ProgressProvider: Send + Sync {
    fn progress(&self) -> f32;
}

impl<F> ProgressProvider for F
where
    F: Fn() -> f32 + Send + Sync,
{
    fn progress(&self) -> f32 {
        self()
    }
}

/// Largest `f32` below 1.0.
const ALMOST_DONE: f32 = 0.999_999_94;

/// Shared progress scalar written by one worker and read by any number of observers.
///
/// Stored as the bits of an `f32`; for non-negative floats the bit pattern orders the
/// same way as the value, so `fetch_max` keeps the fraction monotonic.
#[derive(Debug, Default)]
pub struct Progress {
    bits: AtomicU32,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the fraction to `value` (clamped to `[0, 1]`). Never moves backwards.
    pub fn set(&self, value: f32) {
        // `-0.0` has the sign bit set and would win every `fetch_max`.
        let value = if value.is_nan() || value <= 0.0 {
            0.0
        } else {
            value.min(1.0)
        };
        self.bits.fetch_max(value.to_bits(), Ordering::AcqRel);
    }

    /// Records `completed` out of `total` units; an empty job is complete.
    /// Reports exactly 1.0 only once `completed` reaches `total`.
    pub fn set_fraction(&self, completed: usize, total: usize) {
        if total == 0 || completed >= total {
            self.set(1.0);
        } else {
            let fraction = (completed as f64 / total as f64) as f32;
            self.set(fraction.min(ALMOST_DONE));
        }
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }
}

impl ProgressProvider for Progress {
    fn progress(&self) -> f32 {
        self.get()
    }
}

/// Work that is already done.
#[derive(Debug, Clone, Copy, Default)]
pub struct Complete;

impl ProgressProvider for Complete {
    fn progress(&self) -> f32 {
        1.0
    }
}

/// Arithmetic mean of its sources, recomputed on every read.
#[derive(Clone, Default)]
pub struct CombinedProgress {
    sources: Vec<Arc<dyn ProgressProvider>>,
}

impl CombinedProgress {
    pub fn new(sources: Vec<Arc<dyn ProgressProvider>>) -> Self {
        Self { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl ProgressProvider for CombinedProgress {
    fn progress(&self) -> f32 {
        if self.sources.is_empty() {
            return 1.0;
        }
        let sum: f32 = self.sources.iter().map(|p| p.progress()).sum();
        sum / self.sources.len() as f32
    }
}

impl std::fmt::Debug for CombinedProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedProgress")
            .field("sources", &self.sources.len())
            .field("progress", &self.progress())
            .finish()
    }
}

pub fn combine_progress(sources: Vec<Arc<dyn ProgressProvider>>) -> CombinedProgress {
    CombinedProgress::new(sources)
}
