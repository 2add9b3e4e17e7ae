//! Step observer trait for monitoring solver progress.

use alloc::collections::BTreeMap;

/// Trait for observing solver steps.
///
/// Implement this trait to monitor solver progress (e.g., for debugging,
/// visualization, or performance profiling). All methods have default
/// no-op implementations, so an unused hook costs nothing once inlined.
pub trait StepObserver {
    /// Called after the grid has been rebuilt for `active` particles.
    fn on_grid_rebuilt(&mut self, _active: usize) {}

    /// Called for every particle pair handed to the narrow phase.
    ///
    /// `a` is the particle being processed, `b` the earlier neighbour.
    fn on_pair_tested(&mut self, _a: usize, _b: usize) {}

    /// Called after all active particles have been integrated.
    fn on_integrate(&mut self) {}

    /// Called when sub-step `substep` has finished.
    fn on_substep_complete(&mut self, _substep: usize) {}

    /// Called when an `update` is fully complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}

/// Counts how often each unordered particle pair reaches the narrow phase.
///
/// Debugging aid for the broad phase: within one pass every pair in the
/// neighbourhood window should be counted exactly once.
#[derive(Default, Debug)]
pub struct PairCounter {
    pairs: BTreeMap<(usize, usize), u32>,
    tests: u64,
}

impl PairCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `(a, b)` was tested, in either order.
    pub fn count(&self, a: usize, b: usize) -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        self.pairs.get(&key).copied().unwrap_or(0)
    }

    /// Number of distinct pairs seen.
    pub fn distinct(&self) -> usize {
        self.pairs.len()
    }

    /// Total number of narrow-phase tests.
    pub fn total(&self) -> u64 {
        self.tests
    }

    /// Largest count recorded for any single pair.
    pub fn max_count(&self) -> u32 {
        self.pairs.values().copied().max().unwrap_or(0)
    }

    /// Iterate `((low, high), count)` in ascending pair order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), u32)> + '_ {
        self.pairs.iter().map(|(k, v)| (*k, *v))
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
        self.tests = 0;
    }
}

impl StepObserver for PairCounter {
    fn on_pair_tested(&mut self, a: usize, b: usize) {
        let key = if a < b { (a, b) } else { (b, a) };
        *self.pairs.entry(key).or_insert(0) += 1;
        self.tests += 1;
    }
}
