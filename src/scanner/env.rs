use std::sync::Arc;

use crate::util::options::Options;

/// Per-worker counters kept by scanners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Scanners that completed `initialize`.
    pub scanners_initialized: u64,
    /// Scan segments handed out, including each scanner's first segment.
    pub segments: u64,
    /// Slots reported as holding a reference.
    pub slots_reported: u64,
    /// Scanners created by splitting.
    pub splits: u64,
    /// Array elements handed to split-off scanners.
    pub elements_split: u64,
}

impl ScanStats {
    /// Add the counts of `other` into `self`.
    pub fn merge(&mut self, other: &ScanStats) {
        self.scanners_initialized += other.scanners_initialized;
        self.segments += other.segments;
        self.slots_reported += other.slots_reported;
        self.splits += other.splits;
        self.elements_split += other.elements_split;
    }
}

/// The scanning environment of one collector worker.
///
/// Every scanner operation takes the environment of the worker driving it. It is not
/// thread-safe: each worker owns exactly one, just as it owns the scanners it advances.
pub struct ScanEnvironment {
    ordinal: usize,
    options: Arc<Options>,
    stats: ScanStats,
}

impl ScanEnvironment {
    pub fn new(ordinal: usize, options: Arc<Options>) -> Self {
        Self {
            ordinal,
            options,
            stats: ScanStats::default(),
        }
    }

    /// The ordinal of the worker that owns this environment.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut ScanStats {
        &mut self.stats
    }

    /// Return the counters collected so far and reset them.
    pub fn take_stats(&mut self) -> ScanStats {
        std::mem::take(&mut self.stats)
    }
}
