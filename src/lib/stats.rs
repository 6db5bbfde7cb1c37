//! Run counters for a split pass.
//!
//! Every classified record passes through [`SplitStats::observe`], which
//! increments exactly one counter. No other component touches the counters,
//! so `total() == routed + no_barcode + unknown_barcode + multimapped` holds
//! by construction.

use std::fmt;

use crate::classify::Outcome;

/// Per-category counters for one split run, read after the pass completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitStats {
    /// Number of output sinks created (one per accepted barcode)
    pub sink_count: usize,
    /// Records forwarded to a cell sink
    pub routed: u64,
    /// Records rejected for a missing CB tag
    pub no_barcode: u64,
    /// Records rejected for a barcode outside the accepted list
    pub unknown_barcode: u64,
    /// Records rejected as multi-mapped
    pub multimapped: u64,
}

impl SplitStats {
    /// Creates counters for a run with `sink_count` pre-allocated sinks.
    #[must_use]
    pub fn new(sink_count: usize) -> Self {
        SplitStats { sink_count, ..SplitStats::default() }
    }

    /// Records one classification outcome.
    pub fn observe(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Routed { .. } => self.routed += 1,
            Outcome::NoBarcodeTag => self.no_barcode += 1,
            Outcome::UnknownBarcode => self.unknown_barcode += 1,
            Outcome::MultiMapped => self.multimapped += 1,
        }
    }

    /// Total number of records observed.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.routed + self.no_barcode + self.unknown_barcode + self.multimapped
    }
}

impl fmt::Display for SplitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sinks={}, records={}, routed={}, no_barcode={}, unknown_barcode={}, multimapped={}",
            self.sink_count,
            self.total(),
            self.routed,
            self.no_barcode,
            self.unknown_barcode,
            self.multimapped
        )
    }
}
