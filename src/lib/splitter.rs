//! The single-pass split loop.
//!
//! [`BamSplitter::run`] owns the whole lifecycle: open the source, allocate
//! every cell sink, drain the record stream, and close everything exactly
//! once. The pass moves through `Unopened -> SourceOpen -> SinksAllocated ->
//! Draining -> Closed` in order; the close transition runs unconditionally,
//! whether the loop drains the source or aborts on an unrecoverable I/O
//! error. Per-record anomalies (missing tag, unknown barcode, multi-mapped
//! read) are counted and skipped, never fatal.

use std::path::{Path, PathBuf};

use log::{info, warn};
use noodles::sam::Header;

use crate::bam_io::{open_bam_reader, BamReader};
use crate::classify::{classify, MultimapPolicy, Outcome};
use crate::enrich::{append_umi_to_name, stamp_read_group};
use crate::errors::{Result, SplitError};
use crate::header::add_program_record;
use crate::layout::GroupLayout;
use crate::progress::ProgressTracker;
use crate::registry::{load_barcodes, BarcodeIndex, BarcodeRegistry};
use crate::stats::SplitStats;

/// Configuration for one split run.
pub struct SplitConfig {
    /// Input BAM file
    pub input: PathBuf,
    /// Accepted-barcode list, one barcode per line
    pub barcode_file: PathBuf,
    /// Output directory; defaults to `<input parent>/output/`
    pub output_dir: Option<PathBuf>,
    /// Directory layout for per-cell BAMs
    pub layout: GroupLayout,
    /// Multi-mapping rejection policy
    pub policy: MultimapPolicy,
    /// Full command line, recorded as a @PG line in output headers
    pub command_line: Option<String>,
}

/// Splits one BAM file into one BAM per accepted cell barcode.
pub struct BamSplitter {
    config: SplitConfig,
}

impl BamSplitter {
    /// Creates a splitter for the given configuration.
    #[must_use]
    pub fn new(config: SplitConfig) -> Self {
        BamSplitter { config }
    }

    /// The effective output directory for this run.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        match &self.config.output_dir {
            Some(dir) => dir.clone(),
            None => {
                self.config.input.parent().unwrap_or_else(|| Path::new(".")).join("output")
            }
        }
    }

    /// Runs the split pass and returns the final counters.
    ///
    /// # Errors
    /// Structural failures (`SourceUnreadable`, `BarcodeSourceUnreadable`,
    /// `DuplicateBarcode`, `SinkUnwritable`) abort the run; every sink that
    /// was opened is closed before the error is returned.
    pub fn run(&self) -> Result<SplitStats> {
        // Unopened -> SourceOpen
        let (mut reader, header) = open_bam_reader(&self.config.input)?;
        info!("Opened alignment source {}", self.config.input.display());

        // SourceOpen -> SinksAllocated
        let barcodes = load_barcodes(&self.config.barcode_file)?;
        let index = BarcodeIndex::from_barcodes(barcodes)?;

        let template = match &self.config.command_line {
            Some(command_line) => {
                add_program_record(header.clone(), env!("CARGO_PKG_VERSION"), command_line)?
            }
            None => header.clone(),
        };

        let output_dir = self.output_dir();
        let mut registry =
            BarcodeRegistry::open(index, &output_dir, self.config.layout, &template)?;
        info!("Created {} cell sinks under {}", registry.len(), output_dir.display());

        let mut stats = SplitStats::new(registry.len());

        // SinksAllocated -> Draining
        let drained = self.drain(&mut reader, &header, &mut registry, &mut stats);

        // Draining -> Closed, forced on success and mid-pass errors alike.
        let closed = registry.close();
        if let Err(drain_err) = drained {
            // The read error wins, but a close failure behind it must not
            // vanish from the logs.
            if let Err(close_err) = closed {
                warn!("sink close failed after read error: {close_err}");
            }
            return Err(drain_err);
        }
        closed?;

        Ok(stats)
    }

    fn drain(
        &self,
        reader: &mut BamReader,
        header: &Header,
        registry: &mut BarcodeRegistry,
        stats: &mut SplitStats,
    ) -> Result<()> {
        let mut progress = ProgressTracker::new("Processed records");

        for result in reader.record_bufs(header) {
            let mut record = result.map_err(|source| SplitError::SourceUnreadable {
                path: self.config.input.clone(),
                source,
            })?;
            progress.inc();

            let outcome = classify(&record, self.config.policy, registry.index());
            stats.observe(&outcome);

            if let Outcome::Routed { ordinal } = outcome {
                let sink = registry.sink_mut(ordinal);
                append_umi_to_name(&mut record);
                if let Some(rg_id) = sink.read_group_id().map(str::to_string) {
                    stamp_read_group(&mut record, &rg_id);
                }
                sink.write(&record)?;
            }
        }

        progress.log_final();
        Ok(())
    }
}
