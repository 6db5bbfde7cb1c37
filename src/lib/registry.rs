//! The accepted-barcode list and the arena of per-cell output sinks.
//!
//! Sinks are allocated eagerly, one per accepted barcode, before the first
//! record is read: the alignment pass is single-pass and streaming, so
//! opening sinks on demand would risk header duplication or record
//! reordering, and pre-allocation keeps the hot loop allocation-free. The
//! arena is indexed by ordinal with a secondary barcode-to-ordinal lookup
//! table; the barcode's ordinal is its 1-based position in the list.

use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::record_buf::RecordBuf;
use noodles::sam::Header;

use crate::bam_io::{self, BamWriter};
use crate::errors::{Result, SplitError};
use crate::header::build_cell_header;
use crate::layout::GroupLayout;

/// Loads the accepted-barcode list: newline-delimited barcodes, no header
/// row, order significant. Blank lines are skipped.
///
/// # Errors
/// Returns [`SplitError::BarcodeSourceUnreadable`] if the list cannot be
/// read.
pub fn load_barcodes(path: &Path) -> Result<Vec<String>> {
    let file = fs::File::open(path).map_err(|source| SplitError::BarcodeSourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut barcodes = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| SplitError::BarcodeSourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let barcode = line.trim();
        if !barcode.is_empty() {
            barcodes.push(barcode.to_string());
        }
    }

    Ok(barcodes)
}

/// Ordered barcode list with a barcode-to-ordinal lookup table.
///
/// Ordinals are 1-based load positions and are stable for the lifetime of
/// the index.
#[derive(Debug, Clone, Default)]
pub struct BarcodeIndex {
    barcodes: Vec<String>,
    ordinals: HashMap<String, usize>,
}

impl BarcodeIndex {
    /// Builds the index from barcodes in list order.
    ///
    /// # Errors
    /// Returns [`SplitError::DuplicateBarcode`] on the first repeated
    /// barcode. Silently remapping a duplicate would leak the earlier
    /// sink's handle; failing fast surfaces the input-quality hazard
    /// instead.
    pub fn from_barcodes(barcodes: Vec<String>) -> Result<Self> {
        let mut ordinals = HashMap::with_capacity(barcodes.len());
        for (position, barcode) in barcodes.iter().enumerate() {
            let ordinal = position + 1;
            if let Some(first) = ordinals.insert(barcode.clone(), ordinal) {
                return Err(SplitError::DuplicateBarcode {
                    barcode: barcode.clone(),
                    first,
                    second: ordinal,
                });
            }
        }
        Ok(BarcodeIndex { barcodes, ordinals })
    }

    /// Returns the ordinal assigned to a barcode, if it is accepted.
    #[must_use]
    pub fn get(&self, barcode: &str) -> Option<usize> {
        self.ordinals.get(barcode).copied()
    }

    /// Number of accepted barcodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.barcodes.len()
    }

    /// Returns true when the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.barcodes.is_empty()
    }

    /// Iterates `(ordinal, barcode)` pairs in load order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.barcodes.iter().enumerate().map(|(i, b)| (i + 1, b.as_str()))
    }
}

/// One per-cell output sink: an open BAM writer plus the metadata needed to
/// route and enrich records destined for it.
///
/// Owned exclusively by the registry for its entire lifetime and closed
/// exactly once at shutdown.
pub struct CellSink {
    /// 1-based position of the barcode in the accepted list
    pub ordinal: usize,
    /// The cell barcode this sink collects
    pub barcode: String,
    /// Directory group, `None` in the flat layout
    pub group: Option<usize>,
    /// Output path of the BAM file
    pub path: PathBuf,
    header: Header,
    read_group_id: Option<String>,
    writer: BamWriter,
}

impl CellSink {
    /// Opens the sink: computes its group and path, creates the group
    /// directory (lazily, idempotently), derives the per-cell header, and
    /// writes it.
    fn open(
        ordinal: usize,
        barcode: &str,
        output_dir: &Path,
        layout: GroupLayout,
        template: &Header,
    ) -> Result<Self> {
        let group = layout.group_id(ordinal);
        let path = layout.sink_path(output_dir, ordinal, barcode);
        layout.ensure_sink_dir(output_dir, ordinal).map_err(|source| {
            SplitError::SinkUnwritable { path: path.clone(), source }
        })?;

        let header = build_cell_header(template, ordinal, barcode)?;
        let read_group_id = header.read_groups().keys().next().map(|id| id.to_string());
        let writer = bam_io::create_bam_writer(&path, &header)?;

        Ok(CellSink {
            ordinal,
            barcode: barcode.to_string(),
            group,
            path,
            header,
            read_group_id,
            writer,
        })
    }

    /// The ID of the sink header's read group, if it declares one.
    #[must_use]
    pub fn read_group_id(&self) -> Option<&str> {
        self.read_group_id.as_deref()
    }

    /// Forwards a record to this sink.
    ///
    /// # Errors
    /// Returns [`SplitError::SinkUnwritable`]; a failed write aborts the
    /// run, never a silent partial-output success.
    pub fn write(&mut self, record: &RecordBuf) -> Result<()> {
        self.writer.write_alignment_record(&self.header, record).map_err(|source| {
            SplitError::SinkUnwritable { path: self.path.clone(), source }
        })
    }

    /// Closes the sink, flushing remaining blocks and the BGZF EOF marker.
    fn finish(mut self) -> Result<()> {
        bam_io::finish_bam_writer(&mut self.writer, &self.header, &self.path)
    }
}

/// The barcode index plus the sink arena, built before the main pass.
pub struct BarcodeRegistry {
    index: BarcodeIndex,
    sinks: Vec<CellSink>,
}

impl BarcodeRegistry {
    /// Opens one sink per accepted barcode, in list order.
    ///
    /// # Errors
    /// Any sink already opened when a later one fails is closed before the
    /// error propagates, so no handle leaks out of a partially-failed load.
    pub fn open(
        index: BarcodeIndex,
        output_dir: &Path,
        layout: GroupLayout,
        template: &Header,
    ) -> Result<Self> {
        fs::create_dir_all(output_dir).map_err(|source| SplitError::SinkUnwritable {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let mut sinks = Vec::with_capacity(index.len());
        for (ordinal, barcode) in index.iter() {
            match CellSink::open(ordinal, barcode, output_dir, layout, template) {
                Ok(sink) => sinks.push(sink),
                Err(e) => {
                    for sink in sinks {
                        let _ = sink.finish();
                    }
                    return Err(e);
                }
            }
        }

        Ok(BarcodeRegistry { index, sinks })
    }

    /// The barcode-to-ordinal lookup table.
    #[must_use]
    pub fn index(&self) -> &BarcodeIndex {
        &self.index
    }

    /// Number of sinks in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Returns true when the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// The sinks in ordinal order.
    #[must_use]
    pub fn sinks(&self) -> &[CellSink] {
        &self.sinks
    }

    /// The sink for a 1-based ordinal. The ordinal must come from this
    /// registry's own index.
    pub fn sink_mut(&mut self, ordinal: usize) -> &mut CellSink {
        &mut self.sinks[ordinal - 1]
    }

    /// Closes every sink exactly once. Keeps closing after a failure and
    /// reports the first error.
    pub fn close(self) -> Result<()> {
        let mut first_error = None;
        for sink in self.sinks {
            if let Err(e) = sink.finish() {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
