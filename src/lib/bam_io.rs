//! BAM reader/writer helpers.
//!
//! Thin wrappers over `noodles` that map I/O failures onto the scsplit error
//! taxonomy: the alignment source maps to
//! [`SplitError::SourceUnreadable`], output sinks to
//! [`SplitError::SinkUnwritable`]. Readers and writers are single-threaded;
//! the split workload is I/O-bound and single-pass.

use std::fs::File;
use std::path::Path;

use noodles::bam;
use noodles::bgzf;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::Header;

use crate::errors::{Result, SplitError};

/// BAM reader over a BGZF-compressed file.
pub type BamReader = bam::io::Reader<bgzf::Reader<File>>;

/// BAM writer over a BGZF-compressed file.
pub type BamWriter = bam::io::Writer<bgzf::Writer<File>>;

/// Opens a BAM file and reads its header in one operation.
///
/// # Errors
/// Returns [`SplitError::SourceUnreadable`] if the file cannot be opened or
/// the header cannot be read.
pub fn open_bam_reader(path: &Path) -> Result<(BamReader, Header)> {
    let file = File::open(path).map_err(|source| SplitError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = bam::io::Reader::new(file);
    let header = reader.read_header().map_err(|source| SplitError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    Ok((reader, header))
}

/// Creates a BAM file and writes its header in one operation.
///
/// # Errors
/// Returns [`SplitError::SinkUnwritable`] if the file cannot be created or
/// the header cannot be written.
pub fn create_bam_writer(path: &Path, header: &Header) -> Result<BamWriter> {
    let file = File::create(path).map_err(|source| SplitError::SinkUnwritable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = bam::io::Writer::new(file);
    writer.write_header(header).map_err(|source| SplitError::SinkUnwritable {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(writer)
}

/// Flushes remaining blocks and writes the BGZF EOF marker.
///
/// # Errors
/// Returns [`SplitError::SinkUnwritable`] if finalization fails.
pub fn finish_bam_writer(writer: &mut BamWriter, header: &Header, path: &Path) -> Result<()> {
    AlignmentWrite::finish(writer, header).map_err(|source| SplitError::SinkUnwritable {
        path: path.to_path_buf(),
        source,
    })
}
