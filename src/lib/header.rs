//! Per-cell SAM header construction and @PG record management.
//!
//! Each cell sink gets its own clone of the source header whose read groups
//! are replaced by a single read group identifying the cell, so downstream
//! tools can trace a record's cell of origin from read-group metadata alone.

use bstr::BString;
use noodles::sam::header::record::value::map::program::tag as pg_tag;
use noodles::sam::header::record::value::map::read_group::tag as rg_tag;
use noodles::sam::header::record::value::map::{Program, ReadGroup};
use noodles::sam::header::record::value::Map;
use noodles::sam::Header;

use crate::errors::{Result, SplitError};

/// Program name recorded in @PG lines.
pub const PROGRAM_NAME: &str = "scsplit";

/// Sequencing platform recorded in per-cell read groups.
const PLATFORM: &str = "ILLUMINA";

/// Returns the canonical cell identifier, `cell_<ordinal>_<barcode>`.
///
/// Used for output file names, read-group samples, and samplesheet rows.
#[must_use]
pub fn cell_id(ordinal: usize, barcode: &str) -> String {
    format!("cell_{ordinal}_{barcode}")
}

/// Builds the header for one cell sink: a clone of the source header whose
/// read groups are replaced by a single read group with `ID = <ordinal>`,
/// `SM = cell_<ordinal>_<barcode>` and `PL = ILLUMINA`.
pub fn build_cell_header(template: &Header, ordinal: usize, barcode: &str) -> Result<Header> {
    let read_group = Map::<ReadGroup>::builder()
        .insert(rg_tag::SAMPLE, cell_id(ordinal, barcode))
        .insert(rg_tag::PLATFORM, PLATFORM)
        .build()
        .map_err(|e| SplitError::InvalidHeader { reason: e.to_string() })?;

    let mut header = template.clone();
    let read_groups = header.read_groups_mut();
    read_groups.clear();
    read_groups.insert(BString::from(ordinal.to_string()), read_group);

    Ok(header)
}

/// Appends a @PG record carrying the program name, version, and command line
/// to the header, choosing an ID that does not collide with existing
/// programs.
pub fn add_program_record(
    mut header: Header,
    version: &str,
    command_line: &str,
) -> Result<Header> {
    let id = unique_program_id(&header);
    let program = Map::<Program>::builder()
        .insert(pg_tag::NAME, PROGRAM_NAME)
        .insert(pg_tag::VERSION, version)
        .insert(pg_tag::COMMAND_LINE, command_line)
        .build()
        .map_err(|e| SplitError::InvalidHeader { reason: e.to_string() })?;

    header
        .programs_mut()
        .add(BString::from(id), program)
        .map_err(|e| SplitError::InvalidHeader { reason: e.to_string() })?;

    Ok(header)
}

/// Returns `scsplit`, or `scsplit.1`, `scsplit.2`, ... when earlier runs
/// already left a @PG record with that ID.
fn unique_program_id(header: &Header) -> String {
    let programs = header.programs().as_ref();

    if !programs.contains_key(PROGRAM_NAME.as_bytes()) {
        return PROGRAM_NAME.to_string();
    }

    let mut suffix = 1;
    loop {
        let candidate = format!("{PROGRAM_NAME}.{suffix}");
        if !programs.contains_key(candidate.as_bytes()) {
            return candidate;
        }
        suffix += 1;
    }
}
