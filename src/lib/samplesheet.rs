//! CSV samplesheet generation for downstream pipelines.
//!
//! One row per barcode in list order. The BAM path column is rooted at the
//! `${splitBamDir}` placeholder so the sheet can be dropped into a workflow
//! that substitutes the split output directory at runtime.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::header::cell_id;
use crate::layout::{GroupLayout, EXTENSION};

/// File name of the generated samplesheet.
pub const SAMPLE_SHEET_FILENAME: &str = "samplesheet.csv";

/// Default project column value.
pub const DEFAULT_PROJECT: &str = "SingleCell";

/// Placeholder for the split output directory, substituted downstream.
const SPLIT_DIR_PLACEHOLDER: &str = "${splitBamDir}";

#[derive(Debug, Serialize)]
struct Row<'a> {
    project: &'a str,
    #[serde(rename = "cellId")]
    cell_id: String,
    #[serde(rename = "bamFile")]
    bam_file: String,
}

#[derive(Debug, Serialize)]
struct GroupedRow<'a> {
    project: &'a str,
    #[serde(rename = "cellId")]
    cell_id: String,
    #[serde(rename = "bamFile")]
    bam_file: String,
    #[serde(rename = "cellGroup")]
    cell_group: usize,
}

/// Writes `samplesheet.csv` into `output_dir` and returns its path.
///
/// The `cellGroup` column is present exactly when the layout is grouped, so
/// the sheet mirrors the on-disk arrangement of the split output.
pub fn write_samplesheet(
    barcodes: &[String],
    output_dir: &Path,
    layout: GroupLayout,
    project: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;
    let path = output_dir.join(SAMPLE_SHEET_FILENAME);

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create samplesheet: {}", path.display()))?;

    for (i, barcode) in barcodes.iter().enumerate() {
        let ordinal = i + 1;
        let cell_id = cell_id(ordinal, barcode);

        match layout.group_id(ordinal) {
            Some(group) => {
                let bam_file = format!("{SPLIT_DIR_PLACEHOLDER}/{group}/{cell_id}.{EXTENSION}");
                writer.serialize(GroupedRow { project, cell_id, bam_file, cell_group: group })?;
            }
            None => {
                let bam_file = format!("{SPLIT_DIR_PLACEHOLDER}/{cell_id}.{EXTENSION}");
                writer.serialize(Row { project, cell_id, bam_file })?;
            }
        }
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write samplesheet: {}", path.display()))?;
    Ok(path)
}
