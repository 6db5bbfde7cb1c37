//! Stamp CB tags onto records of per-cell BAM files named by barcode.
//!
//! The inverse companion to split: given a directory of per-cell BAMs whose
//! file names embed the cell barcode, rewrite each file with the barcode
//! stamped into every record's CB tag. Useful for retrofitting barcode tags
//! onto BAMs produced by pipelines that only encode the cell in the file
//! name.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use regex::Regex;
use scsplit_lib::bam_io::{create_bam_writer, finish_bam_writer, open_bam_reader};
use scsplit_lib::classify::CELL_BARCODE_TAG;
use scsplit_lib::errors::SplitError;
use scsplit_lib::progress::ProgressTracker;
use scsplit_lib::validation::validate_dir_exists;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::record_buf::data::field::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::commands::command::Command;

/// Default pattern extracting the barcode from a file name. The first
/// capture group is the barcode.
pub const DEFAULT_BARCODE_PATTERN: &str = r"_([ACGT]{14})\.";

/// Stamp CB tags onto per-cell BAM files named by barcode.
#[derive(Debug, Parser)]
#[command(
    name = "tag",
    about = "\x1b[38;5;166m[UTILITIES]\x1b[0m  \x1b[36mStamp CB tags onto per-cell BAMs named by barcode\x1b[0m",
    long_about = r#"
Stamp CB tags onto records of per-cell BAM files named by barcode.

Scans the input directory for .bam files, extracts the cell barcode from
each file name with --pattern (first capture group), and writes a copy of
each file into the output directory with the barcode stamped into every
record's CB tag. Files whose names do not match the pattern are skipped
with a warning.

Example usage:
  scsplit tag -i cells/
  scsplit tag -i cells/ -o tagged/ --pattern '_([ACGT]+)\.'
"#
)]
pub struct TagBarcodes {
    /// Directory containing per-cell BAM files
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output directory [default: <input parent>/output]
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Regex extracting the barcode from a file name (first capture group)
    #[arg(long = "pattern", default_value = DEFAULT_BARCODE_PATTERN)]
    pub pattern: String,
}

impl TagBarcodes {
    fn output_dir(&self) -> PathBuf {
        match &self.output {
            Some(dir) => dir.clone(),
            None => self.input.parent().unwrap_or_else(|| Path::new(".")).join("output"),
        }
    }

    /// The .bam files in the input directory, sorted by name.
    fn bam_files(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.input)
            .with_context(|| format!("Failed to read directory: {}", self.input.display()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_bam = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("bam"));
            if path.is_file() && is_bam {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn tag_file(&self, input: &Path, output: &Path, barcode: &str) -> Result<u64> {
        let (mut reader, header) = open_bam_reader(input)?;
        let mut writer = create_bam_writer(output, &header)?;
        let mut progress = ProgressTracker::new(format!("Tagged records in {barcode}"));

        for result in reader.record_bufs(&header) {
            let mut record = result.map_err(|source| SplitError::SourceUnreadable {
                path: input.to_path_buf(),
                source,
            })?;
            record.data_mut().insert(CELL_BARCODE_TAG, Value::from(barcode));
            writer.write_alignment_record(&header, &record).map_err(|source| {
                SplitError::SinkUnwritable { path: output.to_path_buf(), source }
            })?;
            progress.inc();
        }

        finish_bam_writer(&mut writer, &header, output)?;
        Ok(progress.count())
    }
}

impl Command for TagBarcodes {
    fn execute(&self, _command_line: &str) -> Result<()> {
        validate_dir_exists(&self.input, "Input directory")?;

        let pattern = Regex::new(&self.pattern)
            .with_context(|| format!("Invalid barcode pattern: {}", self.pattern))?;
        if pattern.captures_len() < 2 {
            bail!("--pattern must contain a capture group for the barcode: {}", self.pattern);
        }

        let files = self.bam_files()?;
        if files.is_empty() {
            bail!("No .bam files found in {}", self.input.display());
        }

        let output_dir = self.output_dir();
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

        info!("Tagging {} BAM files from {}", files.len(), self.input.display());

        let mut tagged = 0;
        for path in &files {
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => {
                    warn!("Skipping file with non-UTF-8 name: {}", path.display());
                    continue;
                }
            };

            let Some(barcode) = pattern.captures(name).and_then(|c| c.get(1)) else {
                warn!("Skipping {name}: no barcode in file name");
                continue;
            };

            let records = self.tag_file(path, &output_dir.join(name), barcode.as_str())?;
            info!("Tagged {records} records in {name} with barcode {}", barcode.as_str());
            tagged += 1;
        }

        info!("Tagged {tagged} of {} BAM files", files.len());
        println!("tagged={tagged}, skipped={}", files.len() - tagged);
        Ok(())
    }
}
