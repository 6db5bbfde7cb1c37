//! Generate a CSV samplesheet for a barcode list.
//!
//! Produces the `samplesheet.csv` that downstream pipelines consume, with
//! one row per barcode mapping the cell ID to its split BAM path. The BAM
//! paths are rooted at the `${splitBamDir}` placeholder so the sheet is
//! portable across machines.

use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use scsplit_lib::layout::{GroupLayout, DEFAULT_GROUP_SIZE};
use scsplit_lib::registry::load_barcodes;
use scsplit_lib::samplesheet::{write_samplesheet, DEFAULT_PROJECT};
use scsplit_lib::validation::validate_file_exists;
use std::path::PathBuf;

use crate::commands::command::Command;

/// Generate a CSV samplesheet for a barcode list.
#[derive(Debug, Parser)]
#[command(
    name = "samplesheet",
    about = "\x1b[38;5;166m[UTILITIES]\x1b[0m  \x1b[36mGenerate a CSV samplesheet for a barcode list\x1b[0m",
    long_about = r#"
Generate a CSV samplesheet for a barcode list.

Writes samplesheet.csv with one row per barcode, in list order. Each row
maps the cell ID (cell_<n>_<barcode>) to its split BAM path, rooted at the
${splitBamDir} placeholder. The layout options must match the ones used for
the split run so the paths resolve.

Example usage:
  scsplit samplesheet -b barcodes.txt -o cells/
  scsplit samplesheet -b barcodes.txt --project MyProject --flat
"#
)]
pub struct SampleSheet {
    /// Accepted-barcode list, one barcode per line, order significant
    #[arg(short = 'b', long = "barcodes")]
    pub barcodes: PathBuf,

    /// Output directory for samplesheet.csv
    #[arg(short = 'o', long = "output", default_value = ".")]
    pub output: PathBuf,

    /// Value for the project column
    #[arg(long = "project", default_value = DEFAULT_PROJECT)]
    pub project: String,

    /// Path rows as if the split used a flat layout
    #[arg(long = "flat", default_value = "false")]
    pub flat: bool,

    /// Number of cell BAMs per split subdirectory
    #[arg(long = "group-size", default_value_t = DEFAULT_GROUP_SIZE)]
    pub group_size: usize,
}

impl Command for SampleSheet {
    fn execute(&self, _command_line: &str) -> Result<()> {
        validate_file_exists(&self.barcodes, "Barcode list")?;

        if self.group_size == 0 {
            bail!("--group-size must be greater than zero");
        }

        let layout = if self.flat {
            GroupLayout::Flat
        } else {
            GroupLayout::Grouped { group_size: self.group_size }
        };

        let barcodes = load_barcodes(&self.barcodes)?;
        let path = write_samplesheet(&barcodes, &self.output, layout, &self.project)?;

        info!("Wrote {} rows to {}", barcodes.len(), path.display());
        println!("{}", path.display());
        Ok(())
    }
}
