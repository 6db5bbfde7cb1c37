//! Split a BAM file into one BAM per cell barcode.
//!
//! Reads a CB-tagged BAM produced by a single-cell pipeline, routes each
//! record to the output BAM of its cell, and rejects multi-mapped records,
//! records without a CB tag, and records whose barcode is not in the
//! accepted list. Routed records get their UMI appended to the read name and
//! the destination cell's read group stamped into the RG tag.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use log::info;
use scsplit_lib::classify::{MultimapPolicy, GENE_DELIMITER};
use scsplit_lib::layout::{GroupLayout, DEFAULT_GROUP_SIZE};
use scsplit_lib::splitter::{BamSplitter, SplitConfig};
use scsplit_lib::validation::validate_file_exists;
use std::path::PathBuf;

use crate::commands::command::Command;

/// Multi-mapping rejection policy, selected per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Reject records whose NH tag reports more than one alignment
    HitCount,
    /// Reject records whose GX tag lists more than one gene
    GeneCount,
}

/// Split a BAM file into one BAM per cell barcode.
#[derive(Debug, Parser)]
#[command(
    name = "split",
    about = "\x1b[38;5;166m[CORE]\x1b[0m       \x1b[36mSplit a BAM into one BAM per cell barcode\x1b[0m",
    long_about = r#"
Split a BAM file into one BAM per cell barcode.

Reads a CB-tagged BAM produced by a single-cell pipeline and writes one BAM
file per barcode in the accepted list, named cell_<n>_<barcode>.bam where
<n> is the barcode's 1-based position in the list. Output files are bucketed
into numbered subdirectories of --group-size entries each unless --flat is
given.

Records are rejected (counted, not written) when they are multi-mapped under
the selected --policy, carry no CB tag, or carry a barcode outside the list.
Routed records get their UR tag (UMI) appended to the read name and the
destination cell's read group stamped into the RG tag.

Example usage:
  scsplit split -i possorted.bam -b barcodes.txt -o cells/
  scsplit split -i possorted.bam -b barcodes.txt --policy gene-count
  scsplit split -i possorted.bam -b barcodes.txt --flat
"#
)]
pub struct Split {
    /// Input BAM file with CB-tagged records
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Accepted-barcode list, one barcode per line, order significant
    #[arg(short = 'b', long = "barcodes")]
    pub barcodes: PathBuf,

    /// Output directory [default: <input parent>/output]
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Write all cell BAMs directly into the output directory
    #[arg(long = "flat", default_value = "false")]
    pub flat: bool,

    /// Number of cell BAMs per output subdirectory
    #[arg(long = "group-size", default_value_t = DEFAULT_GROUP_SIZE)]
    pub group_size: usize,

    /// Multi-mapping rejection policy
    #[arg(long = "policy", value_enum, default_value_t = PolicyArg::HitCount)]
    pub policy: PolicyArg,

    /// Delimiter between gene IDs in the GX tag (gene-count policy only)
    #[arg(long = "gene-delimiter", default_value_t = GENE_DELIMITER as char)]
    pub gene_delimiter: char,
}

impl Command for Split {
    fn execute(&self, command_line: &str) -> Result<()> {
        validate_file_exists(&self.input, "Input BAM")?;
        validate_file_exists(&self.barcodes, "Barcode list")?;

        if self.group_size == 0 {
            bail!("--group-size must be greater than zero");
        }
        if !self.gene_delimiter.is_ascii() {
            bail!("--gene-delimiter must be a single ASCII character, got '{}'", self.gene_delimiter);
        }

        let layout = if self.flat {
            GroupLayout::Flat
        } else {
            GroupLayout::Grouped { group_size: self.group_size }
        };

        let policy = match self.policy {
            PolicyArg::HitCount => MultimapPolicy::HitCount { max_hits: 1 },
            PolicyArg::GeneCount => MultimapPolicy::GeneCount { delimiter: self.gene_delimiter as u8 },
        };

        info!("Starting split");
        info!("Input: {}", self.input.display());
        info!("Barcode list: {}", self.barcodes.display());

        let splitter = BamSplitter::new(SplitConfig {
            input: self.input.clone(),
            barcode_file: self.barcodes.clone(),
            output_dir: self.output.clone(),
            layout,
            policy,
            command_line: Some(command_line.to_string()),
        });
        info!("Output directory: {}", splitter.output_dir().display());

        let stats = splitter.run()?;

        info!("Split complete: {stats}");
        println!("{stats}");
        Ok(())
    }
}
