//! Count multi-mapped reads in a BAM file.
//!
//! Reports how many records a split run would reject under each
//! multi-mapping policy, without writing any output. Useful for choosing a
//! policy before committing to a full split.

use anyhow::Result;
use clap::Parser;
use scsplit_lib::bam_io::open_bam_reader;
use scsplit_lib::classify::{is_multimapped, MultimapPolicy, GENE_DELIMITER};
use scsplit_lib::errors::SplitError;
use scsplit_lib::progress::ProgressTracker;
use scsplit_lib::validation::validate_file_exists;
use std::path::PathBuf;

use crate::commands::command::Command;

/// Count multi-mapped reads in a BAM file.
#[derive(Debug, Parser)]
#[command(
    name = "count",
    about = "\x1b[38;5;166m[UTILITIES]\x1b[0m  \x1b[36mCount multi-mapped reads in a BAM\x1b[0m",
    long_about = r#"
Count multi-mapped reads in a BAM file.

Reads every record once and reports how many are multi-mapped by alignment
count (NH tag greater than one) and how many by gene assignment (GX tag
listing more than one gene), with percentages of the total.

Example usage:
  scsplit count -i possorted.bam
"#
)]
pub struct CountReads {
    /// Input BAM file
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
}

impl Command for CountReads {
    fn execute(&self, _command_line: &str) -> Result<()> {
        validate_file_exists(&self.input, "Input BAM")?;

        let hit_count = MultimapPolicy::HitCount { max_hits: 1 };
        let gene_count = MultimapPolicy::GeneCount { delimiter: GENE_DELIMITER };

        let (mut reader, header) = open_bam_reader(&self.input)?;
        let mut progress = ProgressTracker::new("Counted records");
        let mut nh_multimapped: u64 = 0;
        let mut gx_multimapped: u64 = 0;

        for result in reader.record_bufs(&header) {
            let record = result.map_err(|source| SplitError::SourceUnreadable {
                path: self.input.clone(),
                source,
            })?;
            progress.inc();

            if is_multimapped(&record, hit_count) {
                nh_multimapped += 1;
            }
            if is_multimapped(&record, gene_count) {
                gx_multimapped += 1;
            }
        }
        progress.log_final();

        let total = progress.count();
        let percentage = |count: u64| {
            if total == 0 { 0.0 } else { count as f64 / total as f64 * 100.0 }
        };

        println!("Total records: {total}");
        println!("NH > 1: {nh_multimapped}");
        println!("GX > 1: {gx_multimapped}");
        println!("Percentage NH > 1: {:.2}", percentage(nh_multimapped));
        println!("Percentage GX > 1: {:.2}", percentage(gx_multimapped));
        Ok(())
    }
}
