//! CLI command implementations for scsplit.
//!
//! Each submodule implements one subcommand:
//!
//! - [`split`] - demultiplex a BAM into one BAM per cell barcode
//! - [`tag`] - stamp CB tags onto records of per-cell BAMs named by barcode
//! - [`samplesheet`] - generate a CSV samplesheet for a barcode list
//! - [`count`] - count multi-mapped reads in a BAM

#![allow(
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::uninlined_format_args
)]

pub mod command;
pub mod count;
pub mod samplesheet;
pub mod split;
pub mod tag;
