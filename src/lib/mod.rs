#![deny(unsafe_code)]

//! # scsplit - single-cell BAM splitting library
//!
//! This library provides the core functionality for demultiplexing a single
//! BAM file produced by a single-cell sequencing pipeline into one BAM per
//! cell, keyed by the `CB` (cell barcode) tag of each record.
//!
//! ## Overview
//!
//! - **[`registry`]** - the accepted-barcode list and the arena of per-cell
//!   output sinks, opened eagerly before the main pass
//! - **[`layout`]** - bucketing of output files into fixed-size directory
//!   groups so no single directory accumulates unbounded entries
//! - **[`classify`]** - per-record routing decisions (multi-mapping filter,
//!   barcode presence and membership)
//! - **[`splitter`]** - the single-pass read loop that drives the split and
//!   guarantees every sink is closed exactly once
//!
//! ### Utilities
//!
//! - **[`bam_io`]** - BAM reader/writer helpers with consistent error mapping
//! - **[`enrich`]** - UMI read-name suffixing and read-group stamping
//! - **[`header`]** - per-cell header construction and @PG records
//! - **[`samplesheet`]** - CSV samplesheet generation for downstream pipelines
//! - **[`stats`]** - per-category run counters and the final summary

pub mod bam_io;
pub mod classify;
pub mod enrich;
pub mod errors;
pub mod header;
pub mod layout;
pub mod progress;
pub mod registry;
pub mod samplesheet;
pub mod splitter;
pub mod stats;
pub mod validation;
