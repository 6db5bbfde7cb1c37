//! Integration tests for the count command.

use noodles::sam::alignment::record_buf::data::field::Value;
use scsplit_lib::classify::{ASSIGNED_GENES_TAG, HIT_COUNT_TAG};
use std::process::Command;
use tempfile::TempDir;

use crate::helpers::{create_tagged_record, write_bam};

/// Multi-mapped records are counted under both policies independently.
#[test]
fn test_count_reports_both_policies() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");

    write_bam(
        &input_bam,
        &[
            create_tagged_record("read1", &[(HIT_COUNT_TAG, Value::Int32(1))]),
            create_tagged_record("read2", &[(HIT_COUNT_TAG, Value::Int32(3))]),
            create_tagged_record(
                "read3",
                &[
                    (HIT_COUNT_TAG, Value::Int32(2)),
                    (ASSIGNED_GENES_TAG, Value::from("geneA;geneB")),
                ],
            ),
            create_tagged_record("read4", &[(ASSIGNED_GENES_TAG, Value::from("geneA"))]),
        ],
    );

    let output = Command::new(env!("CARGO_BIN_EXE_scsplit"))
        .args(["count", "-i", input_bam.to_str().unwrap()])
        .output()
        .expect("Failed to run count command");
    assert!(output.status.success(), "Count command failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total records: 4"), "Missing total: {stdout}");
    assert!(stdout.contains("NH > 1: 2"), "Missing NH count: {stdout}");
    assert!(stdout.contains("GX > 1: 1"), "Missing GX count: {stdout}");
    assert!(stdout.contains("Percentage NH > 1: 50.00"), "Missing NH percentage: {stdout}");
    assert!(stdout.contains("Percentage GX > 1: 25.00"), "Missing GX percentage: {stdout}");
}

/// A missing input BAM exits non-zero.
#[test]
fn test_count_missing_input_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let status = Command::new(env!("CARGO_BIN_EXE_scsplit"))
        .args(["count", "-i", temp_dir.path().join("missing.bam").to_str().unwrap()])
        .status()
        .expect("Failed to run count command");
    assert!(!status.success(), "Missing input should fail");
}
