//! Integration tests for the tag command.

use noodles::sam::alignment::record_buf::data::field::Value;
use scsplit_lib::classify::CELL_BARCODE_TAG;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

use crate::helpers::{create_tagged_record, read_bam, write_bam};

const BARCODE: &str = "AAAACCCCGGGGTT";

/// Every record of a barcode-named file gets the CB tag stamped.
#[test]
fn test_tag_stamps_barcode_from_filename() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_dir = temp_dir.path().join("cells");
    let output_dir = temp_dir.path().join("tagged");
    fs::create_dir_all(&input_dir).unwrap();

    let file_name = format!("cell_1_{BARCODE}.bam");
    write_bam(
        &input_dir.join(&file_name),
        &[create_tagged_record("read1", &[]), create_tagged_record("read2", &[])],
    );

    let status = Command::new(env!("CARGO_BIN_EXE_scsplit"))
        .args([
            "tag",
            "-i",
            input_dir.to_str().unwrap(),
            "-o",
            output_dir.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to run tag command");
    assert!(status.success(), "Tag command failed");

    let (_, records) = read_bam(&output_dir.join(&file_name));
    assert_eq!(records.len(), 2);
    for record in &records {
        match record.data().get(&CELL_BARCODE_TAG) {
            Some(Value::String(cb)) => assert_eq!(cb.as_ref() as &[u8], BARCODE.as_bytes()),
            other => panic!("unexpected CB value: {other:?}"),
        }
    }
}

/// Files without a barcode in the name are skipped, not fatal.
#[test]
fn test_tag_skips_files_without_barcode() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_dir = temp_dir.path().join("cells");
    let output_dir = temp_dir.path().join("tagged");
    fs::create_dir_all(&input_dir).unwrap();

    write_bam(&input_dir.join(format!("cell_1_{BARCODE}.bam")), &[create_tagged_record("read1", &[])]);
    write_bam(&input_dir.join("unnamed.bam"), &[create_tagged_record("read2", &[])]);

    let output = Command::new(env!("CARGO_BIN_EXE_scsplit"))
        .args([
            "tag",
            "-i",
            input_dir.to_str().unwrap(),
            "-o",
            output_dir.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run tag command");
    assert!(output.status.success(), "Tag command failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tagged=1"), "Summary missing tagged count: {stdout}");
    assert!(stdout.contains("skipped=1"), "Summary missing skipped count: {stdout}");
    assert!(!output_dir.join("unnamed.bam").exists());
}

/// A custom pattern widens which file names carry a barcode.
#[test]
fn test_tag_custom_pattern() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_dir = temp_dir.path().join("cells");
    let output_dir = temp_dir.path().join("tagged");
    fs::create_dir_all(&input_dir).unwrap();

    write_bam(&input_dir.join("cell_1_ACGT.bam"), &[create_tagged_record("read1", &[])]);

    let status = Command::new(env!("CARGO_BIN_EXE_scsplit"))
        .args([
            "tag",
            "-i",
            input_dir.to_str().unwrap(),
            "-o",
            output_dir.to_str().unwrap(),
            "--pattern",
            r"_([ACGT]+)\.",
        ])
        .status()
        .expect("Failed to run tag command");
    assert!(status.success(), "Tag command failed");

    let (_, records) = read_bam(&output_dir.join("cell_1_ACGT.bam"));
    match records[0].data().get(&CELL_BARCODE_TAG) {
        Some(Value::String(cb)) => assert_eq!(cb.as_ref() as &[u8], b"ACGT"),
        other => panic!("unexpected CB value: {other:?}"),
    }
}

/// An empty input directory is an error.
#[test]
fn test_tag_empty_dir_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_dir = temp_dir.path().join("cells");
    fs::create_dir_all(&input_dir).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_scsplit"))
        .args(["tag", "-i", input_dir.to_str().unwrap()])
        .status()
        .expect("Failed to run tag command");
    assert!(!status.success(), "Empty input directory should fail");
}
