//! Integration tests for the samplesheet command.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Grouped layout: rows carry the cellGroup column and grouped BAM paths.
#[test]
fn test_samplesheet_grouped() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let barcode_file = temp_dir.path().join("barcodes.txt");
    let output_dir = temp_dir.path().join("out");

    fs::write(&barcode_file, "AAAA\nBBBB\nCCCC\n").unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_scsplit"))
        .args([
            "samplesheet",
            "-b",
            barcode_file.to_str().unwrap(),
            "-o",
            output_dir.to_str().unwrap(),
            "--group-size",
            "2",
        ])
        .status()
        .expect("Failed to run samplesheet command");
    assert!(status.success(), "Samplesheet command failed");

    let sheet = fs::read_to_string(output_dir.join("samplesheet.csv")).unwrap();
    let lines: Vec<&str> = sheet.lines().collect();
    assert_eq!(
        lines,
        vec![
            "project,cellId,bamFile,cellGroup",
            "SingleCell,cell_1_AAAA,${splitBamDir}/0/cell_1_AAAA.bam,0",
            "SingleCell,cell_2_BBBB,${splitBamDir}/0/cell_2_BBBB.bam,0",
            "SingleCell,cell_3_CCCC,${splitBamDir}/1/cell_3_CCCC.bam,1",
        ]
    );
}

/// Flat layout with a custom project name.
#[test]
fn test_samplesheet_flat() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let barcode_file = temp_dir.path().join("barcodes.txt");
    let output_dir = temp_dir.path().join("out");

    fs::write(&barcode_file, "AAAA\n").unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_scsplit"))
        .args([
            "samplesheet",
            "-b",
            barcode_file.to_str().unwrap(),
            "-o",
            output_dir.to_str().unwrap(),
            "--project",
            "Pbmc6k",
            "--flat",
        ])
        .status()
        .expect("Failed to run samplesheet command");
    assert!(status.success(), "Samplesheet command failed");

    let sheet = fs::read_to_string(output_dir.join("samplesheet.csv")).unwrap();
    let lines: Vec<&str> = sheet.lines().collect();
    assert_eq!(
        lines,
        vec!["project,cellId,bamFile", "Pbmc6k,cell_1_AAAA,${splitBamDir}/cell_1_AAAA.bam"]
    );
}

/// A missing barcode list exits non-zero.
#[test]
fn test_samplesheet_missing_barcodes_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let status = Command::new(env!("CARGO_BIN_EXE_scsplit"))
        .args([
            "samplesheet",
            "-b",
            temp_dir.path().join("missing.txt").to_str().unwrap(),
            "-o",
            temp_dir.path().to_str().unwrap(),
        ])
        .status()
        .expect("Failed to run samplesheet command");
    assert!(!status.success(), "Missing barcode list should fail");
}
