//! Utilities for generating test BAM data programmatically.

use bstr::BString;
use noodles::bam;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::alignment::record_buf::RecordBuf;
use noodles::sam::Header;
use std::fs;
use std::path::Path;

/// Creates an unmapped record with the given name and data tags.
pub fn create_tagged_record(name: &str, tags: &[(Tag, Value)]) -> RecordBuf {
    let mut record = RecordBuf::default();
    *record.name_mut() = Some(BString::from(name));
    for (tag, value) in tags {
        record.data_mut().insert(*tag, value.clone());
    }
    record
}

/// Writes records to a BAM file under a default header.
pub fn write_bam(path: &Path, records: &[RecordBuf]) {
    let header = Header::default();
    let mut writer =
        bam::io::Writer::new(fs::File::create(path).expect("Failed to create BAM file"));
    writer.write_header(&header).expect("Failed to write header");

    for record in records {
        writer.write_alignment_record(&header, record).expect("Failed to write record");
    }

    writer.finish(&header).expect("Failed to finish BAM");
}

/// Reads the header and all records from a BAM file.
pub fn read_bam(path: &Path) -> (Header, Vec<RecordBuf>) {
    let mut reader = bam::io::reader::Builder.build_from_path(path).expect("Failed to open BAM");
    let header = reader.read_header().expect("Failed to read header");
    let records =
        reader.record_bufs(&header).map(|r| r.expect("Failed to read record")).collect();
    (header, records)
}
