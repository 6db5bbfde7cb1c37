//! Record enrichment applied to routed records before forwarding.
//!
//! Two optional mutations, in order: append the UMI to the read name so
//! otherwise-identical read names stay distinguishable after deduplication
//! downstream, then stamp the destination sink's read group so a record's
//! cell of origin is traceable from read-group metadata alone.

use bstr::BString;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::alignment::record_buf::RecordBuf;

/// UR tag carrying the raw UMI sequence (Cell Ranger convention).
pub const UMI_TAG: Tag = Tag::new(b'U', b'R');

/// Separator between the original read name and the appended UMI.
const UMI_SEPARATOR: u8 = b'_';

/// Appends the record's UMI to its read name (`<name>_<umi>`).
///
/// Purely additive: records without a UR tag (or without a name) are left
/// unchanged. Returns true when the name was rewritten.
pub fn append_umi_to_name(record: &mut RecordBuf) -> bool {
    let umi = match record.data().get(&UMI_TAG) {
        Some(Value::String(umi)) if !umi.is_empty() => umi.clone(),
        _ => return false,
    };

    let Some(name) = record.name() else {
        return false;
    };

    let mut qualified: Vec<u8> = Vec::with_capacity(name.len() + 1 + umi.len());
    qualified.extend_from_slice(name.as_ref());
    qualified.push(UMI_SEPARATOR);
    qualified.extend_from_slice(umi.as_ref());

    *record.name_mut() = Some(BString::from(qualified));
    true
}

/// Stamps the record's RG tag with the given read-group ID, replacing any
/// existing value.
pub fn stamp_read_group(record: &mut RecordBuf, read_group_id: &str) {
    record.data_mut().insert(Tag::READ_GROUP, Value::from(read_group_id));
}
