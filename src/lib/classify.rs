//! Per-record routing decisions.
//!
//! Each record is classified into exactly one [`Outcome`]. The checks run in
//! a fixed order: the multi-mapping filter first (a multi-mapped record must
//! never consume a barcode slot's write, and the check is cheaper), then
//! barcode presence, then barcode membership.

use log::warn;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::alignment::record_buf::RecordBuf;

use crate::registry::BarcodeIndex;

/// CB tag carrying the cell barcode (Cell Ranger convention).
pub const CELL_BARCODE_TAG: Tag = Tag::new(b'C', b'B');

/// NH tag carrying the number of reported alignments for the read.
pub const HIT_COUNT_TAG: Tag = Tag::new(b'N', b'H');

/// GX tag carrying the semicolon-separated list of assigned gene IDs.
pub const ASSIGNED_GENES_TAG: Tag = Tag::new(b'G', b'X');

/// Default delimiter between gene IDs in the GX tag.
pub const GENE_DELIMITER: u8 = b';';

/// Policy used to decide whether a record is multi-mapped.
///
/// Exactly one policy is active per run; they are never combined. The two
/// policies deliberately keep their historical asymmetric defaults: an
/// absent tag means "not multi-mapped" under both, but a malformed NH tag is
/// treated as multi-mapped (fail-soft, with a data-quality warning) while
/// the gene-count policy only ever inspects string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultimapPolicy {
    /// A record is multi-mapped when its NH tag value exceeds `max_hits`
    HitCount {
        /// Maximum number of reported alignments for a uniquely-mapped read
        max_hits: i64,
    },
    /// A record is multi-mapped when its GX tag lists more than one gene
    GeneCount {
        /// Byte separating gene IDs in the GX tag value
        delimiter: u8,
    },
}

impl Default for MultimapPolicy {
    fn default() -> Self {
        MultimapPolicy::HitCount { max_hits: 1 }
    }
}

/// Classification outcome for a single record. Mutually exclusive and
/// exhaustive: every record falls into exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The record belongs to a known cell and is forwarded to its sink
    Routed {
        /// 1-based ordinal of the destination sink
        ordinal: usize,
    },
    /// The record carries no CB tag
    NoBarcodeTag,
    /// The record's barcode is not in the accepted list
    UnknownBarcode,
    /// The record maps to more than one location or gene
    MultiMapped,
}

/// Classifies a record. Pure with respect to record contents; consults the
/// barcode index read-only.
#[must_use]
pub fn classify(record: &RecordBuf, policy: MultimapPolicy, index: &BarcodeIndex) -> Outcome {
    if is_multimapped(record, policy) {
        return Outcome::MultiMapped;
    }

    let barcode = match record.data().get(&CELL_BARCODE_TAG) {
        Some(Value::String(s)) => s,
        // A CB tag of any other type cannot name a cell.
        _ => return Outcome::NoBarcodeTag,
    };

    match std::str::from_utf8(barcode.as_ref()).ok().and_then(|b| index.get(b)) {
        Some(ordinal) => Outcome::Routed { ordinal },
        None => Outcome::UnknownBarcode,
    }
}

/// Returns true when the record is multi-mapped under the given policy.
#[must_use]
pub fn is_multimapped(record: &RecordBuf, policy: MultimapPolicy) -> bool {
    match policy {
        MultimapPolicy::HitCount { max_hits } => match record.data().get(&HIT_COUNT_TAG) {
            None => false,
            Some(value) => match integer_value(value) {
                Some(hits) => hits > max_hits,
                None => {
                    warn!(
                        "record {:?}: NH tag is not an integer, treating as multi-mapped",
                        record.name()
                    );
                    true
                }
            },
        },
        MultimapPolicy::GeneCount { delimiter } => match record.data().get(&ASSIGNED_GENES_TAG) {
            Some(Value::String(genes)) => {
                let genes: &[u8] = genes.as_ref();
                // A trailing delimiter does not count as an extra gene.
                let genes = genes.strip_suffix(&[delimiter]).unwrap_or(genes);
                genes.split(|&b| b == delimiter).count() > 1
            }
            _ => false,
        },
    }
}

/// Coerces an integer-typed tag value to `i64`, or `None` for any other
/// value type.
#[must_use]
pub fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Int8(v) => Some(i64::from(*v)),
        Value::UInt8(v) => Some(i64::from(*v)),
        Value::Int16(v) => Some(i64::from(*v)),
        Value::UInt16(v) => Some(i64::from(*v)),
        Value::Int32(v) => Some(i64::from(*v)),
        Value::UInt32(v) => Some(i64::from(*v)),
        _ => None,
    }
}
