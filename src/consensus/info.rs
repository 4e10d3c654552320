//! Summary of the SV annotations of the records supporting an entry.

use std::fmt;

use indexmap::IndexMap;

use crate::{
    common::median,
    record::{AnnotationValue, VcfRecord},
};

/// INFO fields carried over to the consensus, in output order.
pub const SUMMARY_FIELDS: [&str; 4] = ["CHR2", "END", "SVTYPE", "SVLEN"];

/// SV types for which a missing `SVLEN` is the distance between the breakpoints.
const SIZED_SV_TYPES: [&str; 4] = ["DUP", "DUP:TANDEM", "DEL", "INV"];

/// Median values of the `SUMMARY_FIELDS` over a set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoSummary(IndexMap<&'static str, AnnotationValue>);

impl InfoSummary {
    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnnotationValue)> {
        self.0.iter().map(|(key, value)| (*key, value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Renders as `;KEY=value` for each field.
impl fmt::Display for InfoSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            write!(f, ";{}={}", key, value)?;
        }
        Ok(())
    }
}

/// Summarize the SV annotations of `records` for an entry at `pos1` with mate at `pos2`.
///
/// Each field takes the median of its values, integers sorting before text.  A
/// median of `0` drops the field.
pub fn aggregate_info<'a, I>(records: I, pos1: i64, pos2: Option<i64>) -> InfoSummary
where
    I: IntoIterator<Item = &'a VcfRecord>,
{
    let records: Vec<&VcfRecord> = records.into_iter().collect();
    let mut summary = InfoSummary::default();
    for field in SUMMARY_FIELDS {
        let values: Vec<AnnotationValue> = records
            .iter()
            .filter_map(|record| record.info.get_coerced(field))
            .collect();
        if let Some(value) = median(&values) {
            if !value.is_zero() {
                summary.0.insert(field, value);
            }
        }
    }

    let sized = matches!(
        summary.get("SVTYPE"),
        Some(AnnotationValue::Text(sv_type)) if SIZED_SV_TYPES.contains(&sv_type.as_str())
    );
    if sized && summary.get("SVLEN").is_none() {
        if let Some(pos2) = pos2 {
            summary.0.insert("SVLEN", AnnotationValue::Integer(pos2 - pos1));
        }
    }

    summary
}
