//! Variant records as read from the input callsets.

use std::fmt;

use indexmap::IndexMap;
use noodles_vcf as vcf;

use crate::err::RecordError;

pub mod reader;

pub use reader::VcfReader;

/// The FILTER column of a record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    /// `.`
    #[default]
    Missing,
    /// `PASS`
    Pass,
    /// Names of the failed filters.
    Failed(Vec<String>),
}

impl Filter {
    /// Whether the record passed all filters, a missing FILTER counts as passed.
    pub fn is_pass(&self) -> bool {
        match self {
            Filter::Missing | Filter::Pass => true,
            Filter::Failed(names) => names.is_empty(),
        }
    }
}

impl From<Option<&vcf::record::Filters>> for Filter {
    fn from(filters: Option<&vcf::record::Filters>) -> Self {
        match filters {
            None => Filter::Missing,
            Some(vcf::record::Filters::Pass) => Filter::Pass,
            Some(vcf::record::Filters::Fail(ids)) => Filter::Failed(ids.iter().cloned().collect()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Missing => write!(f, "."),
            Filter::Pass => write!(f, "PASS"),
            Filter::Failed(names) => write!(f, "{}", names.join(";")),
        }
    }
}

/// Value of an INFO field coerced to an integer where possible.
///
/// Integers sort before text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnnotationValue {
    Integer(i64),
    Text(String),
}

impl AnnotationValue {
    pub fn coerce(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(i) => AnnotationValue::Integer(i),
            Err(_) => AnnotationValue::Text(value.to_string()),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == AnnotationValue::Integer(0)
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Integer(i) => write!(f, "{}", i),
            AnnotationValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// The INFO column, keys in input order mapped to their values as text.
///
/// Flags map to an empty list, missing array elements to `.`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Info(IndexMap<String, Vec<String>>);

impl Info {
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn values(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// First value of `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// First value of `key` as an integer; an error if it is not one.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>, RecordError> {
        self.get_str(key)
            .map(|value| {
                value.parse().map_err(|_| RecordError::InvalidInteger {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            })
            .transpose()
    }

    /// First value of `key`, coerced to an integer where possible.
    pub fn get_coerced(&self, key: &str) -> Option<AnnotationValue> {
        self.get_str(key).map(AnnotationValue::coerce)
    }

    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.0.insert(key.into(), values);
    }
}

/// Values of one INFO field as text.
fn value_strings(value: &vcf::record::info::field::Value) -> Vec<String> {
    use vcf::record::info::field::{value::Array, Value};

    fn elements<T: ToString>(values: &[Option<T>]) -> Vec<String> {
        values
            .iter()
            .map(|value| match value {
                Some(value) => value.to_string(),
                None => String::from("."),
            })
            .collect()
    }

    match value {
        Value::Integer(i) => vec![i.to_string()],
        Value::Float(f) => vec![f.to_string()],
        Value::Flag => Vec::new(),
        Value::Character(c) => vec![c.to_string()],
        Value::String(s) => vec![s.clone()],
        Value::Array(Array::Integer(values)) => elements(values),
        Value::Array(Array::Float(values)) => elements(values),
        Value::Array(Array::Character(values)) => elements(values),
        Value::Array(Array::String(values)) => elements(values),
    }
}

impl From<&vcf::record::Info> for Info {
    fn from(info: &vcf::record::Info) -> Self {
        let mut result = Info::default();
        for (key, value) in info.as_ref().iter() {
            let values = match value {
                Some(value) => value_strings(value),
                None => vec![String::from(".")],
            };
            result.insert(key.to_string(), values);
        }
        result
    }
}

/// The columns of a VCF record that merging looks at.
///
/// Sample columns are not interpreted but kept in `raw`.
#[derive(Debug, Clone, PartialEq)]
pub struct VcfRecord {
    pub chrom: String,
    /// 1-based position.
    pub pos: i64,
    pub reference: String,
    /// Alternate alleles; empty if the column is `.`.
    pub alternates: Vec<String>,
    pub filter: Filter,
    pub info: Info,
    /// The line the record was read from.
    pub raw: String,
}

impl VcfRecord {
    /// Convert a parsed `record` that was read from the line `raw`.
    pub fn from_vcf(record: &vcf::Record, raw: &str) -> Self {
        let chrom = match record.chromosome() {
            vcf::record::Chromosome::Name(name) | vcf::record::Chromosome::Symbol(name) => {
                name.to_owned()
            }
        };
        let pos: usize = record.position().into();

        Self {
            chrom,
            pos: pos as i64,
            reference: record.reference_bases().to_string(),
            alternates: record
                .alternate_bases()
                .iter()
                .map(|allele| allele.to_string())
                .collect(),
            filter: Filter::from(record.filters()),
            info: Info::from(record.info()),
            raw: raw.to_string(),
        }
    }
}

impl fmt::Display for VcfRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Header declaring the INFO fields used in unit tests.
#[cfg(test)]
pub(crate) const TEST_HEADER: &str = "##fileformat=VCFv4.2
##INFO=<ID=CHR2,Number=1,Type=String,Description=\"Chromosome of the mate breakpoint\">
##INFO=<ID=END,Number=1,Type=Integer,Description=\"End position of the variant\">
##INFO=<ID=CT,Number=1,Type=String,Description=\"Connection type\">
##INFO=<ID=SVTYPE,Number=1,Type=String,Description=\"Type of structural variant\">
##INFO=<ID=SVCLASS,Number=1,Type=String,Description=\"Class of structural variant\">
##INFO=<ID=SVLEN,Number=.,Type=Integer,Description=\"Length of structural variant\">
##INFO=<ID=CIPOS,Number=2,Type=Integer,Description=\"Confidence interval around POS\">
##INFO=<ID=IMPRECISE,Number=0,Type=Flag,Description=\"Imprecise structural variant\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
";

/// Parse a single data line below `TEST_HEADER`.
#[cfg(test)]
pub(crate) fn record_from_line(line: &str) -> VcfRecord {
    let input = format!("{}{}\n", TEST_HEADER, line);
    VcfReader::new(input.as_bytes())
        .and_then(|mut reader| reader.read_record())
        .expect("valid record")
        .expect("one record")
}
