//! Rendering of the consensus as VCF text.

use std::{fmt, io::Write};

use noodles_vcf as vcf;

use crate::{
    common::{compare_chroms, is_primary_chrom, worker_version},
    consensus::{aggregate_info, ConsensusStore, InfoSummary},
    locations::Location,
};

use super::MergeSettings;

/// Reference allele written for breakpoint entries.
const BREAKPOINT_REF: &str = "N";

/// One consensus line and the audit lines that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub chrom: String,
    pub pos: i64,
    pub reference: String,
    pub alternate: String,
    pub passed: bool,
    pub info: String,
    /// Source records, rendered as `#<record> (<caller>)`.
    pub audit: Vec<String>,
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t.\t{}\t{}\t255\t{}\t{}",
            self.chrom,
            self.pos,
            self.reference,
            self.alternate,
            if self.passed { "PASS" } else { "LOWSUPPORT" },
            self.info
        )?;
        for line in &self.audit {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}

/// Breakend notation for the junction of `first` with `second`.
///
/// The mate is written `[chrom:pos[` if it extends right, `]chrom:pos]`
/// otherwise, and `.` if unknown.  It follows `reference` unless `first`
/// extends right.
pub fn breakend_alt(first: &Location, second: Option<&Location>, reference: &str) -> String {
    let mate = match second {
        Some(second) => {
            let delim = if second.extends_right() { '[' } else { ']' };
            format!("{}{}:{}{}", delim, second.chrom(), second.pos(), delim)
        }
        None => String::from("."),
    };
    if first.extends_right() {
        format!("{}{}", mate, reference)
    } else {
        format!("{}{}", reference, mate)
    }
}

/// INFO column of a consensus line.
pub fn info_string(callers: &[String], summary: &InfoSummary) -> String {
    format!(
        "Callers={}{};NumCallers={}",
        callers.join(","),
        summary,
        callers.len()
    )
}

/// Header of the merged callset.
pub fn build_header(settings: &MergeSettings) -> Result<vcf::Header, anyhow::Error> {
    use vcf::header::record::value::{
        map::{info, Filter, Info},
        Map,
    };
    use vcf::header::Number;
    use vcf::record::info::field::key;

    let builder = vcf::Header::builder()
        .set_file_format(vcf::header::FileFormat::new(4, 1))
        .add_filter("PASS", Map::<Filter>::new("All filters passed"))
        .add_filter(
            "LOWSUPPORT",
            Map::<Filter>::new(format!(
                "Called by fewer than {} callers",
                settings.min_callers
            )),
        )
        .add_info(
            "Callers".parse()?,
            Map::<Info>::new(
                Number::Unknown,
                info::Type::String,
                "Callers that made this call",
            ),
        )
        .add_info(
            "NumCallers".parse()?,
            Map::<Info>::new(
                Number::Count(1),
                info::Type::Integer,
                "Number of callers that made this call",
            ),
        )
        .add_info(
            "CHR2".parse()?,
            Map::<Info>::new(
                Number::Count(1),
                info::Type::String,
                "Chromosome of the mate breakpoint",
            ),
        )
        .add_info(key::END_POSITION, Map::<Info>::from(&key::END_POSITION))
        .add_info(key::SV_TYPE, Map::<Info>::from(&key::SV_TYPE))
        .add_info(key::SV_LENGTHS, Map::<Info>::from(&key::SV_LENGTHS));

    let builder = builder.insert(
        "source".parse()?,
        vcf::header::record::Value::String(format!("varmerge-{}", worker_version())),
    )?;

    Ok(builder.build())
}

/// The merged header as written by `write_merged`.
#[cfg(test)]
pub(crate) fn header_text(settings: &MergeSettings) -> Result<String, anyhow::Error> {
    let mut buf = Vec::new();
    vcf::writer::Writer::new(&mut buf).write_header(&build_header(settings)?)?;
    Ok(String::from_utf8(buf)?)
}

/// Consensus lines for all entries of `store`.
///
/// Simple variants come before breakpoint entries, each in order of appearance,
/// unless `settings.sort_output` asks for coordinate order.
pub fn output_lines(store: &ConsensusStore, settings: &MergeSettings) -> Vec<OutputLine> {
    let mut lines = Vec::new();

    for (location, alleles) in store.simple_variants() {
        for ((reference, alternate), callers) in alleles {
            lines.push(OutputLine {
                chrom: location.chrom().to_string(),
                pos: location.pos(),
                reference: reference.clone(),
                alternate: alternate.clone(),
                passed: callers.len() >= settings.min_callers,
                info: info_string(callers, &InfoSummary::default()),
                audit: Vec::new(),
            });
        }
    }

    for entry in store.breakpoint_entries() {
        if let Some(second) = &entry.second {
            if settings.filter_chroms && !is_primary_chrom(second.chrom()) {
                tracing::debug!("skipping {}-{}, mate not on a chromosome", entry.first, second);
                continue;
            }
        }

        let (pos1, pos2) = entry.median_positions();
        let first = entry.first.with_pos(pos1);
        let second = entry
            .second
            .as_ref()
            .map(|second| second.with_pos(pos2.unwrap_or_else(|| second.pos())));
        let summary = aggregate_info(
            entry.records.iter().map(|(_, record)| record.as_ref()),
            pos1,
            pos2,
        );
        let audit = if settings.audit_lines {
            entry
                .records
                .iter()
                .map(|(caller, record)| format!("#{} ({})", record, caller))
                .collect()
        } else {
            Vec::new()
        };

        lines.push(OutputLine {
            chrom: first.chrom().to_string(),
            pos: first.pos(),
            reference: String::from(BREAKPOINT_REF),
            alternate: breakend_alt(&first, second.as_ref(), BREAKPOINT_REF),
            passed: entry.callers.len() >= settings.min_callers,
            info: info_string(&entry.callers, &summary),
            audit,
        });
    }

    if settings.sort_output {
        lines.sort_by(|lhs, rhs| {
            compare_chroms(&lhs.chrom, &rhs.chrom).then_with(|| lhs.pos.cmp(&rhs.pos))
        });
    }

    lines
}

/// Write header and consensus lines of `store` to `writer`.
///
/// Returns the number of consensus lines written.
pub fn write_merged<W: Write + ?Sized>(
    writer: &mut W,
    store: &ConsensusStore,
    settings: &MergeSettings,
) -> Result<usize, anyhow::Error> {
    let header = build_header(settings)?;
    vcf::writer::Writer::new(&mut *writer)
        .write_header(&header)
        .map_err(|e| anyhow::anyhow!("problem writing VCF header: {}", e))?;
    let lines = output_lines(store, settings);
    for line in &lines {
        writeln!(writer, "{}", line)?;
    }
    Ok(lines.len())
}
