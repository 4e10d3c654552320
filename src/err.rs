/// Problems with the content of a single input record.
///
/// Any of these aborts the processing of the source file the record came from.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("INFO/{key} is not an integer: {value:?}")]
    InvalidInteger { key: String, value: String },
}

/// Inconsistent breakpoint notation.
///
/// Well-formed input never triggers these.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BreakpointError {
    #[error("breakend {0:?} uses different delimiters around the mate")]
    MismatchedDelimiters(String),
    #[error("breakend {0:?} carries sequence on both sides")]
    SequenceOnBothSides(String),
    #[error("invalid mate position in breakend {0:?}")]
    InvalidMatePosition(String),
    #[error("{sv_type} on {chrom} has mate on {mate_chrom:?}, expected the same chromosome")]
    MateOnOtherChromosome {
        sv_type: String,
        chrom: String,
        mate_chrom: Option<String>,
    },
    #[error("{sv_type} at {chrom}:{pos} has no mate position")]
    MissingMatePosition {
        sv_type: String,
        chrom: String,
        pos: i64,
    },
}
