use thiserror::Error;

use hifitime::errors::ParsingError as EpochParsingError;
use std::io::Error as IoError;

/// Top-level error type returned by this crate's public functions.
#[derive(Debug, Error)]
pub enum Error {
    #[error("parsing error: {0}")]
    Parsing(#[from] ParsingError),

    #[error("epoch parsing error: {0}")]
    HifitimeParsing(#[from] EpochParsingError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("builder error: {0}")]
    Build(#[from] BuildError),

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("file i/o error: {0}")]
    FileIo(#[from] IoError),
}

/// Errors raised while parsing an SP3 header or data record.
#[derive(Debug, Error)]
pub enum ParsingError {
    #[error("non supported SP3 revision \"{0}\"")]
    NonSupportedRevision(char),

    #[error("unknown SP3 file type \"{0}\"")]
    UnknownFileType(String),

    #[error("unknown time system \"{0}\"")]
    UnknownTimeSystem(String),

    #[error("malformed header line #1")]
    MalformedH1,

    #[error("malformed header line #2")]
    MalformedH2,

    #[error("malformed %c line \"{0}\"")]
    MalformedDescriptor(String),

    #[error("line {line}: malformed record, expected {expected}")]
    MalformedLine { line: usize, expected: &'static str },

    #[error("header cross-check failed: {0}")]
    HeaderInconsistent(String),

    #[error("unsupported record kind: {0}")]
    UnsupportedFeature(&'static str),

    #[error("{0} bytes of trailing data found after EOF marker")]
    TrailingGarbageAfterEOF(usize),

    #[error("failed to parse epoch")]
    EpochParsing,

    #[error("failed to parse number of epochs \"{0}\"")]
    NumberEpoch(String),

    #[error("failed to parse week counter")]
    WeekCounter,

    #[error("failed to parse seconds of week")]
    WeekSeconds,

    #[error("failed to parse sampling period")]
    SamplingPeriod,

    #[error("failed to parse MJD")]
    Mjd,

    #[error("failed to parse identifier from \"{0}\"")]
    Identifier(String),

    #[error("failed to parse (x, y, or z) coordinates from \"{0}\"")]
    Coordinates(String),

    #[error("failed to parse clock data from \"{0}\"")]
    Clock(String),

    #[error("unexpected end of input, missing EOF marker")]
    MissingEof,

    #[error("records for satellite \"{0}\" are not strictly ascending in time")]
    UnsortedRecords(String),
}

/// Errors raised by the identifier/satellite catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no catalog entry for identifier \"{0}\"")]
    UnknownSatellite(String),

    #[error("duplicate identifier \"{0}\" in catalog")]
    DuplicateIdentifier(String),
}

/// Errors raised while building a [`crate::polynomial::PiecewisePolynomial`].
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("not enough records ({have}) to cover a window of {want}")]
    InsufficientRecords { have: usize, want: usize },

    #[error("invalid builder parameters: {0}")]
    InvalidParameters(&'static str),
}

/// Side of a [`PiecewisePolynomial`](crate::polynomial::PiecewisePolynomial)'s
/// validity range an out-of-range query fell on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Before,
    After,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
        }
    }
}

/// Errors raised while evaluating a [`crate::polynomial::PiecewisePolynomial`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("query time falls outside the validity range ({0})")]
    OutOfRange(Side),
}
