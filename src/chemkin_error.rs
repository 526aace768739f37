//! Errors raised while reading or writing CHEMKIN-style files.
//!
//! Only structural problems end up here. Recoverable problems (wrong phase,
//! unreadable coefficients) are reported through
//! [`Diagnostics`](crate::Utils::diagnostics::Diagnostics) and the parser
//! carries on with a partially populated result.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChemkinError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// element symbol present but the count next to it is not a number
    #[error("invalid element count in line '{line}', segment '{segment}'")]
    BadElementSegment { line: String, segment: String },
    #[error("no temperature range for thermo entry of {label}: none in the record and no defaults given")]
    MissingTemperatureRange { label: String },
    #[error("invalid temperature range for {label}: Tmin={tmin}, Tint={tint}, Tmax={tmax}")]
    InvalidTemperatureRange {
        label: String,
        tmin: f64,
        tint: f64,
        tmax: f64,
    },
    #[error("malformed thermo block: {0}")]
    MalformedThermoBlock(String),
    #[error("Unexpected species identifier {species} in reaction {reaction}.")]
    UnexpectedSpecies { species: String, reaction: String },
    #[error("malformed reaction entry '{entry}': {reason}")]
    MalformedReaction { entry: String, reason: String },
    #[error("Encountered unmarked duplicate reaction {0}.")]
    UnmarkedDuplicate(String),
    #[error("unsupported units in REACTIONS header: {0}")]
    UnsupportedUnits(String),
    #[error("invalid adjacency list for '{label}': {reason}")]
    AdjacencyList { label: String, reason: String },
    #[error("malformed transport record '{line}': {reason}")]
    MalformedTransport { line: String, reason: String },
    #[error("unable to produce a valid CHEMKIN identifier for species {0}")]
    NoValidIdentifier(String),
    #[error("species identifier {0} is used by more than one species")]
    DuplicateIdentifier(String),
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
