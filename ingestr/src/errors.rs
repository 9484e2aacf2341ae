//! Errors which callers may want to match on.
//!
//! Anything that is only ever reported to a human uses [`crate::Error`]
//! instead.

use thiserror::Error;

/// An error splitting a `"<dataset>.<table>"` identifier.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum TableNameError {
    /// The identifier did not contain a non-empty dataset and table.
    #[error("Table name must be in the format <schema>.<table>")]
    InvalidFormat,
}

/// An error configuring a blob-storage destination.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum DestinationError {
    /// The destination table did not contain a bucket and a path.
    #[error("Table name must be in the format {{bucket-name}}/{{path}}")]
    InvalidTable,
    /// A required connection parameter was missing.
    #[error("{value} is required to connect to {destination}")]
    MissingValue {
        /// The name of the missing parameter.
        value: &'static str,
        /// The kind of destination we were connecting to.
        destination: &'static str,
    },
    /// `endpoint_url` was not an absolute URL.
    #[error("Invalid endpoint_url. Must be a valid URL.")]
    InvalidEndpoint,
}

/// An error parsing or applying a column mask.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum MaskError {
    /// The mask was not of the form `column:algorithm[:param]`.
    #[error("Invalid mask configuration: {0}. Expected format: 'column:algorithm[:param]'")]
    InvalidConfig(String),
    /// We do not know this masking algorithm.
    #[error("Unknown masking algorithm: {0}")]
    UnknownAlgorithm(String),
    /// The algorithm's parameter could not be used.
    #[error("invalid parameter {param:?} for masking algorithm {algorithm}")]
    InvalidParam {
        /// The algorithm name.
        algorithm: String,
        /// The parameter, as written.
        param: String,
    },
}

/// An error parsing a Google Analytics minute range list.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum MinuteRangeError {
    /// A range had no `-` in it.
    #[error("Invalid input. Minutes range should be startminute-endminute format. For example: 1-2,5-6")]
    MissingDash,
    /// One of the bounds of a range was not a number.
    #[error("Invalid input '{0}'. Both start and end minutes must be digits. For example: 1-2,5-6")]
    NotDigits(String),
}

/// An error splitting a time range into chunks.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum ChunkError {
    /// Asked for zero chunks.
    #[error("cannot split a time range into zero chunks")]
    ZeroChunks,
    /// Asked for windows zero days long.
    #[error("date windows must be at least one day long")]
    ZeroDays,
}

#[test]
fn error_messages_match_adapter_wording() {
    assert_eq!(
        TableNameError::InvalidFormat.to_string(),
        "Table name must be in the format <schema>.<table>",
    );
    assert_eq!(
        DestinationError::InvalidTable.to_string(),
        "Table name must be in the format {bucket-name}/{path}",
    );
    assert_eq!(
        DestinationError::MissingValue {
            value: "access_key_id",
            destination: "S3",
        }
        .to_string(),
        "access_key_id is required to connect to S3",
    );
}
