use thiserror::Error;

/// Failures from the A1-notation parser. Parsing is total: a given input
/// always produces the same range or the same error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid range format '{0}': expected 'A1:B2' notation")]
    InvalidRangeFormat(String),
    #[error("invalid cell notation '{0}'")]
    InvalidCellNotation(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color format: expected an object with red/green/blue/alpha components")]
pub struct InvalidColorFormat;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("sheet '{0}' not found")]
pub struct SheetNotFound(pub String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported export format '{0}': must be one of csv, pdf, xlsx, ods, tsv")]
pub struct UnsupportedFormat(pub String);

/// Resource URI failures. Unlike tool errors these surface as protocol
/// errors: the resource-read path has no error-envelope convention.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UriError {
    #[error("invalid URI format")]
    MissingScheme,
    #[error("invalid URI format: missing spreadsheet_id")]
    MissingSpreadsheetId,
}

/// Remote call failures, reduced to the pieces handlers wrap with operation
/// context. Retry/backoff belongs to the transport, not this layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}
