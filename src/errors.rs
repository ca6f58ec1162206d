use thiserror::Error;

/// Everything that can stop an export run. Each variant is fatal: `main`
/// prints it and exits non-zero.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Output file must end with .csv - invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Invalid date, expected YYYY-MM-DD: {0}")]
    InvalidDate(String),

    #[error("No API token configured. Set AVHDATA_API_TOKEN or [leads] token in the secret config.")]
    MissingToken,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request to API Failed: {0}")]
    ApiRequestFailed(String),

    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    #[error("No records returned. No file created. Check query dates.")]
    EmptyResultSet,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
