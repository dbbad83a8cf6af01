use thiserror::Error;

/// Problems with a single report. These never abort a run; the report is
/// left out of (the rest of) the summary and the error is kept as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("report has no place name")]
    MissingPlaceName,
    #[error(
        "invalid place name format {place_name:?}: \
         expected barangay, municipality, province but found {found} part(s)"
    )]
    TooFewSegments { place_name: String, found: usize },
    #[error("affected population total overflowed while adding {people}")]
    PeopleOverflow { people: u64 },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read reports: {0}")]
    Io(#[from] std::io::Error),
    #[error("reports are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("report service answered with success = false")]
    Unsuccessful,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv export error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json export error: {0}")]
    Json(#[from] serde_json::Error),
}
