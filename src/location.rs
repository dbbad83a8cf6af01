// Splits a free-text place name ("Lahug, Cebu City, Cebu") into its
// barangay / municipality / province parts.
use crate::error::RecordError;

/// Lower-cased and trimmed. Every name is passed through this before it is
/// compared or used as a key.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPlace {
    pub barangay: String,
    pub municipality: String,
    pub province: String,
}

/// All comma-separated segments of a place name, normalized, in order.
pub fn split_segments(place_name: &str) -> Vec<String> {
    place_name.split(',').map(normalize_name).collect()
}

/// Parse `barangay, municipality, province[, ...]`. Segments past the third
/// are ignored.
pub fn parse_place_name(place_name: Option<&str>) -> Result<ParsedPlace, RecordError> {
    let place_name = match place_name {
        Some(p) if !p.is_empty() => p,
        _ => return Err(RecordError::MissingPlaceName),
    };
    let mut segments = split_segments(place_name).into_iter();
    match (segments.next(), segments.next(), segments.next()) {
        (Some(barangay), Some(municipality), Some(province)) => Ok(ParsedPlace {
            barangay,
            municipality,
            province,
        }),
        _ => Err(RecordError::TooFewSegments {
            place_name: place_name.to_string(),
            found: place_name.split(',').count(),
        }),
    }
}
