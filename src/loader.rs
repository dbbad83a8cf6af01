use crate::error::LoadError;
use crate::feed::Feed;
use crate::types::{EmergencyReport, RawReport, ReportTime};
use crate::util::{parse_count, parse_f64_safe, parse_string, parse_tags, parse_timestamp};
use log::{debug, info};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    /// Entries that were not JSON objects (or could not be read as one).
    pub unreadable_rows: usize,
    pub defaulted_people: usize,
    pub defaulted_timestamps: usize,
}

/// Read the report list from a file. Accepts the service envelope
/// (`{"success": true, "data": [...]}`) or a bare array.
pub fn load_reports(path: &str) -> Result<(Feed, LoadReport), LoadError> {
    let text = std::fs::read_to_string(path)?;
    let loaded = parse_reports(&text)?;
    info!("Loaded {} report(s) from {}", loaded.1.total_rows, path);
    Ok(loaded)
}

pub fn parse_reports(text: &str) -> Result<(Feed, LoadReport), LoadError> {
    let doc: Value = serde_json::from_str(text)?;
    let items = match doc {
        Value::Array(items) => items,
        Value::Object(mut envelope) => {
            if envelope.get("success").and_then(Value::as_bool) == Some(false) {
                return Err(LoadError::Unsuccessful);
            }
            match envelope.remove("data") {
                Some(Value::Array(items)) => items,
                _ => return Ok((Feed::Invalid, LoadReport::default())),
            }
        }
        _ => return Ok((Feed::Invalid, LoadReport::default())),
    };

    let mut load_report = LoadReport {
        total_rows: items.len(),
        ..LoadReport::default()
    };
    let reports = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let raw = match serde_json::from_value::<RawReport>(item) {
                Ok(raw) => raw,
                Err(e) => {
                    debug!("Report #{} is not a readable object: {}", idx, e);
                    load_report.unreadable_rows += 1;
                    RawReport::default()
                }
            };
            clean_report(raw, &mut load_report)
        })
        .collect();
    Ok((Feed::Ready(reports), load_report))
}

fn clean_report(raw: RawReport, load_report: &mut LoadReport) -> EmergencyReport {
    let number_of_people = parse_count(raw.number_of_people.as_ref()).unwrap_or_else(|| {
        if raw.number_of_people.is_some() {
            load_report.defaulted_people += 1;
        }
        0
    });
    let timestamp = parse_timestamp(raw.timestamp.as_ref());
    if timestamp == ReportTime::Absent && raw.timestamp.is_some() {
        load_report.defaulted_timestamps += 1;
    }
    EmergencyReport {
        place_name: parse_string(raw.placename.as_ref())
            .or_else(|| parse_string(raw.place_name_camel.as_ref())),
        number_of_people,
        needs: parse_tags(raw.needs.as_ref()),
        status: parse_string(raw.status.as_ref()),
        timestamp,
        latitude: parse_f64_safe(raw.latitude.as_ref()).unwrap_or(0.0),
        longitude: parse_f64_safe(raw.longitude.as_ref()).unwrap_or(0.0),
    }
}
