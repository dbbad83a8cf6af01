use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

/// One element of the report list exactly as the service sends it. Every
/// field is optional and untyped so a single bad value never fails the
/// whole document.
#[derive(Debug, Default, Deserialize)]
pub struct RawReport {
    pub placename: Option<Value>,
    /// Older clients send `placeName`; `placename` wins when both are present.
    #[serde(rename = "placeName")]
    pub place_name_camel: Option<Value>,
    #[serde(rename = "numberOfPeople")]
    pub number_of_people: Option<Value>,
    pub needs: Option<Value>,
    pub status: Option<Value>,
    pub timestamp: Option<Value>,
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
}

/// When a report was filed, as far as the loader could tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportTime {
    /// Missing or unusable; the summary treats it as "now".
    Absent,
    At(DateTime<Utc>),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyReport {
    pub place_name: Option<String>,
    pub number_of_people: u64,
    pub needs: Vec<String>,
    pub status: Option<String>,
    pub timestamp: ReportTime,
    pub latitude: f64,
    pub longitude: f64,
}

impl EmergencyReport {
    pub fn location(&self) -> Location {
        Location {
            lat: self.latitude,
            lng: self.longitude,
        }
    }

    pub fn is_pending(&self, pending_marker: &str) -> bool {
        self.status.as_deref() == Some(pending_marker)
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MunicipalityRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Municipality")]
    #[tabled(rename = "Municipality")]
    pub municipality: String,
    #[serde(rename = "Affected")]
    #[tabled(rename = "Affected")]
    pub affected: String,
    #[serde(rename = "Pending")]
    #[tabled(rename = "Pending")]
    pub pending: usize,
    #[serde(rename = "Resolved")]
    #[tabled(rename = "Resolved")]
    pub resolved: usize,
    #[serde(rename = "PendingPct")]
    #[tabled(rename = "PendingPct")]
    pub pending_pct: String,
    #[serde(rename = "Severity")]
    #[tabled(rename = "Severity")]
    pub severity: String,
    #[serde(rename = "Needs")]
    #[tabled(rename = "Needs")]
    pub needs: String,
    #[serde(rename = "LastUpdated")]
    #[tabled(rename = "LastUpdated")]
    pub last_updated: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct BarangayRow {
    #[serde(rename = "Municipality")]
    #[tabled(skip)]
    pub municipality: String,
    #[serde(rename = "Barangay")]
    #[tabled(rename = "Barangay")]
    pub barangay: String,
    #[serde(rename = "Location")]
    #[tabled(rename = "Location")]
    pub location: String,
    #[serde(rename = "Affected")]
    #[tabled(rename = "Affected")]
    pub affected: String,
    #[serde(rename = "Needs")]
    #[tabled(rename = "Needs")]
    pub needs: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
    #[serde(rename = "LastUpdated")]
    #[tabled(rename = "LastUpdated")]
    pub last_updated: String,
    #[serde(rename = "Directions")]
    #[tabled(skip)]
    pub directions: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub total_reports: usize,
    pub admitted_reports: usize,
    pub rejected_reports: usize,
    pub out_of_scope_reports: usize,
    pub faulted_reports: usize,
    pub municipalities: usize,
    pub barangays: usize,
    pub total_people: u64,
}
