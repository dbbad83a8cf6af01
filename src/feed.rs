// Input boundary between the report fetcher and the summary engine.
use crate::ranking::{rank, RankedMunicipality};
use crate::summary::{aggregate, Diagnostic, SummaryRules};
use crate::types::{EmergencyReport, SummaryStats};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

/// What the fetcher has handed over so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Feed {
    /// Still fetching; nothing to aggregate yet.
    #[default]
    Loading,
    /// The fetch finished but did not produce a list of reports.
    Invalid,
    Ready(Vec<EmergencyReport>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSummary {
    pub province: String,
    pub stats: SummaryStats,
    pub municipalities: Vec<RankedMunicipality>,
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryView {
    Loading,
    Unavailable,
    /// A valid but empty list; the service has nothing yet.
    Empty,
    Ready(RankedSummary),
}

pub fn summarize(feed: &Feed, rules: &SummaryRules, now: DateTime<Utc>) -> SummaryView {
    let reports = match feed {
        Feed::Loading => return SummaryView::Loading,
        Feed::Invalid => {
            warn!("Report feed is not a list; no emergency data available");
            return SummaryView::Unavailable;
        }
        Feed::Ready(reports) if reports.is_empty() => return SummaryView::Empty,
        Feed::Ready(reports) => reports,
    };

    let agg = aggregate(reports, rules, now);
    let stats = agg.summary_stats();
    let diagnostics = agg.diagnostics.clone();
    info!(
        "Aggregated {} reports: {} admitted, {} rejected, {} outside {}, {} faulted",
        stats.total_reports,
        stats.admitted_reports,
        stats.rejected_reports,
        stats.out_of_scope_reports,
        rules.filter.target(),
        stats.faulted_reports
    );
    SummaryView::Ready(RankedSummary {
        province: rules.filter.target().to_string(),
        stats,
        municipalities: rank(agg),
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReportTime;
    use chrono::TimeZone;

    fn rules() -> SummaryRules {
        SummaryRules::new("Cebu", "pending")
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap()
    }

    fn report(place: &str, people: u64) -> EmergencyReport {
        EmergencyReport {
            place_name: Some(place.to_string()),
            number_of_people: people,
            needs: Vec::new(),
            status: Some("pending".to_string()),
            timestamp: ReportTime::Absent,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    #[test]
    fn loading_and_invalid_feeds_skip_aggregation() {
        assert_eq!(summarize(&Feed::Loading, &rules(), now()), SummaryView::Loading);
        assert_eq!(summarize(&Feed::Invalid, &rules(), now()), SummaryView::Unavailable);
        assert_eq!(summarize(&Feed::Ready(Vec::new()), &rules(), now()), SummaryView::Empty);
    }

    #[test]
    fn ready_feed_is_ranked() {
        let feed = Feed::Ready(vec![
            report("Lahug, Cebu City, Cebu", 15),
            report("Invalid", 100),
            report("Tagbilaran, Tagbilaran City, Bohol", 80),
            report("Poblacion, Mandaue, Cebu", 20),
        ]);
        let SummaryView::Ready(summary) = summarize(&feed, &rules(), now()) else {
            panic!("expected a ready summary");
        };
        assert_eq!(summary.province, "cebu");
        assert_eq!(summary.municipalities.len(), 2);
        assert_eq!(summary.municipalities[0].name, "mandaue");
        assert_eq!(summary.stats.total_reports, 4);
        assert_eq!(summary.stats.admitted_reports, 2);
        assert_eq!(summary.stats.rejected_reports, 1);
        assert_eq!(summary.stats.out_of_scope_reports, 1);
        assert_eq!(summary.stats.total_people, 35);
        assert_eq!(summary.diagnostics.len(), 1);
    }

    #[test]
    fn nothing_in_province_is_still_ready() {
        let feed = Feed::Ready(vec![report("Tagbilaran, Tagbilaran City, Bohol", 80)]);
        match summarize(&feed, &rules(), now()) {
            SummaryView::Ready(summary) => assert!(summary.municipalities.is_empty()),
            other => panic!("unexpected view {:?}", other),
        }
    }
}
