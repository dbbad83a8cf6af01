use crate::summary::{Aggregation, BarangaySummary, BucketStats};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBarangay {
    pub name: String,
    #[serde(flatten)]
    pub summary: BarangaySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMunicipality {
    pub name: String,
    #[serde(flatten)]
    pub stats: BucketStats,
    pub barangays: Vec<RankedBarangay>,
}

/// Share of a bucket's reports that are still pending. An empty bucket is 0.
pub fn severity_ratio(pending: usize, resolved: usize) -> f64 {
    let total = pending + resolved;
    if total == 0 {
        return 0.0;
    }
    pending as f64 / total as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn classify(pending: usize, resolved: usize) -> Self {
        let ratio = severity_ratio(pending, resolved);
        if ratio > 0.70 {
            Severity::High
        } else if ratio > 0.30 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn of(stats: &BucketStats) -> Self {
        Self::classify(stats.pending_count, stats.resolved_count)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        };
        f.write_str(s)
    }
}

/// Order municipalities, and the barangays inside each, by affected people
/// (highest first). `sort_by` is stable, so equal totals keep first-seen order.
pub fn rank(agg: Aggregation) -> Vec<RankedMunicipality> {
    let mut ranked: Vec<RankedMunicipality> = agg
        .municipalities
        .into_entries()
        .into_iter()
        .map(|(name, m)| {
            let mut barangays: Vec<RankedBarangay> = m
                .barangays
                .into_entries()
                .into_iter()
                .map(|(name, summary)| RankedBarangay { name, summary })
                .collect();
            barangays.sort_by(|a, b| {
                b.summary.stats.total_people.cmp(&a.summary.stats.total_people)
            });
            RankedMunicipality {
                name,
                stats: m.stats,
                barangays,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.stats.total_people.cmp(&a.stats.total_people));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{aggregate, SummaryRules};
    use crate::types::{EmergencyReport, ReportTime};
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap()
    }

    fn report(place: &str, people: u64, status: &str) -> EmergencyReport {
        EmergencyReport {
            place_name: Some(place.to_string()),
            number_of_people: people,
            needs: vec!["food".to_string()],
            status: Some(status.to_string()),
            timestamp: ReportTime::Absent,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn ranked(reports: &[EmergencyReport]) -> Vec<RankedMunicipality> {
        rank(aggregate(reports, &SummaryRules::new("cebu", "pending"), now()))
    }

    fn names(ranked: &[RankedMunicipality]) -> Vec<&str> {
        ranked.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn ranks_by_affected_people() {
        let out = ranked(&[
            report("Lahug, Cebu City, Cebu", 10, "pending"),
            report("Lahug, Cebu City, Cebu", 5, "resolved"),
            report("Poblacion, Mandaue, Cebu", 20, "pending"),
        ]);
        assert_eq!(names(&out), vec!["mandaue", "cebu city"]);
        assert_eq!(out[0].stats.total_people, 20);
        assert_eq!(out[1].stats.total_people, 15);
        assert_eq!(out[1].barangays.len(), 1);
        assert_eq!(out[1].barangays[0].name, "lahug");
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let out = ranked(&[
            report("A, Talisay, Cebu", 5, "pending"),
            report("B, Danao, Cebu", 9, "pending"),
            report("C, Carcar, Cebu", 5, "pending"),
            report("D, Naga, Cebu", 5, "pending"),
        ]);
        assert_eq!(names(&out), vec!["danao", "talisay", "carcar", "naga"]);
    }

    #[test]
    fn barangays_are_ranked_within_municipality() {
        let out = ranked(&[
            report("Lahug, Cebu City, Cebu", 1, "pending"),
            report("Talamban, Cebu City, Cebu", 8, "pending"),
            report("Guadalupe, Cebu City, Cebu", 1, "pending"),
            report("Mabolo, Cebu City, Cebu", 3, "pending"),
        ]);
        let barangays: Vec<&str> = out[0].barangays.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(barangays, vec!["talamban", "mabolo", "lahug", "guadalupe"]);
    }

    #[test]
    fn severity_tiers() {
        assert_eq!(severity_ratio(0, 0), 0.0);
        assert_eq!(Severity::classify(0, 0), Severity::Low);
        assert_eq!(Severity::classify(8, 2), Severity::High);
        assert_eq!(Severity::classify(7, 3), Severity::Medium);
        assert_eq!(Severity::classify(1, 1), Severity::Medium);
        assert_eq!(Severity::classify(3, 7), Severity::Low);
        assert_eq!(Severity::classify(0, 5), Severity::Low);
        assert_eq!(Severity::High.to_string(), "High");
    }

    proptest! {
        #[test]
        fn severity_ratio_is_a_fraction(pending in 0usize..10_000, resolved in 0usize..10_000) {
            let ratio = severity_ratio(pending, resolved);
            prop_assert!(!ratio.is_nan());
            prop_assert!((0.0..=1.0).contains(&ratio));
        }

        #[test]
        fn ranking_is_sorted_and_stable(people in prop::collection::vec(0u64..5, 0..30)) {
            let reports: Vec<EmergencyReport> = people
                .iter()
                .enumerate()
                .map(|(i, &p)| report(&format!("Brgy, Town {}, Cebu", i), p, "pending"))
                .collect();
            let out = ranked(&reports);
            for pair in out.windows(2) {
                prop_assert!(pair[0].stats.total_people >= pair[1].stats.total_people);
                if pair[0].stats.total_people == pair[1].stats.total_people {
                    let first: usize = pair[0].name.trim_start_matches("town ").parse().unwrap();
                    let second: usize = pair[1].name.trim_start_matches("town ").parse().unwrap();
                    prop_assert!(first < second);
                }
            }
        }
    }
}
