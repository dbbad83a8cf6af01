// Folds admitted reports into a municipality -> barangay rollup.
//
// Buckets are created the first time a report lands in them and are never
// removed. Each report's contribution is validated before it touches any
// bucket, so a faulty report leaves the rollup exactly as it was.
use crate::error::RecordError;
use crate::filter::ProvinceFilter;
use crate::location::parse_place_name;
use crate::types::{EmergencyReport, Location, ReportTime, SummaryStats};
use chrono::{DateTime, Utc};
use log::{error, trace, warn};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Insertion-ordered map from normalized name to bucket. First-seen order is
/// what the ranker falls back on for ties.
#[derive(Debug, Clone, PartialEq)]
pub struct Buckets<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> Default for Buckets<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Buckets<T> {
    pub fn get_or_insert_with(&mut self, key: &str, init: impl FnOnce() -> T) -> &mut T {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.entries.push((key.to_string(), init()));
                self.index.insert(key.to_string(), idx);
                idx
            }
        };
        &mut self.entries[idx].1
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&idx| &self.entries[idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(String, T)> {
        self.entries
    }
}

/// Running statistics shared by both levels of the rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketStats {
    pub total_people: u64,
    pub needs: BTreeSet<String>,
    pub pending_count: usize,
    pub resolved_count: usize,
    pub latest_update: DateTime<Utc>,
}

impl Default for BucketStats {
    fn default() -> Self {
        Self {
            total_people: 0,
            needs: BTreeSet::new(),
            pending_count: 0,
            resolved_count: 0,
            latest_update: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

impl BucketStats {
    pub fn report_count(&self) -> usize {
        self.pending_count + self.resolved_count
    }

    fn apply(&mut self, c: &Contribution<'_>, total_people: u64) {
        self.total_people = total_people;
        self.needs.extend(c.needs.iter().cloned());
        if c.pending {
            self.pending_count += 1;
        } else {
            self.resolved_count += 1;
        }
        self.latest_update = self.latest_update.max(c.at);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarangaySummary {
    #[serde(flatten)]
    pub stats: BucketStats,
    /// Coordinates of the first report seen for this barangay.
    pub location: Location,
    pub reports: Vec<EmergencyReport>,
}

impl BarangaySummary {
    fn new(location: Location) -> Self {
        Self {
            stats: BucketStats::default(),
            location,
            reports: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MunicipalitySummary {
    pub stats: BucketStats,
    pub barangays: Buckets<BarangaySummary>,
}

/// What a run is configured to look for.
#[derive(Debug, Clone)]
pub struct SummaryRules {
    pub filter: ProvinceFilter,
    pub pending_marker: String,
}

impl SummaryRules {
    pub fn new(target_province: &str, pending_marker: &str) -> Self {
        Self {
            filter: ProvinceFilter::new(target_province),
            pending_marker: pending_marker.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    OutOfScope,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Position of the report in the input list.
    pub index: usize,
    pub error: RecordError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "report #{}: {}", self.index, self.error)
    }
}

struct Contribution<'a> {
    needs: &'a [String],
    pending: bool,
    at: DateTime<Utc>,
}

/// Missing or unusable timestamps count as `now`.
pub fn effective_timestamp(time: ReportTime, now: DateTime<Utc>) -> DateTime<Utc> {
    match time {
        ReportTime::At(ts) => ts,
        ReportTime::Absent => now,
    }
}

/// Result of one aggregation run. Built from scratch each time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub municipalities: Buckets<MunicipalitySummary>,
    pub diagnostics: Vec<Diagnostic>,
    pub total_reports: usize,
    pub rejected_reports: usize,
    pub out_of_scope_reports: usize,
    pub faulted_reports: usize,
}

impl Aggregation {
    /// Parse, filter and fold a single report.
    pub fn fold(
        &mut self,
        report: &EmergencyReport,
        rules: &SummaryRules,
        now: DateTime<Utc>,
    ) -> Result<Admission, RecordError> {
        let place = parse_place_name(report.place_name.as_deref())?;
        if !rules.filter.admits(&place) {
            return Ok(Admission::OutOfScope);
        }

        // Totals are checked against the current buckets before anything is
        // created, so a faulty report leaves no trace.
        let people = report.number_of_people;
        let existing = self.municipalities.get(&place.municipality);
        let municipality_total = existing
            .map_or(0, |m| m.stats.total_people)
            .checked_add(people)
            .ok_or(RecordError::PeopleOverflow { people })?;
        let barangay_total = existing
            .and_then(|m| m.barangays.get(&place.barangay))
            .map_or(0, |b| b.stats.total_people)
            .checked_add(people)
            .ok_or(RecordError::PeopleOverflow { people })?;

        let MunicipalitySummary { stats, barangays } = self
            .municipalities
            .get_or_insert_with(&place.municipality, MunicipalitySummary::default);
        let barangay = barangays.get_or_insert_with(&place.barangay, || {
            BarangaySummary::new(report.location())
        });
        let contribution = Contribution {
            needs: &report.needs,
            pending: report.is_pending(&rules.pending_marker),
            at: effective_timestamp(report.timestamp, now),
        };
        stats.apply(&contribution, municipality_total);
        barangay.stats.apply(&contribution, barangay_total);
        barangay.reports.push(report.clone());
        Ok(Admission::Admitted)
    }

    pub fn admitted_reports(&self) -> usize {
        self.total_reports - self.rejected_reports - self.out_of_scope_reports
    }

    pub fn summary_stats(&self) -> SummaryStats {
        let (barangays, total_people) = self
            .municipalities
            .iter()
            .fold((0, 0u64), |(n, people), (_, m)| {
                (n + m.barangays.len(), people.saturating_add(m.stats.total_people))
            });
        SummaryStats {
            total_reports: self.total_reports,
            admitted_reports: self.admitted_reports(),
            rejected_reports: self.rejected_reports,
            out_of_scope_reports: self.out_of_scope_reports,
            faulted_reports: self.faulted_reports,
            municipalities: self.municipalities.len(),
            barangays,
            total_people,
        }
    }
}

/// Run the whole input through the parser, filter and accumulator.
///
/// `now` stands in for missing timestamps; passing the same value makes two
/// runs over the same input produce identical results.
pub fn aggregate(
    reports: &[EmergencyReport],
    rules: &SummaryRules,
    now: DateTime<Utc>,
) -> Aggregation {
    let mut agg = Aggregation {
        total_reports: reports.len(),
        ..Aggregation::default()
    };
    for (index, report) in reports.iter().enumerate() {
        match agg.fold(report, rules, now) {
            Ok(Admission::Admitted) => {}
            Ok(Admission::OutOfScope) => {
                agg.out_of_scope_reports += 1;
                trace!("report #{} is outside {}", index, rules.filter.target());
            }
            Err(e) => {
                match e {
                    RecordError::MissingPlaceName | RecordError::TooFewSegments { .. } => {
                        agg.rejected_reports += 1;
                        warn!("Skipping report #{}: {}", index, e);
                    }
                    RecordError::PeopleOverflow { .. } => {
                        agg.faulted_reports += 1;
                        error!("Error processing report #{}: {}", index, e);
                    }
                }
                agg.diagnostics.push(Diagnostic { index, error: e });
            }
        }
    }
    agg
}
