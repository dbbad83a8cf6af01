use crate::error::OutputError;
use crate::feed::{RankedSummary, SummaryView};
use crate::ranking::{severity_ratio, Severity};
use crate::summary::BucketStats;
use crate::types::{BarangayRow, Location, MunicipalityRow};
use crate::util::{format_int, format_number};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use url::form_urlencoded;

pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<(), OutputError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), OutputError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y, %I:%M %p").to_string()
}

pub fn format_location(loc: Location) -> String {
    format!("{:.4}°N, {:.4}°E", loc.lat, loc.lng)
}

pub fn status_text(stats: &BucketStats) -> String {
    format!(
        "{} Pending / {} Resolved",
        stats.pending_count, stats.resolved_count
    )
}

/// Width of the pending part of a status bar, in percent.
pub fn status_bar_pct(stats: &BucketStats) -> f64 {
    stats.pending_count as f64 / stats.report_count().max(1) as f64 * 100.0
}

/// Google Maps driving directions to a barangay. `None` when the barangay
/// has no usable coordinates.
pub fn directions_url(
    dest: Location,
    place_label: &str,
    origin: Option<Location>,
) -> Option<String> {
    if dest.lat == 0.0 || dest.lng == 0.0 {
        return None;
    }
    let mut url = String::from("https://www.google.com/maps/dir/?api=1");
    if let Some(o) = origin {
        url.push_str(&format!("&origin={},{}", o.lat, o.lng));
    }
    let place: String = form_urlencoded::byte_serialize(place_label.as_bytes()).collect();
    url.push_str(&format!(
        "&destination={},{}&destination_place_id={}&travelmode=driving",
        dest.lat, dest.lng, place
    ));
    Some(url)
}

fn join_needs(stats: &BucketStats) -> String {
    stats.needs.iter().cloned().collect::<Vec<_>>().join(", ")
}

pub fn municipality_rows(summary: &RankedSummary) -> Vec<MunicipalityRow> {
    summary
        .municipalities
        .iter()
        .enumerate()
        .map(|(idx, m)| MunicipalityRow {
            rank: idx + 1,
            municipality: m.name.clone(),
            affected: format_int(m.stats.total_people),
            pending: m.stats.pending_count,
            resolved: m.stats.resolved_count,
            pending_pct: format_number(
                severity_ratio(m.stats.pending_count, m.stats.resolved_count) * 100.0,
                1,
            ),
            severity: Severity::of(&m.stats).to_string(),
            needs: join_needs(&m.stats),
            last_updated: format_date(m.stats.latest_update),
        })
        .collect()
}

pub fn barangay_rows(summary: &RankedSummary, origin: Option<Location>) -> Vec<BarangayRow> {
    summary
        .municipalities
        .iter()
        .flat_map(|m| {
            m.barangays.iter().map(move |b| BarangayRow {
                municipality: m.name.clone(),
                barangay: b.name.clone(),
                location: format_location(b.summary.location),
                affected: format_int(b.summary.stats.total_people),
                needs: join_needs(&b.summary.stats),
                status: status_text(&b.summary.stats),
                last_updated: format_date(b.summary.stats.latest_update),
                directions: directions_url(
                    b.summary.location,
                    &format!("{}, {}", b.name, m.name),
                    origin,
                )
                .unwrap_or_default(),
            })
        })
        .collect()
}

/// Message to show instead of tables, if any.
pub fn view_message(view: &SummaryView) -> Option<String> {
    match view {
        SummaryView::Loading | SummaryView::Empty => {
            Some("Fetching emergency reports...".to_string())
        }
        SummaryView::Unavailable => Some("No emergency data available".to_string()),
        SummaryView::Ready(s) if s.municipalities.is_empty() => {
            Some(format!("No data available for {} region", title_case(&s.province)))
        }
        SummaryView::Ready(_) => None,
    }
}

fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print the municipality ranking and, for the top municipalities, their
/// barangays.
pub fn print_summary(summary: &RankedSummary, max_rows: usize) {
    println!("Emergency Summary by Municipality\n");
    preview_table_rows(&municipality_rows(summary), max_rows);
    let barangays = barangay_rows(summary, None);
    for m in summary.municipalities.iter().take(max_rows) {
        println!(
            "{}: {} affected, {} (pending {}%)",
            m.name,
            format_int(m.stats.total_people),
            status_text(&m.stats),
            format_number(status_bar_pct(&m.stats), 0)
        );
        let rows: Vec<BarangayRow> = barangays
            .iter()
            .filter(|row| row.municipality == m.name)
            .cloned()
            .collect();
        preview_table_rows(&rows, max_rows);
    }
}
