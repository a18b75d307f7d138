use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::catalog::{self, TimeWindow, TIME_WINDOWS};
use crate::format;
use crate::models::{
    BookingRecord, BookingStatus, FilterConfig, Source, SourceFilter, SortConfig, SortDirection, SortKey, WindowFilter,
    WindowId,
};

/// Output of one pass of the pipeline. `visible` borrows from the record
/// collection it was derived from.
#[derive(Debug, Clone)]
pub struct Derived<'a> {
    pub visible: Vec<&'a BookingRecord>,
    pub aggregates: Aggregates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub total_bookings: usize,
    pub total_fare: f64,
    pub bookings_today_count: usize,
    pub confirmed_bookings: usize,
    pub average_fare: f64,
    pub bookings_by_source: Vec<SourceSlice>,
    pub booking_trend: Vec<TrendPoint>,
    pub time_distribution: Vec<WindowCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSlice {
    pub source: Source,
    pub label: &'static str,
    pub count: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowCount {
    pub id: WindowId,
    pub label: &'static str,
    pub count: usize,
}

/// Filters, sorts and aggregates `records` as of the local calendar date.
pub fn derive<'a>(records: &'a [BookingRecord], filters: &FilterConfig, sort: &SortConfig) -> Derived<'a> {
    derive_at(records, filters, sort, format::today_local())
}

/// Same as [`derive`] with an explicit "today" for the bookings-today count.
pub fn derive_at<'a>(
    records: &'a [BookingRecord],
    filters: &FilterConfig,
    sort: &SortConfig,
    today: NaiveDate,
) -> Derived<'a> {
    let visible: Vec<&BookingRecord> = visible_indices(records, filters, sort)
        .into_iter()
        .map(|i| &records[i])
        .collect();
    let aggregates = aggregate(records, &visible, today);
    debug!("Derived {} visible of {} bookings", visible.len(), records.len());

    Derived { visible, aggregates }
}

/// Positions of the filtered records in `records`, in display order.
pub fn visible_indices(records: &[BookingRecord], filters: &FilterConfig, sort: &SortConfig) -> Vec<usize> {
    let predicate = Predicate::compile(filters);
    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| predicate.matches(record))
        .map(|(i, _)| i)
        .collect();
    indices.sort_by(|&a, &b| compare(&records[a], &records[b], sort));
    indices
}

pub fn filter_records<'a>(records: &'a [BookingRecord], filters: &FilterConfig) -> Vec<&'a BookingRecord> {
    let predicate = Predicate::compile(filters);
    records.iter().filter(|record| predicate.matches(record)).collect()
}

pub fn sort_records(records: &mut [&BookingRecord], sort: &SortConfig) {
    records.sort_by(|a, b| compare(a, b, sort));
}

/// Filter configuration resolved once per pass.
struct Predicate<'f> {
    source: Option<&'f Source>,
    start_date: Option<NaiveDate>,
    end_millis: Option<i64>,
    window: Option<&'static TimeWindow>,
    search: Option<String>,
}

impl<'f> Predicate<'f> {
    fn compile(filters: &'f FilterConfig) -> Self {
        let source = match &filters.source {
            SourceFilter::All => None,
            SourceFilter::Only(source) => Some(source),
        };
        let end_millis = filters.end_date.map(|date| {
            format::end_of_day_millis(date).unwrap_or_else(|| {
                date.and_hms_milli_opt(23, 59, 59, 999)
                    .map(|dt| dt.and_utc().timestamp_millis())
                    .unwrap_or(i64::MAX)
            })
        });
        let window = match filters.time_window {
            WindowFilter::All => None,
            WindowFilter::Only(id) => Some(catalog::time_window(id)),
        };
        let search = if filters.search.is_empty() {
            None
        } else {
            Some(filters.search.to_lowercase())
        };

        Self {
            source,
            start_date: filters.start_date,
            end_millis,
            window,
            search,
        }
    }

    fn matches(&self, record: &BookingRecord) -> bool {
        if let Some(source) = self.source {
            if record.source != *source {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            match record.parsed_date() {
                Some(date) if date >= start => {}
                _ => return false,
            }
        }
        if let Some(end) = self.end_millis {
            if record.timestamp > end {
                return false;
            }
        }
        if let Some(window) = self.window {
            if !window.contains(record.time_hour) {
                return false;
            }
        }
        if let Some(query) = &self.search {
            if !record.passenger_name.to_lowercase().contains(query.as_str())
                && !record.id.to_lowercase().contains(query.as_str())
            {
                return false;
            }
        }
        true
    }
}

pub fn compare(a: &BookingRecord, b: &BookingRecord, sort: &SortConfig) -> Ordering {
    let ordering = match sort.key {
        SortKey::Timestamp => a.timestamp.cmp(&b.timestamp),
        SortKey::TimeHour => a.time_hour.cmp(&b.time_hour),
        SortKey::Seats => a.seats.cmp(&b.seats),
        SortKey::Fare => a.fare.partial_cmp(&b.fare).unwrap_or(Ordering::Equal),
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::PassengerName => a.passenger_name.cmp(&b.passenger_name),
        SortKey::Source => a.source.key().cmp(b.source.key()),
        SortKey::Origin => a.origin.cmp(&b.origin),
        SortKey::Destination => a.destination.cmp(&b.destination),
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Time => a.time.cmp(&b.time),
        SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
    };
    match sort.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Bookings whose calendar date is `day`, ignoring every filter.
pub fn bookings_on(records: &[BookingRecord], day: NaiveDate) -> usize {
    records.iter().filter(|r| r.parsed_date() == Some(day)).count()
}

/// Summary metrics over `visible`. Only the bookings-today count looks at
/// the unfiltered `records`.
pub fn aggregate(records: &[BookingRecord], visible: &[&BookingRecord], today: NaiveDate) -> Aggregates {
    let total_bookings = visible.len();
    let total_fare: f64 = visible.iter().map(|r| r.fare).sum();
    let average_fare = if total_bookings == 0 {
        0.0
    } else {
        total_fare / total_bookings as f64
    };
    let confirmed_bookings = visible
        .iter()
        .filter(|r| r.status == BookingStatus::Confirmed)
        .count();
    let bookings_today_count = bookings_on(records, today);

    Aggregates {
        total_bookings,
        total_fare,
        bookings_today_count,
        confirmed_bookings,
        average_fare,
        bookings_by_source: bookings_by_source(visible),
        booking_trend: booking_trend(visible),
        time_distribution: time_distribution(visible),
    }
}

fn bookings_by_source(visible: &[&BookingRecord]) -> Vec<SourceSlice> {
    let mut counts: Vec<(&Source, usize)> = Vec::new();
    for record in visible {
        match counts.iter_mut().find(|(source, _)| *source == &record.source) {
            Some((_, count)) => *count += 1,
            None => counts.push((&record.source, 1)),
        }
    }

    counts
        .into_iter()
        .map(|(source, count)| SourceSlice {
            source: source.clone(),
            label: catalog::source_label(source),
            count,
            color: catalog::source_color(source),
        })
        .collect()
}

fn booking_trend(visible: &[&BookingRecord]) -> Vec<TrendPoint> {
    let mut daily: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in visible.iter().filter_map(|r| r.parsed_date()) {
        *daily.entry(date).or_insert(0) += 1;
    }

    daily
        .into_iter()
        .map(|(date, count)| TrendPoint {
            date: format::format_naive_date(date),
            count,
        })
        .collect()
}

fn time_distribution(visible: &[&BookingRecord]) -> Vec<WindowCount> {
    let mut counts = vec![0usize; TIME_WINDOWS.len()];
    let mut other = 0usize;
    for record in visible {
        if format::parse_time(&record.time).is_none() {
            continue;
        }
        let slot = catalog::window_for_hour(record.time_hour)
            .and_then(|window| TIME_WINDOWS.iter().position(|w| w.id == window.id));
        match slot {
            Some(slot) => counts[slot] += 1,
            None => other += 1,
        }
    }
    if other > 0 {
        debug!("{} bookings fall outside every named time window", other);
    }

    TIME_WINDOWS
        .iter()
        .zip(counts)
        .map(|(window, count)| WindowCount {
            id: window.id,
            label: window.label,
            count,
        })
        .collect()
}
