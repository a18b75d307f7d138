use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::fmt;

use crate::format;
use crate::{CoreError, CoreResult};

/// Where a booking was made.
///
/// Unknown keys coming from a feed are kept as `Other` so lookups can fall
/// back to a neutral label instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    Mmt,
    Goibibo,
    MyBus,
    Personal,
    Other(String),
}

impl Source {
    pub fn key(&self) -> &str {
        match self {
            Source::Mmt => "mmt",
            Source::Goibibo => "goibibo",
            Source::MyBus => "mybus",
            Source::Personal => "personal",
            Source::Other(key) => key,
        }
    }
}

impl From<String> for Source {
    fn from(key: String) -> Self {
        match key.as_str() {
            "mmt" => Source::Mmt,
            "goibibo" => Source::Goibibo,
            "mybus" => Source::MyBus,
            "personal" => Source::Personal,
            _ => Source::Other(key),
        }
    }
}

impl From<&str> for Source {
    fn from(key: &str) -> Self {
        Source::from(key.to_string())
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        source.key().to_string()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Pending => "Pending",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    /// Payment label shown on the detail overlay.
    pub fn payment_label(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "Paid",
            _ => "Unpaid/Pending",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named time-of-day windows. Hour ranges live in the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WindowId {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl WindowId {
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "morning" => Some(WindowId::Morning),
            "afternoon" => Some(WindowId::Afternoon),
            "evening" => Some(WindowId::Evening),
            "night" => Some(WindowId::Night),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowId::Morning => "morning",
            WindowId::Afternoon => "afternoon",
            WindowId::Evening => "evening",
            WindowId::Night => "night",
        }
    }
}

/// A single bus booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: String,
    pub passenger_name: String,
    pub source: Source,
    pub origin: String,
    pub destination: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, 24-hour
    pub time: String,
    /// Epoch milliseconds of `date` + `time` in local time.
    pub timestamp: i64,
    pub time_hour: u8,
    pub seats: u32,
    pub fare: f64,
    pub status: BookingStatus,
    #[serde(default)]
    pub raw: String,
}

/// Input for [`BookingRecord::new`]. Derived fields are computed from it.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub id: String,
    pub passenger_name: String,
    pub source: Source,
    pub origin: String,
    pub destination: String,
    pub departs_at: NaiveDateTime,
    pub seats: u32,
    pub seat_rate: f64,
    pub status: BookingStatus,
    pub notes: Option<String>,
}

impl BookingRecord {
    pub fn new(new: NewBooking) -> Self {
        let date = new.departs_at.date();
        let time = new.departs_at.time();
        let timestamp = format::local_millis(date, time)
            .unwrap_or_else(|| new.departs_at.and_utc().timestamp_millis());
        let raw = match new.notes {
            Some(notes) => serde_json::json!({ "notes": notes }).to_string(),
            None => String::new(),
        };

        Self {
            id: new.id,
            passenger_name: new.passenger_name,
            source: new.source,
            origin: new.origin,
            destination: new.destination,
            date: date.format("%Y-%m-%d").to_string(),
            time: format!("{:02}:{:02}", time.hour(), time.minute()),
            timestamp,
            time_hour: time.hour() as u8,
            seats: new.seats,
            fare: new.seat_rate * new.seats as f64,
            status: new.status,
            raw,
        }
    }

    /// Calendar date, or `None` when the stored string does not parse.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        format::parse_date(&self.date)
    }

    /// Notes carried in the `raw` side-channel.
    pub fn notes(&self) -> Option<String> {
        format::parse_notes(&self.raw)
    }

    /// Checks the record invariants a feed must uphold.
    pub fn validate(&self) -> CoreResult<()> {
        if self.id.is_empty() {
            return Err(CoreError::ValidationError("booking id is empty".to_string()));
        }
        if self.origin == self.destination {
            return Err(CoreError::ValidationError(format!(
                "booking {} has identical origin and destination ({})",
                self.id, self.origin
            )));
        }
        if self.seats == 0 {
            return Err(CoreError::ValidationError(format!("booking {} has no seats", self.id)));
        }
        if !self.fare.is_finite() || self.fare < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "booking {} has invalid fare {}",
                self.id, self.fare
            )));
        }
        match format::parse_time(&self.time) {
            Some(time) if time.hour() == u32::from(self.time_hour) => {}
            Some(_) => {
                return Err(CoreError::ValidationError(format!(
                    "booking {} has hour {} but time {}",
                    self.id, self.time_hour, self.time
                )));
            }
            None => {
                return Err(CoreError::ValidationError(format!(
                    "booking {} has invalid time {:?}",
                    self.id, self.time
                )));
            }
        }
        Ok(())
    }
}

/// Source selection in the filter bar. `"all"` is the sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceFilter {
    #[default]
    All,
    Only(Source),
}

impl From<String> for SourceFilter {
    fn from(value: String) -> Self {
        if value == "all" {
            SourceFilter::All
        } else {
            SourceFilter::Only(Source::from(value))
        }
    }
}

impl From<SourceFilter> for String {
    fn from(filter: SourceFilter) -> Self {
        match filter {
            SourceFilter::All => "all".to_string(),
            SourceFilter::Only(source) => source.into(),
        }
    }
}

/// Time-window selection in the filter bar. Unknown ids resolve to `All`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WindowFilter {
    #[default]
    All,
    Only(WindowId),
}

impl From<String> for WindowFilter {
    fn from(value: String) -> Self {
        if value == "all" {
            return WindowFilter::All;
        }
        match WindowId::parse(&value) {
            Some(id) => WindowFilter::Only(id),
            None => {
                tracing::warn!("Unknown time window '{}', falling back to all", value);
                WindowFilter::All
            }
        }
    }
}

impl From<WindowFilter> for String {
    fn from(filter: WindowFilter) -> Self {
        match filter {
            WindowFilter::All => "all".to_string(),
            WindowFilter::Only(id) => id.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    pub source: SourceFilter,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub time_window: WindowFilter,
    pub search: String,
}

impl FilterConfig {
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Source(source) => self.source = source,
            FilterUpdate::StartDate(date) => self.start_date = date,
            FilterUpdate::EndDate(date) => self.end_date = date,
            FilterUpdate::TimeWindow(window) => self.time_window = window,
            FilterUpdate::Search(search) => self.search = search,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == FilterConfig::default()
    }
}

/// One field edit coming from the filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Source(SourceFilter),
    StartDate(Option<NaiveDate>),
    EndDate(Option<NaiveDate>),
    TimeWindow(WindowFilter),
    Search(String),
}

impl FilterUpdate {
    /// Builds an update from a form field name and its raw value.
    ///
    /// Empty date values clear the bound.
    pub fn parse(field: &str, value: &str) -> CoreResult<Self> {
        match field {
            "source" => Ok(FilterUpdate::Source(SourceFilter::from(value.to_string()))),
            "startDate" => Ok(FilterUpdate::StartDate(parse_date_field(field, value)?)),
            "endDate" => Ok(FilterUpdate::EndDate(parse_date_field(field, value)?)),
            "timeWindow" => Ok(FilterUpdate::TimeWindow(WindowFilter::from(value.to_string()))),
            "search" => Ok(FilterUpdate::Search(value.to_string())),
            other => Err(CoreError::ValidationError(format!("unknown filter field '{}'", other))),
        }
    }
}

fn parse_date_field(field: &str, value: &str) -> CoreResult<Option<NaiveDate>> {
    if value.is_empty() {
        return Ok(None);
    }
    format::parse_date(value)
        .map(Some)
        .ok_or_else(|| CoreError::ValidationError(format!("{} '{}' is not a YYYY-MM-DD date", field, value)))
}

/// Sortable table columns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    PassengerName,
    Source,
    Origin,
    Destination,
    Date,
    Time,
    Timestamp,
    TimeHour,
    Seats,
    Fare,
    Status,
}

impl SortKey {
    pub fn is_numeric(&self) -> bool {
        matches!(self, SortKey::Timestamp | SortKey::TimeHour | SortKey::Seats | SortKey::Fare)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::Timestamp,
            direction: SortDirection::Descending,
        }
    }
}

impl SortConfig {
    /// Next configuration after a click on the `key` column header.
    pub fn toggled(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self { key, direction }
    }
}
