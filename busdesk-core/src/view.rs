use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog;
use crate::export::{self, ExportRow};
use crate::format;
use crate::models::{BookingRecord, FilterConfig, FilterUpdate, SortConfig, SortKey};
use crate::pipeline::{self, Aggregates};
use crate::{CoreError, CoreResult};

/// Rows per page in the bookings list.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Owns the record collection and everything the dashboard derives from it.
///
/// Every mutator recomputes the pipeline before returning, so readers never
/// observe stale derived output.
#[derive(Debug)]
pub struct ViewState {
    records: Vec<BookingRecord>,
    filters: FilterConfig,
    sort: SortConfig,
    page: usize,
    page_size: usize,
    selected: Option<usize>,
    visible: Vec<usize>,
    aggregates: Aggregates,
}

/// One page of the bookings list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView<'a> {
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_items: usize,
    /// 1-based index of the first row shown, 0 when empty.
    pub from: usize,
    pub to: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub items: Vec<&'a BookingRecord>,
}

/// Display model for the booking detail overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetail {
    pub id: String,
    pub passenger_name: String,
    pub source_label: &'static str,
    pub source_color: &'static str,
    pub route: String,
    pub date: String,
    pub time: String,
    pub seats: u32,
    pub fare: String,
    pub status: String,
    pub payment_status: &'static str,
    pub notes: Option<String>,
}

impl BookingDetail {
    pub fn from_record(record: &BookingRecord) -> Self {
        Self {
            id: record.id.clone(),
            passenger_name: record.passenger_name.clone(),
            source_label: catalog::source_label(&record.source),
            source_color: catalog::source_color(&record.source),
            route: format!("{} → {}", record.origin, record.destination),
            date: format::format_date(&record.date),
            time: format::format_time(&record.time),
            seats: record.seats,
            fare: format::format_currency(record.fare),
            status: record.status.to_string(),
            payment_status: record.status.payment_label(),
            notes: record.notes(),
        }
    }
}

impl ViewState {
    pub fn new(records: Vec<BookingRecord>) -> Self {
        Self::with_page_size(records, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(records: Vec<BookingRecord>, page_size: usize) -> Self {
        let mut state = Self {
            records,
            filters: FilterConfig::default(),
            sort: SortConfig::default(),
            page: 1,
            page_size: page_size.max(1),
            selected: None,
            visible: Vec::new(),
            aggregates: Aggregates::default(),
        };
        state.recompute();
        state
    }

    fn recompute(&mut self) {
        self.visible = pipeline::visible_indices(&self.records, &self.filters, &self.sort);
        let visible: Vec<&BookingRecord> = self.visible.iter().map(|&i| &self.records[i]).collect();
        self.aggregates = pipeline::aggregate(&self.records, &visible, format::today_local());
        debug!(
            "Recomputed view: {} of {} bookings visible, {} pages",
            self.visible.len(),
            self.records.len(),
            self.total_pages()
        );
    }

    pub fn set_filter(&mut self, update: FilterUpdate) {
        info!("Filter changed: {:?}", update);
        self.filters.apply(update);
        self.recompute();
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        info!("Filters cleared");
        self.filters = FilterConfig::default();
        self.recompute();
        self.page = 1;
    }

    /// Column-header click: ascending first, then alternate.
    pub fn request_sort(&mut self, key: SortKey) {
        self.sort = self.sort.toggled(key);
        info!("Sort changed: {:?} {:?}", self.sort.key, self.sort.direction);
        self.recompute();
        self.page = 1;
    }

    pub fn select_for_detail(&mut self, id: &str) -> CoreResult<&BookingRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("booking {}", id)))?;
        self.selected = Some(index);
        Ok(&self.records[index])
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Moves the cursor, clamped to `[1, total_pages]`. Returns the page
    /// actually selected.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.total_pages());
        self.page
    }

    /// Swaps in a freshly seeded collection.
    pub fn replace_records(&mut self, records: Vec<BookingRecord>) {
        info!("Replacing {} bookings with {}", self.records.len(), records.len());
        self.records = records;
        self.selected = None;
        self.recompute();
        self.page = 1;
    }

    pub fn records(&self) -> &[BookingRecord] {
        &self.records
    }

    pub fn filters(&self) -> &FilterConfig {
        &self.filters
    }

    pub fn sort(&self) -> &SortConfig {
        &self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.visible.len().div_ceil(self.page_size).max(1)
    }

    pub fn visible(&self) -> Vec<&BookingRecord> {
        self.visible.iter().map(|&i| &self.records[i]).collect()
    }

    /// Aggregates for the visible set. The bookings-today count is taken
    /// against the local clock at call time.
    pub fn aggregates(&self) -> Aggregates {
        self.aggregates_at(format::today_local())
    }

    pub fn aggregates_at(&self, today: NaiveDate) -> Aggregates {
        Aggregates {
            bookings_today_count: pipeline::bookings_on(&self.records, today),
            ..self.aggregates.clone()
        }
    }

    pub fn page_view(&self) -> PageView<'_> {
        let total_items = self.visible.len();
        let start = (self.page - 1) * self.page_size;
        let items: Vec<&BookingRecord> = self
            .visible
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|&i| &self.records[i])
            .collect();
        let total_pages = self.total_pages();

        PageView {
            page: self.page,
            total_pages,
            page_size: self.page_size,
            total_items,
            from: if items.is_empty() { 0 } else { start + 1 },
            to: start + items.len(),
            has_previous: self.page > 1,
            has_next: self.page < total_pages,
            items,
        }
    }

    pub fn selected(&self) -> Option<&BookingRecord> {
        self.selected.map(|i| &self.records[i])
    }

    pub fn detail(&self) -> Option<BookingDetail> {
        self.selected().map(BookingDetail::from_record)
    }

    pub fn export_rows(&self) -> Vec<ExportRow> {
        export::to_export_rows(&self.visible())
    }

    /// The export action is disabled while nothing is visible.
    pub fn export_enabled(&self) -> bool {
        !self.visible.is_empty()
    }
}
