pub mod models;
pub mod catalog;
pub mod format;
pub mod pipeline;
pub mod view;
pub mod export;

pub use models::{BookingRecord, BookingStatus, FilterConfig, FilterUpdate, Source, SortConfig, SortDirection, SortKey, WindowId};
pub use pipeline::{derive, derive_at, Aggregates, Derived};
pub use view::{BookingDetail, PageView, ViewState, DEFAULT_PAGE_SIZE};
pub use export::{to_export_rows, ExportRow};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Export failed: {0}")]
    ExportError(#[from] csv::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
