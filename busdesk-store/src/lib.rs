pub mod app_config;
pub mod seed;
pub mod feed;

pub use feed::{feed_from_config, BookingFeed, JsonFileFeed, MockFeed};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode seed data: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid seed configuration: {0}")]
    Config(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
