use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use busdesk_core::BookingRecord;
use tracing::{info, warn};

use crate::app_config::{SeedConfig, SeedKind};
use crate::seed;
use crate::{StoreError, StoreResult};

/// Producer of the initial booking collection.
#[async_trait]
pub trait BookingFeed: Send + Sync {
    async fn fetch_bookings(&self) -> StoreResult<Vec<BookingRecord>>;
}

/// Generates random bookings around the current date.
#[derive(Debug, Clone)]
pub struct MockFeed {
    pub count: usize,
    pub rng_seed: Option<u64>,
}

#[async_trait]
impl BookingFeed for MockFeed {
    async fn fetch_bookings(&self) -> StoreResult<Vec<BookingRecord>> {
        let bookings = seed::generate_mock_bookings(self.count, self.rng_seed);
        info!("Generated {} mock bookings", bookings.len());
        Ok(bookings)
    }
}

/// Reads a JSON array of bookings from disk. Entries that do not decode or
/// that break the booking invariants are skipped.
#[derive(Debug, Clone)]
pub struct JsonFileFeed {
    pub path: PathBuf,
}

#[async_trait]
impl BookingFeed for JsonFileFeed {
    async fn fetch_bookings(&self) -> StoreResult<Vec<BookingRecord>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let entries: Vec<serde_json::Value> = serde_json::from_str(&contents)?;
        let total = entries.len();

        let bookings: Vec<BookingRecord> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let record: BookingRecord = match serde_json::from_value(entry) {
                    Ok(record) => record,
                    Err(e) => {
                        warn!("Skipping entry {} in {}: {}", index, self.path.display(), e);
                        return None;
                    }
                };
                match record.validate() {
                    Ok(()) => Some(record),
                    Err(e) => {
                        warn!("Skipping booking from {}: {}", self.path.display(), e);
                        None
                    }
                }
            })
            .collect();

        info!("Loaded {} of {} bookings from {}", bookings.len(), total, self.path.display());
        Ok(bookings)
    }
}

pub fn feed_from_config(config: &SeedConfig) -> StoreResult<Arc<dyn BookingFeed>> {
    match config.kind {
        SeedKind::Mock => Ok(Arc::new(MockFeed {
            count: config.count,
            rng_seed: config.rng_seed,
        })),
        SeedKind::File => {
            let path = config
                .path
                .as_ref()
                .ok_or_else(|| StoreError::Config("seed.path is required when seed.kind = \"file\"".to_string()))?;
            Ok(Arc::new(JsonFileFeed { path: PathBuf::from(path) }))
        }
    }
}
