//! Mock booking generator for local demonstration.

use busdesk_core::catalog;
use busdesk_core::models::{BookingRecord, BookingStatus, NewBooking, Source};
use chrono::{Duration, Local, NaiveDateTime};
use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};

pub const ORIGINS: [&str; 5] = ["Delhi", "Mumbai", "Bangalore", "Chennai", "Pune"];
pub const DESTINATIONS: [&str; 5] = ["Jaipur", "Hyderabad", "Kolkata", "Goa", "Ahmedabad"];

const SOURCES: [Source; 4] = [Source::Mmt, Source::Goibibo, Source::MyBus, Source::Personal];
const STATUSES: [BookingStatus; 3] = [BookingStatus::Confirmed, BookingStatus::Cancelled, BookingStatus::Pending];

/// Bookings are spread over this many days before `now`.
const HISTORY_DAYS: i64 = 30;

/// Generates `count` bookings relative to the local clock. A `rng_seed`
/// makes the output reproducible for a given day.
pub fn generate_mock_bookings(count: usize, rng_seed: Option<u64>) -> Vec<BookingRecord> {
    let mut rng = match rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate_bookings(&mut rng, count, Local::now().naive_local())
}

pub fn generate_bookings<R: Rng + ?Sized>(rng: &mut R, count: usize, now: NaiveDateTime) -> Vec<BookingRecord> {
    (0..count).map(|i| generate_one(rng, i, now)).collect()
}

fn generate_one<R: Rng + ?Sized>(rng: &mut R, index: usize, now: NaiveDateTime) -> BookingRecord {
    let back = Duration::seconds(rng.gen_range(0..HISTORY_DAYS * 24 * 60 * 60));
    let day = (now - back).date();
    let hour = rng.gen_range(0..24);
    let minute = rng.gen_range(0..60);
    let departs_at = day.and_hms_opt(hour, minute, 0).unwrap_or_else(|| day.and_time(Default::default()));

    let source = SOURCES.choose(rng).cloned().unwrap_or(Source::Mmt);
    let origin = *ORIGINS.choose(rng).unwrap_or(&ORIGINS[0]);
    let destination = DESTINATIONS
        .iter()
        .copied()
        .filter(|d| *d != origin)
        .choose(rng)
        .unwrap_or(DESTINATIONS[0]);
    let seats = rng.gen_range(1..=5);
    let seat_rate = rng.gen_range(500..=2500) as f64;
    let status = *STATUSES.choose(rng).unwrap_or(&BookingStatus::Pending);

    BookingRecord::new(NewBooking {
        id: format!("BKG-{}", 10000 + index),
        passenger_name: format!("Traveller {}", index + 1),
        notes: Some(format!(
            "Trip from {} to {} booked via {}.",
            origin,
            destination,
            catalog::source_label(&source)
        )),
        source,
        origin: origin.to_string(),
        destination: destination.to_string(),
        departs_at,
        seats,
        seat_rate,
        status,
    })
}
