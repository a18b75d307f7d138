use std::io::Write;

use serde::Serialize;

use crate::catalog;
use crate::format;
use crate::models::BookingRecord;
use crate::CoreResult;

pub const EXPORT_FILENAME: &str = "bus_bookings_export.csv";

/// One CSV line. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Booking ID")]
    pub booking_id: String,
    #[serde(rename = "Passenger Name")]
    pub passenger_name: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Origin")]
    pub origin: String,
    #[serde(rename = "Destination")]
    pub destination: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Seats")]
    pub seats: u32,
    #[serde(rename = "Fare")]
    pub fare: f64,
    #[serde(rename = "Status")]
    pub status: String,
}

impl From<&BookingRecord> for ExportRow {
    fn from(record: &BookingRecord) -> Self {
        Self {
            booking_id: record.id.clone(),
            passenger_name: record.passenger_name.clone(),
            source: catalog::source_label(&record.source).to_string(),
            origin: record.origin.clone(),
            destination: record.destination.clone(),
            date: format::format_date(&record.date),
            time: format::format_time(&record.time),
            seats: record.seats,
            fare: record.fare,
            status: record.status.to_string(),
        }
    }
}

/// Projects the visible (filtered and sorted) records into export rows.
pub fn to_export_rows(visible: &[&BookingRecord]) -> Vec<ExportRow> {
    visible.iter().map(|record| ExportRow::from(*record)).collect()
}

/// Writes `rows` as CSV with a header line. Writes nothing for zero rows.
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> CoreResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn to_csv_bytes(rows: &[ExportRow]) -> CoreResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(buf)
}
