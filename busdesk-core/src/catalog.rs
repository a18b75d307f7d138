use serde::Serialize;

use crate::models::{Source, WindowId};

/// Label used for sources the catalog does not know.
pub const UNKNOWN_SOURCE_LABEL: &str = "Unknown";
/// Neutral gray for sources the catalog does not know.
pub const UNKNOWN_SOURCE_COLOR: &str = "#6B7280";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SourceOption {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

/// Booking channels, in filter-bar order.
pub static SOURCES: [SourceOption; 4] = [
    SourceOption { id: "mmt", name: "MakeMyTrip", color: "#10B981" },
    SourceOption { id: "goibibo", name: "Goibibo", color: "#F59E0B" },
    SourceOption { id: "mybus", name: "MyBus", color: "#0EA5E9" },
    SourceOption { id: "personal", name: "Personal Booking", color: "#6366F1" },
];

pub fn source_label(source: &Source) -> &'static str {
    lookup_source(source).map(|s| s.name).unwrap_or(UNKNOWN_SOURCE_LABEL)
}

pub fn source_color(source: &Source) -> &'static str {
    lookup_source(source).map(|s| s.color).unwrap_or(UNKNOWN_SOURCE_COLOR)
}

fn lookup_source(source: &Source) -> Option<&'static SourceOption> {
    SOURCES.iter().find(|option| option.id == source.key())
}

/// Hour-of-day range. `end` is exclusive; when `wraps` is set the range
/// crosses midnight.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub id: WindowId,
    pub name: &'static str,
    pub label: &'static str,
    pub start_hour: u8,
    pub end_hour: u8,
    pub wraps: bool,
}

impl TimeWindow {
    const fn new(id: WindowId, name: &'static str, label: &'static str, start_hour: u8, end_hour: u8) -> Self {
        Self {
            id,
            name,
            label,
            start_hour,
            end_hour,
            wraps: start_hour > end_hour,
        }
    }

    pub fn contains(&self, hour: u8) -> bool {
        if self.wraps {
            hour >= self.start_hour || hour < self.end_hour
        } else {
            hour >= self.start_hour && hour < self.end_hour
        }
    }
}

pub static TIME_WINDOWS: [TimeWindow; 4] = [
    TimeWindow::new(WindowId::Morning, "Morning (5am - 12pm)", "Morning", 5, 12),
    TimeWindow::new(WindowId::Afternoon, "Afternoon (12pm - 5pm)", "Afternoon", 12, 17),
    TimeWindow::new(WindowId::Evening, "Evening (5pm - 9pm)", "Evening", 17, 21),
    TimeWindow::new(WindowId::Night, "Night (9pm - 5am)", "Night", 21, 5),
];

pub fn time_window(id: WindowId) -> &'static TimeWindow {
    match id {
        WindowId::Morning => &TIME_WINDOWS[0],
        WindowId::Afternoon => &TIME_WINDOWS[1],
        WindowId::Evening => &TIME_WINDOWS[2],
        WindowId::Night => &TIME_WINDOWS[3],
    }
}

/// First named window containing `hour`, if any.
pub fn window_for_hour(hour: u8) -> Option<&'static TimeWindow> {
    TIME_WINDOWS.iter().find(|window| window.contains(hour))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_window_wraps() {
        let night = time_window(WindowId::Night);
        assert!(night.wraps);
        assert!(night.contains(23));
        assert!(night.contains(0));
        assert!(night.contains(4));
        assert!(!night.contains(5));
        assert!(!night.contains(12));
    }

    #[test]
    fn test_day_windows_are_half_open() {
        let morning = time_window(WindowId::Morning);
        assert!(!morning.wraps);
        assert!(morning.contains(5));
        assert!(morning.contains(11));
        assert!(!morning.contains(12));
        assert_eq!(window_for_hour(12).map(|w| w.id), Some(WindowId::Afternoon));
        assert_eq!(window_for_hour(20).map(|w| w.id), Some(WindowId::Evening));
    }

    #[test]
    fn test_source_lookup_fallback() {
        assert_eq!(source_label(&Source::Mmt), "MakeMyTrip");
        assert_eq!(source_color(&Source::MyBus), "#0EA5E9");
        let unknown = Source::Other("redbus".to_string());
        assert_eq!(source_label(&unknown), UNKNOWN_SOURCE_LABEL);
        assert_eq!(source_color(&unknown), UNKNOWN_SOURCE_COLOR);
    }
}
