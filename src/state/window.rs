//! Bounded reading window
//!
//! The chart's sliding window of glucose readings, newest-last. Capacity is
//! 24 hours at 10-minute spacing; the oldest readings are evicted when an
//! append overflows it.

use crate::state::global::Reading;

/// Maximum readings retained (24h at 10-minute spacing)
pub const WINDOW_CAP: usize = 144;

/// Ordered-by-time window of readings, capped at [`WINDOW_CAP`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadingWindow {
    readings: Vec<Reading>,
}

impl ReadingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a window from an ascending-by-time sequence, keeping only the
    /// newest [`WINDOW_CAP`] readings.
    pub fn from_readings(readings: Vec<Reading>) -> Self {
        let mut window = Self { readings };
        window.evict_overflow();
        window
    }

    /// Push one reading, evicting from the front on overflow
    pub fn append(&mut self, reading: Reading) {
        self.readings.push(reading);
        self.evict_overflow();
    }

    fn evict_overflow(&mut self) {
        if self.readings.len() > WINDOW_CAP {
            let excess = self.readings.len() - WINDOW_CAP;
            self.readings.drain(..excess);
        }
    }

    /// The most recent reading, if any
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.last()
    }

    pub fn as_slice(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::global::Trend;

    fn reading(timestamp: i64, value: i32) -> Reading {
        Reading {
            timestamp,
            value,
            trend: Trend::Stable,
        }
    }

    #[test]
    fn test_empty_window() {
        let window = ReadingWindow::new();
        assert!(window.is_empty());
        assert!(window.latest().is_none());
    }

    #[test]
    fn test_append_evicts_oldest_at_capacity() {
        let mut window =
            ReadingWindow::from_readings((0..WINDOW_CAP as i64).map(|i| reading(i, 100)).collect());
        assert_eq!(window.len(), WINDOW_CAP);
        let second = window.as_slice()[1].clone();

        window.append(reading(999, 115));

        assert_eq!(window.len(), WINDOW_CAP);
        assert_eq!(window.as_slice()[0], second);
        assert_eq!(window.latest(), Some(&reading(999, 115)));
    }

    #[test]
    fn test_from_readings_keeps_newest() {
        let window =
            ReadingWindow::from_readings((0..2 * WINDOW_CAP as i64).map(|i| reading(i, 100)).collect());
        assert_eq!(window.len(), WINDOW_CAP);
        assert_eq!(window.as_slice()[0].timestamp, WINDOW_CAP as i64);
        assert_eq!(window.latest().unwrap().timestamp, 2 * WINDOW_CAP as i64 - 1);
    }

    #[test]
    fn test_append_below_capacity_keeps_everything() {
        let mut window = ReadingWindow::new();
        window.append(reading(10, 90));
        window.append(reading(20, 100));
        assert_eq!(window.len(), 2);
        assert_eq!(window.latest().unwrap().value, 100);
    }
}
