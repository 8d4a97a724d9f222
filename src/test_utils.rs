//! Useful utilities for testing.

use crate::clock::{Clock, DateTime, Utc};
use std::fs;
use std::path::Path;

/// Loads test fixture data from a file in `tests/data`.
pub fn load_data(file: &str) -> String {
    let path = Path::new("tests").join("data").join(format!("{file}.json"));
    fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("could not load test data from {}", path.display()))
}

/// A clock frozen at a single moment in time.
#[derive(Debug)]
pub struct FrozenClock {
    datetime: DateTime<Utc>,
}

impl FrozenClock {
    /// Creates a clock frozen at the given moment.
    #[allow(dead_code)]
    pub fn new(datetime: DateTime<Utc>) -> Self {
        Self { datetime }
    }
}

impl Default for FrozenClock {
    /// A clock frozen at noon UTC on 1 June 2021.
    fn default() -> Self {
        let datetime = DateTime::parse_from_rfc3339("2021-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Self { datetime }
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.datetime
    }
}
