use std::fmt;

use chrono::{Local, NaiveDateTime};

/// Local wall-clock source. Timestamps are captured on the device, never over the network.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant. Used by tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// `Jan 18, 2023, 16:23`
pub fn format_check_time(at: NaiveDateTime) -> String {
    at.format("%b %-d, %Y, %H:%M").to_string()
}

/// `Aug 5 2023`
pub fn format_upload_date(at: NaiveDateTime) -> String {
    at.format("%b %-d %Y").to_string()
}
