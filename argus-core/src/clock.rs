//! Wall-clock abstraction and the fixed RFC-1123 date form used for signing.
//!
//! The `Date` header is part of the signed canonical string, so both sides
//! must render it identically: English weekday/month abbreviations, always
//! `GMT`, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.

use chrono::{DateTime, ParseError, Utc};

/// The exact textual form required by the signing scheme.
const RFC_1123_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Render an instant in the fixed RFC-1123 form.
pub fn rfc_1123_date(instant: DateTime<Utc>) -> String {
    instant.format(RFC_1123_FORMAT).to_string()
}

/// Parse an RFC-1123 date header back into an instant.
///
/// RFC 1123 dates are the fixed-offset subset of RFC 2822; chrono's RFC 2822
/// parser accepts the obsolete `GMT` zone name.
pub fn parse_rfc_1123_date(value: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc2822(value).map(|dt| dt.with_timezone(&Utc))
}

/// Injectable wall clock.
///
/// Production code uses [`SystemClock`]; tests use [`FixedClock`] to drive
/// date-window checks and processing deadlines deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to an explicit instant, advanceable by hand.
#[derive(Debug)]
pub struct FixedClock {
    now: std::sync::Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = *now + by;
    }

    /// Pin the clock to a new instant.
    pub fn set(&self, to: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = to;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
