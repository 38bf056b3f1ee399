//! Timestamp handling
//!
//! All instants are UTC and cross the operation boundary as RFC-3339 text.
//! Parsing happens before any ledger write so that a malformed date can never
//! leave a half-applied record behind.

use crate::errors::{Result, VeritasError};
use chrono::{DateTime, SecondsFormat, Utc};

/// Instant stored on records (expiry dates, signing times)
pub type Timestamp = DateTime<Utc>;

/// Parse an RFC-3339 instant, normalising any offset to UTC
pub fn parse_instant(input: &str) -> Result<Timestamp> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| VeritasError::invalid_date(input, e.to_string()))
}

/// Parse a batch of instants, failing on the first bad entry
pub fn parse_instants<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<Timestamp>> {
    inputs.iter().map(|s| parse_instant(s.as_ref())).collect()
}

/// Render an instant in the canonical text form
pub fn format_instant(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
