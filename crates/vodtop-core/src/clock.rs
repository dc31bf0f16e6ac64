//! Wall-clock helpers.
//!
//! Session math works on fractional epoch seconds so that connect moments,
//! elapsed times and ledger totals share one numeric representation.

use chrono::{DateTime, Utc};

/// Converts a UTC instant to fractional seconds since the Unix epoch.
#[must_use]
pub fn epoch_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

/// Current wall-clock time as fractional epoch seconds.
#[must_use]
pub fn now_seconds() -> f64 {
    epoch_seconds(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_epoch_seconds_keeps_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_250).unwrap();
        assert!((epoch_seconds(at) - 1_700_000_000.25).abs() < 1e-6);
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(now_seconds() > 1_577_836_800.0);
    }
}
