//! Timestamp value generators.

use chrono::DateTime;
use forge_core::generator::parse_timestamp;
use forge_core::Value;
use rand::Rng;

/// Generate a random timestamp in the given range, with second precision.
///
/// The start and end should be RFC 3339 timestamps or `YYYY-MM-DD` dates.
/// Unparsable bounds yield `Null`; configurations are validated before
/// they reach this point.
pub fn generate_timestamp_range<R: Rng>(rng: &mut R, start: &str, end: &str) -> Value {
    match (parse_timestamp(start), parse_timestamp(end)) {
        (Some(start), Some(end)) => {
            let start_ts = start.timestamp();
            let end_ts = end.timestamp();

            if start_ts >= end_ts {
                Value::DateTime(start)
            } else {
                let random_ts = rng.random_range(start_ts..=end_ts);
                let dt = DateTime::from_timestamp(random_ts, 0).unwrap_or(start);
                Value::DateTime(dt)
            }
        }
        (Some(dt), None) | (None, Some(dt)) => Value::DateTime(dt),
        (None, None) => Value::Null,
    }
}
