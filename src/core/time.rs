//! Wall-clock helpers. The engine itself only ever compares `f64` seconds.

use chrono::Utc;

/// Current Unix time in fractional seconds.
pub fn now_seconds() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

/// True once `interval` seconds have passed since `last`.
pub fn interval_elapsed(last: f64, interval: f64, now: f64) -> bool {
    now >= last + interval
}
