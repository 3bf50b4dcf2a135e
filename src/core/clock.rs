//! Wall-clock source. Everything else in the engine takes `now` as an
//! argument, so this is the only place real time is read.

/// Current Unix time in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
