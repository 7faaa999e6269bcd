//! Shared helpers for integration tests.
//!
//! Each test binary compiles this module separately, so not every binary
//! uses every helper.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use arcana_rust::api::{
    BookingInput, ClientId, PackageId, ReaderAvailability, ReaderId, ReaderRateCard,
    ReadingPackage, ReadingRate, ReadingType,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// ==================== Domain Builders ====================

pub fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

pub fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dom).expect("valid date")
}

pub fn at(year: i32, month: u32, dom: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    day(year, month, dom)
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
        .and_utc()
}

pub fn price(text: &str) -> Decimal {
    text.parse().expect("valid decimal")
}

/// Availability window offering chat and video, no breaks.
pub fn weekday_window(
    reader_id: ReaderId,
    day_of_week: u8,
    start: NaiveTime,
    end: NaiveTime,
) -> ReaderAvailability {
    ReaderAvailability {
        id: None,
        reader_id,
        day_of_week,
        start_time: start,
        end_time: end,
        reading_types: vec![ReadingType::Chat, ReadingType::Video],
        time_zone: "UTC".to_string(),
        max_concurrent_sessions: None,
        break_minutes: None,
    }
}

pub fn chat_package(
    id: i64,
    reader_id: ReaderId,
    duration_minutes: u32,
    package_price: &str,
) -> ReadingPackage {
    ReadingPackage {
        id: PackageId::new(id),
        reader_id,
        name: format!("Chat {} min", duration_minutes),
        duration_minutes,
        price: price(package_price),
        original_price: None,
        reading_type: ReadingType::Chat,
        features: vec!["Follow-up summary".to_string()],
        available: true,
    }
}

/// Rate card charging the same per-minute rate for chat and video.
pub fn flat_rate_card(reader_id: ReaderId, per_minute: &str) -> ReaderRateCard {
    ReaderRateCard {
        reader_id,
        rates: vec![
            ReadingRate {
                reading_type: ReadingType::Chat,
                rate: price(per_minute),
            },
            ReadingRate {
                reading_type: ReadingType::Video,
                rate: price(per_minute),
            },
        ],
    }
}

pub fn chat_booking_input(
    client_id: i64,
    reader_id: ReaderId,
    scheduled_at: DateTime<Utc>,
    duration_minutes: u32,
    booking_price: &str,
) -> BookingInput {
    BookingInput {
        client_id: ClientId::new(client_id),
        reader_id,
        package_id: None,
        reading_type: ReadingType::Chat,
        scheduled_at,
        duration_minutes,
        price: price(booking_price),
        time_zone: "UTC".to_string(),
        special_requests: None,
        recurrence: None,
    }
}
