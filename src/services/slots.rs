//! Time slot generation.
//!
//! Expands a reader's weekly availability template into concrete dated
//! slots over a requested window. Slots are ephemeral: they are recomputed
//! on every query and never stored, so identical inputs against identical
//! bookings always yield identical output.

use chrono::{Duration, NaiveDate};
use log::info;

use super::conflicts::slot_is_available;
use super::error::{SchedulingError, SchedulingResult};
use super::pricing::effective_price;
use crate::api::{
    ReaderAvailability, ReaderId, ReaderRateCard, ReadingPackage, ReadingType, ScheduledReading,
    TimeSlot,
};
use crate::db::FullRepository;
use crate::models::time::weekday_index;

/// Generate the bookable slots for a reader over a date range.
///
/// For each day in `[start_date, end_date]` the reader's availability
/// entries matching that weekday and offering `reading_type` are
/// partitioned into back-to-back sub-intervals of `duration_minutes`,
/// separated by the entry's break minutes; a trailing remainder shorter
/// than the duration is discarded. Slots whose interval overlaps an
/// active booking are filtered out.
///
/// Each slot is priced from a matching package override when one exists
/// (same reading type and duration, currently available), otherwise from
/// the reader's per-minute rate. Windows with neither produce no slots.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `reader_id` - Reader whose calendar is queried
/// * `reading_type` - Requested delivery channel
/// * `start_date` - First day of the window, inclusive
/// * `end_date` - Last day of the window, inclusive
/// * `duration_minutes` - Desired session length
///
/// # Returns
/// * `Ok(Vec<TimeSlot>)` - Free slots ordered by (date, start time);
///   empty for an unknown reader
/// * `Err(SchedulingError::InvalidRange)` - If `end_date < start_date`
/// * `Err(SchedulingError::Validation)` - If `duration_minutes` is zero
pub async fn get_available_time_slots<R: FullRepository + ?Sized>(
    repo: &R,
    reader_id: ReaderId,
    reading_type: ReadingType,
    start_date: NaiveDate,
    end_date: NaiveDate,
    duration_minutes: u32,
) -> SchedulingResult<Vec<TimeSlot>> {
    if end_date < start_date {
        return Err(SchedulingError::InvalidRange(format!(
            "Slot window ends before it starts: {} .. {}",
            start_date, end_date
        )));
    }
    if duration_minutes == 0 {
        return Err(SchedulingError::Validation(
            "Slot duration must be at least one minute".to_string(),
        ));
    }

    info!(
        "Service layer: generating {}-minute {} slots for reader {} over {} .. {}",
        duration_minutes, reading_type, reader_id, start_date, end_date
    );

    let entries = repo.fetch_availability(reader_id).await?;
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let packages = repo.fetch_packages(reader_id).await?;
    let rate_card = repo.fetch_rate_card(reader_id).await?;
    let bookings = repo.fetch_active_bookings(reader_id).await?;

    let package_override = packages.iter().find(|p| {
        p.available && p.reading_type == reading_type && p.duration_minutes == duration_minutes
    });

    let mut slots = Vec::new();
    for date in start_date.iter_days().take_while(|d| *d <= end_date) {
        let weekday = weekday_index(date);
        for entry in entries
            .iter()
            .filter(|e| e.day_of_week == weekday && e.reading_types.contains(&reading_type))
        {
            expand_window(
                entry,
                date,
                reading_type,
                duration_minutes,
                package_override,
                rate_card.as_ref(),
                &bookings,
                &mut slots,
            );
        }
    }

    slots.sort_by_key(|s| (s.date, s.start_time));
    slots.dedup_by_key(|s| (s.date, s.start_time));
    Ok(slots)
}

/// Partition one availability window on one date into priced free slots.
#[allow(clippy::too_many_arguments)]
fn expand_window(
    entry: &ReaderAvailability,
    date: NaiveDate,
    reading_type: ReadingType,
    duration_minutes: u32,
    package: Option<&ReadingPackage>,
    rate_card: Option<&ReaderRateCard>,
    bookings: &[ScheduledReading],
    slots: &mut Vec<TimeSlot>,
) {
    let Some(price) = effective_price(package, rate_card, reading_type, duration_minutes) else {
        return;
    };

    let slot_len = Duration::minutes(i64::from(duration_minutes));
    let step = slot_len + Duration::minutes(i64::from(entry.break_minutes.unwrap_or(0)));

    // Walk on full date-times so a window reaching midnight cannot wrap.
    let window_end = date.and_time(entry.end_time);
    let mut cursor = date.and_time(entry.start_time);
    while cursor + slot_len <= window_end {
        let slot_end = cursor + slot_len;
        let slot = TimeSlot {
            reader_id: entry.reader_id,
            date,
            start_time: cursor.time(),
            end_time: slot_end.time(),
            duration_minutes,
            reading_type,
            price: price.to_decimal(),
            available: true,
        };
        if slot_is_available(&slot, bookings) {
            slots.push(slot);
        }
        cursor += step;
    }
}
