//! Reader availability management.
//!
//! Availability is stored as weekly templates, one entry per contiguous
//! window on a given weekday. Writing a schedule replaces every previous
//! entry for that reader.

use log::info;

use super::error::{SchedulingError, SchedulingResult};
use crate::api::{ReaderAvailability, ReaderId, ReadingPackage};
use crate::db::FullRepository;

/// Replace a reader's weekly availability schedule.
///
/// Every entry is validated before anything is written: windows must have
/// `start_time < end_time`, a weekday in `0..=6`, at least one reading
/// type, and entries on the same weekday must not overlap each other.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `reader_id` - Reader whose schedule is replaced
/// * `entries` - The new weekly template, replacing all previous entries
///
/// # Returns
/// * `Ok(Vec<ReaderAvailability>)` - The stored entries with assigned ids
/// * `Err(SchedulingError::Validation)` - If any entry is malformed
pub async fn set_reader_availability<R: FullRepository + ?Sized>(
    repo: &R,
    reader_id: ReaderId,
    entries: Vec<ReaderAvailability>,
) -> SchedulingResult<Vec<ReaderAvailability>> {
    info!(
        "Service layer: replacing availability for reader {} ({} entries)",
        reader_id,
        entries.len()
    );

    for entry in &entries {
        validate_entry(entry)?;
    }
    validate_no_same_day_overlap(&entries)?;

    let stored = repo.replace_availability(reader_id, entries).await?;
    Ok(stored)
}

/// Get a reader's weekly availability template.
pub async fn list_reader_availability<R: FullRepository + ?Sized>(
    repo: &R,
    reader_id: ReaderId,
) -> SchedulingResult<Vec<ReaderAvailability>> {
    info!("Service layer: listing availability for reader {}", reader_id);
    let entries = repo.fetch_availability(reader_id).await?;
    Ok(entries)
}

/// Get the packages a reader offers.
pub async fn list_reader_packages<R: FullRepository + ?Sized>(
    repo: &R,
    reader_id: ReaderId,
) -> SchedulingResult<Vec<ReadingPackage>> {
    info!("Service layer: listing packages for reader {}", reader_id);
    let packages = repo.fetch_packages(reader_id).await?;
    Ok(packages)
}

fn validate_entry(entry: &ReaderAvailability) -> SchedulingResult<()> {
    if entry.day_of_week > 6 {
        return Err(SchedulingError::Validation(format!(
            "Day of week must be 0..=6, got {}",
            entry.day_of_week
        )));
    }
    if entry.start_time >= entry.end_time {
        return Err(SchedulingError::Validation(format!(
            "Availability window must start before it ends, got {} .. {}",
            entry.start_time, entry.end_time
        )));
    }
    if entry.reading_types.is_empty() {
        return Err(SchedulingError::Validation(
            "Availability entry must offer at least one reading type".to_string(),
        ));
    }
    Ok(())
}

fn validate_no_same_day_overlap(entries: &[ReaderAvailability]) -> SchedulingResult<()> {
    for (i, a) in entries.iter().enumerate() {
        for b in entries.iter().skip(i + 1) {
            if a.day_of_week != b.day_of_week {
                continue;
            }
            // Same-day windows may touch but not overlap.
            if a.start_time < b.end_time && b.start_time < a.end_time {
                return Err(SchedulingError::Validation(format!(
                    "Availability windows overlap on day {}: {} .. {} and {} .. {}",
                    a.day_of_week, a.start_time, a.end_time, b.start_time, b.end_time
                )));
            }
        }
    }
    Ok(())
}
