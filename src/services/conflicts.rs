//! Availability conflict checking.
//!
//! Pure functions that decide whether a candidate interval collides with a
//! reader's existing bookings. Only bookings in an active status occupy the
//! calendar; intervals that touch at an endpoint do not conflict.

use crate::api::{BookingId, ReaderId, ScheduledReading, TimeSlot};
use crate::models::time::Interval;

/// Check whether a candidate slot is free of conflicts.
///
/// Returns false iff any active booking of the slot's reader strictly
/// overlaps the slot interval. Bookings of other readers and bookings in
/// a terminal status are ignored.
pub fn slot_is_available(candidate: &TimeSlot, existing: &[ScheduledReading]) -> bool {
    interval_is_free(candidate.reader_id, candidate.interval(), existing, None)
}

/// Check whether an arbitrary interval is free for a reader.
///
/// `exclude` skips one booking id from consideration, which is how a
/// reschedule avoids colliding with the booking being moved.
pub fn interval_is_free(
    reader_id: ReaderId,
    interval: Interval,
    existing: &[ScheduledReading],
    exclude: Option<BookingId>,
) -> bool {
    existing
        .iter()
        .filter(|b| b.reader_id == reader_id && b.status.is_active())
        .filter(|b| match (b.id, exclude) {
            (Some(id), Some(skip)) => id != skip,
            _ => true,
        })
        .all(|b| !b.interval().overlaps(&interval))
}
