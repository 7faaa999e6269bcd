//! Recurring booking expansion.
//!
//! A recurring series is anchored on one template booking carrying a
//! [`RecurringPattern`]. Expansion materializes the rest of the series as
//! ordinary bookings: each occurrence after the anchor becomes its own
//! `book` call, and an occurrence that loses its window is skipped and
//! recorded without aborting the rest.

use chrono::{Datelike, Duration, NaiveDate};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::bookings::book_reading;
use super::error::{SchedulingError, SchedulingResult};
use crate::api::{BookingInput, RecurrenceFrequency, RecurringPattern, ScheduledReading};
use crate::db::FullRepository;
use crate::external::{AuthTokenProvider, PaymentAuthorizer};
use crate::models::time::{resolve_utc, weekday_index};

/// Series length cap applied when a pattern sets neither an end date nor a
/// maximum occurrence count. Counts the anchor itself.
pub const MAX_RECURRENCE_OCCURRENCES: u32 = 52;

/// Outcome of one expansion call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpansionReport {
    /// Occurrences booked, in series order.
    pub booked: Vec<ScheduledReading>,
    /// Occurrences that lost their window, with the conflict reason.
    pub skipped: Vec<SkippedOccurrence>,
}

/// One occurrence the expander could not book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedOccurrence {
    pub date: NaiveDate,
    pub reason: String,
}

/// The dates of a recurring series, anchor first.
///
/// Weekly advances 7 days, biweekly 14; monthly lands on the anchored
/// day-of-month, clamped to the last valid day of shorter months without
/// the clamp carrying over (January 31st yields February 29th in a leap
/// year and March 31st, not March 29th).
///
/// The series ends at the first of the pattern's end date or maximum
/// occurrence count; with neither set it is capped at
/// [`MAX_RECURRENCE_OCCURRENCES`].
///
/// # Arguments
/// * `anchor` - Date of the template booking, always the first element
/// * `pattern` - Recurrence rule; its day anchors must match `anchor`
///
/// # Returns
/// * `Ok(Vec<NaiveDate>)` - Series dates in order, starting at `anchor`
/// * `Err(SchedulingError::Validation)` - If the pattern is malformed or
///   anchored to a different day than the booking
pub fn occurrence_dates(
    anchor: NaiveDate,
    pattern: &RecurringPattern,
) -> SchedulingResult<Vec<NaiveDate>> {
    validate_pattern(anchor, pattern)?;

    let cap = match (pattern.max_occurrences, pattern.end_date) {
        (Some(max), _) => max,
        (None, None) => MAX_RECURRENCE_OCCURRENCES,
        (None, Some(_)) => u32::MAX,
    };

    let mut dates = Vec::new();
    for n in 0..cap {
        let Some(date) = nth_occurrence(anchor, pattern, n) else {
            break;
        };
        if pattern.end_date.map_or(false, |end| date > end) {
            break;
        }
        dates.push(date);
    }
    Ok(dates)
}

/// Book every occurrence of a recurring series after its anchor.
///
/// The template booking is the anchor and is expected to be persisted
/// already; expansion starts at the second occurrence. Instances carry the
/// template's client, reader, type, package, price, and time zone, with no
/// recurrence pattern of their own.
///
/// An occurrence whose window is taken is recorded in the report and the
/// expansion continues; any other failure aborts the call.
pub async fn expand_recurring_booking<R: FullRepository + ?Sized>(
    repo: &R,
    auth: &dyn AuthTokenProvider,
    payments: &dyn PaymentAuthorizer,
    template: &ScheduledReading,
) -> SchedulingResult<ExpansionReport> {
    let pattern = template.recurrence.as_ref().ok_or_else(|| {
        SchedulingError::Validation(format!(
            "Reading {} has no recurrence pattern to expand",
            template.id.map(|id| id.to_string()).unwrap_or_default()
        ))
    })?;

    let anchor = template.scheduled_at.date_naive();
    let time_of_day = template.scheduled_at.time();
    let dates = occurrence_dates(anchor, pattern)?;

    info!(
        "Service layer: expanding {} series anchored {} into {} further occurrences",
        pattern.frequency,
        anchor,
        dates.len().saturating_sub(1)
    );

    let mut report = ExpansionReport::default();
    // The first date is the anchor, already persisted as the template.
    for date in dates.into_iter().skip(1) {
        let input = BookingInput {
            client_id: template.client_id,
            reader_id: template.reader_id,
            package_id: template.package_id,
            reading_type: template.reading_type,
            scheduled_at: resolve_utc(date, time_of_day),
            duration_minutes: template.duration_minutes,
            price: template.price,
            time_zone: template.time_zone.clone(),
            special_requests: template.special_requests.clone(),
            recurrence: None,
        };
        match book_reading(repo, auth, payments, input).await {
            Ok(stored) => report.booked.push(stored),
            Err(SchedulingError::SlotUnavailable(reason)) => {
                warn!(
                    "Service layer: skipping occurrence on {}: {}",
                    date, reason
                );
                report.skipped.push(SkippedOccurrence { date, reason });
            }
            Err(other) => return Err(other),
        }
    }
    Ok(report)
}

fn validate_pattern(anchor: NaiveDate, pattern: &RecurringPattern) -> SchedulingResult<()> {
    if pattern.max_occurrences == Some(0) {
        return Err(SchedulingError::Validation(
            "Recurrence must allow at least one occurrence".to_string(),
        ));
    }
    if let Some(day) = pattern.day_of_week {
        if day > 6 {
            return Err(SchedulingError::Validation(format!(
                "Day of week must be 0..=6, got {}",
                day
            )));
        }
        if weekday_index(anchor) != day {
            return Err(SchedulingError::Validation(format!(
                "Pattern is anchored to weekday {} but the booking falls on weekday {}",
                day,
                weekday_index(anchor)
            )));
        }
    }
    if let Some(day) = pattern.day_of_month {
        if !(1..=31).contains(&day) {
            return Err(SchedulingError::Validation(format!(
                "Day of month must be 1..=31, got {}",
                day
            )));
        }
        let clamped = day.min(days_in_month(anchor.year(), anchor.month()));
        if clamped != anchor.day() {
            return Err(SchedulingError::Validation(format!(
                "Pattern is anchored to day {} of the month but the booking falls on day {}",
                day,
                anchor.day()
            )));
        }
    }
    Ok(())
}

/// The n-th date of the series, 0 being the anchor.
fn nth_occurrence(anchor: NaiveDate, pattern: &RecurringPattern, n: u32) -> Option<NaiveDate> {
    match pattern.frequency {
        RecurrenceFrequency::Weekly => {
            anchor.checked_add_signed(Duration::days(7 * i64::from(n)))
        }
        RecurrenceFrequency::Biweekly => {
            anchor.checked_add_signed(Duration::days(14 * i64::from(n)))
        }
        RecurrenceFrequency::Monthly => {
            // Clamp against the target month from the anchor day each time,
            // so a February clamp does not shorten the rest of the series.
            let target_day = pattern.day_of_month.unwrap_or_else(|| anchor.day());
            let months =
                i64::from(anchor.year()) * 12 + i64::from(anchor.month0()) + i64::from(n);
            let year = i32::try_from(months.div_euclid(12)).ok()?;
            let month = months.rem_euclid(12) as u32 + 1;
            NaiveDate::from_ymd_opt(year, month, target_day.min(days_in_month(year, month)))
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
                29
            } else {
                28
            }
        }
    }
}
