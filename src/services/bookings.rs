//! Booking lifecycle management.
//!
//! Creation and state transitions for scheduled readings. The allowed
//! transitions are `pending -> confirmed -> in_progress -> completed`,
//! with `pending|confirmed -> cancelled` and `pending|confirmed ->
//! rescheduled` as the alternate exits. Everything else is rejected.

use chrono::{DateTime, Utc};
use log::{info, warn};

use super::conflicts::interval_is_free;
use super::error::{SchedulingError, SchedulingResult};
use crate::api::{
    BookingId, BookingInput, ClientId, ReaderId, ReadingStatus, ScheduledReading, UserRole,
};
use crate::db::repository::RepositoryError;
use crate::db::FullRepository;
use crate::external::{AuthTokenProvider, PaymentAuthorizer, PaymentOutcome};
use crate::models::money::Money;
use crate::models::time::Interval;

// ==================== Booking Creation ====================

/// Book a reading.
///
/// The requested window is re-checked against the reader's active bookings
/// at call time, and the storage layer's conflict guard is the final
/// arbiter: if a concurrent booking wins the window between the check and
/// the insert, this call fails `SlotUnavailable` and nothing is persisted.
///
/// When `input.package_id` is set the package's price and duration are
/// authoritative and the input's values are ignored. Paid bookings are
/// authorized before insertion; a decline surfaces as
/// `SchedulingError::Payment` and nothing is persisted.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `auth` - Source of the bearer token for the payment call
/// * `payments` - Payment authorizer consulted for any positive price
/// * `input` - Booking parameters
///
/// # Returns
/// * `Ok(ScheduledReading)` - The stored `pending` booking with its id and
///   payment reference
/// * `Err(SchedulingError::SlotUnavailable)` - If the window is taken
/// * `Err(SchedulingError::Payment)` - If authorization was declined
pub async fn book_reading<R: FullRepository + ?Sized>(
    repo: &R,
    auth: &dyn AuthTokenProvider,
    payments: &dyn PaymentAuthorizer,
    input: BookingInput,
) -> SchedulingResult<ScheduledReading> {
    info!(
        "Service layer: booking {} reading for client {} with reader {} at {}",
        input.reading_type, input.client_id, input.reader_id, input.scheduled_at
    );

    let package = match input.package_id {
        Some(package_id) => {
            let package = match repo.fetch_package(package_id).await {
                Ok(package) => package,
                Err(RepositoryError::NotFound(msg)) => return Err(SchedulingError::NotFound(msg)),
                Err(other) => return Err(other.into()),
            };
            if package.reader_id != input.reader_id {
                return Err(SchedulingError::Validation(format!(
                    "Package {} belongs to reader {}, not reader {}",
                    package_id, package.reader_id, input.reader_id
                )));
            }
            if !package.available {
                return Err(SchedulingError::Validation(format!(
                    "Package {} is not currently available",
                    package_id
                )));
            }
            if package.reading_type != input.reading_type {
                return Err(SchedulingError::Validation(format!(
                    "Package {} is for {} readings, not {}",
                    package_id, package.reading_type, input.reading_type
                )));
            }
            Some(package)
        }
        None => None,
    };

    // Package price and duration override whatever the client sent.
    let (price, duration_minutes) = match &package {
        Some(package) => (package.price, package.duration_minutes),
        None => (input.price, input.duration_minutes),
    };

    if duration_minutes == 0 {
        return Err(SchedulingError::Validation(
            "Booking duration must be at least one minute".to_string(),
        ));
    }
    let amount = Money::from_decimal(price)
        .ok_or_else(|| SchedulingError::InvalidPrice(format!("Price out of range: {}", price)))?;
    if amount.cents() < 0 {
        return Err(SchedulingError::InvalidPrice(format!(
            "Price cannot be negative: {}",
            price
        )));
    }

    let interval = Interval::from_start(input.scheduled_at, duration_minutes);
    let active = repo.fetch_active_bookings(input.reader_id).await?;
    if !interval_is_free(input.reader_id, interval, &active, None) {
        warn!(
            "Service layer: reader {} has a conflicting booking over {} .. {}",
            input.reader_id, interval.start, interval.end
        );
        return Err(SchedulingError::SlotUnavailable(format!(
            "Reader {} is already booked over {} .. {}",
            input.reader_id, interval.start, interval.end
        )));
    }

    let payment_ref = if amount.is_positive() {
        let token = auth.auth_token().await;
        match payments.authorize(&token, amount.to_decimal()).await {
            PaymentOutcome::Approved { reference } => Some(reference),
            PaymentOutcome::Declined { reason } => {
                warn!(
                    "Service layer: payment declined for client {}: {}",
                    input.client_id, reason
                );
                return Err(SchedulingError::Payment(reason));
            }
        }
    } else {
        None
    };

    let now = Utc::now();
    let reading = ScheduledReading {
        id: None,
        client_id: input.client_id,
        reader_id: input.reader_id,
        package_id: input.package_id,
        reading_type: input.reading_type,
        scheduled_at: input.scheduled_at,
        duration_minutes,
        price: amount.to_decimal(),
        status: ReadingStatus::Pending,
        time_zone: input.time_zone,
        special_requests: input.special_requests,
        notes: None,
        recurrence: input.recurrence,
        payment_ref,
        cancellation_reason: None,
        actual_minutes: None,
        final_cost: None,
        ended_at: None,
        created_at: now,
        updated_at: now,
    };

    match repo.insert_booking(&reading).await {
        Ok(stored) => Ok(stored),
        Err(RepositoryError::Conflict(msg)) => Err(SchedulingError::SlotUnavailable(msg)),
        Err(other) => Err(other.into()),
    }
}

// ==================== Lifecycle Transitions ====================

/// Confirm a pending reading, the reader accepting the booking.
pub async fn confirm_reading<R: FullRepository + ?Sized>(
    repo: &R,
    reading_id: BookingId,
) -> SchedulingResult<ScheduledReading> {
    info!("Service layer: confirming reading {}", reading_id);

    let mut reading = load_booking(repo, reading_id).await?;
    if reading.status != ReadingStatus::Pending {
        return Err(SchedulingError::transition(
            reading.status,
            ReadingStatus::Confirmed,
        ));
    }
    reading.status = ReadingStatus::Confirmed;
    reading.updated_at = Utc::now();
    Ok(repo.update_booking(&reading).await?)
}

/// Begin a confirmed reading, marking the session as started.
pub async fn begin_reading<R: FullRepository + ?Sized>(
    repo: &R,
    reading_id: BookingId,
) -> SchedulingResult<ScheduledReading> {
    info!("Service layer: starting reading {}", reading_id);

    let mut reading = load_booking(repo, reading_id).await?;
    if reading.status != ReadingStatus::Confirmed {
        return Err(SchedulingError::transition(
            reading.status,
            ReadingStatus::InProgress,
        ));
    }
    reading.status = ReadingStatus::InProgress;
    reading.updated_at = Utc::now();
    Ok(repo.update_booking(&reading).await?)
}

/// Cancel a reading, persisting the caller's reason.
///
/// Only `pending` and `confirmed` readings can be cancelled; anything else
/// fails `NotCancellable`.
pub async fn cancel_reading<R: FullRepository + ?Sized>(
    repo: &R,
    reading_id: BookingId,
    reason: String,
) -> SchedulingResult<ScheduledReading> {
    info!("Service layer: cancelling reading {}", reading_id);

    let mut reading = load_booking(repo, reading_id).await?;
    if !matches!(
        reading.status,
        ReadingStatus::Pending | ReadingStatus::Confirmed
    ) {
        return Err(SchedulingError::NotCancellable(format!(
            "Reading {} is {}; only pending or confirmed readings can be cancelled",
            reading_id, reading.status
        )));
    }
    reading.status = ReadingStatus::Cancelled;
    reading.cancellation_reason = Some(reason);
    reading.updated_at = Utc::now();
    Ok(repo.update_booking(&reading).await?)
}

/// Complete an in-progress reading, recording the session outcome.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `reading_id` - Reading to complete
/// * `actual_minutes` - Minutes the session actually ran
/// * `final_cost` - Amount actually charged
///
/// # Returns
/// * `Ok(ScheduledReading)` - The completed record with its end time set
/// * `Err(SchedulingError::InvalidTransition)` - If not `in_progress`
pub async fn complete_reading<R: FullRepository + ?Sized>(
    repo: &R,
    reading_id: BookingId,
    actual_minutes: u32,
    final_cost: rust_decimal::Decimal,
) -> SchedulingResult<ScheduledReading> {
    info!("Service layer: completing reading {}", reading_id);

    let cost = Money::from_decimal(final_cost).ok_or_else(|| {
        SchedulingError::InvalidPrice(format!("Final cost out of range: {}", final_cost))
    })?;
    if cost.cents() < 0 {
        return Err(SchedulingError::InvalidPrice(format!(
            "Final cost cannot be negative: {}",
            final_cost
        )));
    }

    let mut reading = load_booking(repo, reading_id).await?;
    if reading.status != ReadingStatus::InProgress {
        return Err(SchedulingError::transition(
            reading.status,
            ReadingStatus::Completed,
        ));
    }
    reading.status = ReadingStatus::Completed;
    reading.actual_minutes = Some(actual_minutes);
    reading.final_cost = Some(cost.to_decimal());
    reading.ended_at = Some(Utc::now());
    reading.updated_at = Utc::now();
    Ok(repo.update_booking(&reading).await?)
}

/// Move a reading to a new window.
///
/// The original must be `pending` or `confirmed`. The new window is
/// validated against the reader's active bookings excluding the reading
/// being moved, the original is marked `rescheduled`, and a fresh
/// `pending` booking is inserted carrying the client, reader, type,
/// package, and price forward.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `reading_id` - Reading to move
/// * `new_start` - Start of the replacement window, UTC
/// * `new_duration_minutes` - Replacement duration; `None` keeps the original
/// * `reason` - Optional note recorded on the closed original
///
/// # Returns
/// * `Ok(ScheduledReading)` - The replacement `pending` booking
/// * `Err(SchedulingError::NotReschedulable)` - If the original is past
///   `confirmed`
/// * `Err(SchedulingError::SlotUnavailable)` - If the new window is taken
pub async fn reschedule_reading<R: FullRepository + ?Sized>(
    repo: &R,
    reading_id: BookingId,
    new_start: DateTime<Utc>,
    new_duration_minutes: Option<u32>,
    reason: Option<String>,
) -> SchedulingResult<ScheduledReading> {
    info!(
        "Service layer: rescheduling reading {} to {}",
        reading_id, new_start
    );

    let original = load_booking(repo, reading_id).await?;
    if !matches!(
        original.status,
        ReadingStatus::Pending | ReadingStatus::Confirmed
    ) {
        return Err(SchedulingError::NotReschedulable(format!(
            "Reading {} is {}; only pending or confirmed readings can be rescheduled",
            reading_id, original.status
        )));
    }

    let duration_minutes = new_duration_minutes.unwrap_or(original.duration_minutes);
    if duration_minutes == 0 {
        return Err(SchedulingError::Validation(
            "Booking duration must be at least one minute".to_string(),
        ));
    }

    let interval = Interval::from_start(new_start, duration_minutes);
    let active = repo.fetch_active_bookings(original.reader_id).await?;
    if !interval_is_free(original.reader_id, interval, &active, Some(reading_id)) {
        return Err(SchedulingError::SlotUnavailable(format!(
            "Reader {} is already booked over {} .. {}",
            original.reader_id, interval.start, interval.end
        )));
    }

    let previous_status = original.status;
    let now = Utc::now();

    let mut closed = original.clone();
    closed.status = ReadingStatus::Rescheduled;
    if reason.is_some() {
        closed.notes = reason;
    }
    closed.updated_at = now;
    repo.update_booking(&closed).await?;

    let replacement = ScheduledReading {
        id: None,
        client_id: original.client_id,
        reader_id: original.reader_id,
        package_id: original.package_id,
        reading_type: original.reading_type,
        scheduled_at: new_start,
        duration_minutes,
        price: original.price,
        status: ReadingStatus::Pending,
        time_zone: original.time_zone.clone(),
        special_requests: original.special_requests.clone(),
        notes: None,
        recurrence: None,
        payment_ref: original.payment_ref.clone(),
        cancellation_reason: None,
        actual_minutes: None,
        final_cost: None,
        ended_at: None,
        created_at: now,
        updated_at: now,
    };

    match repo.insert_booking(&replacement).await {
        Ok(stored) => Ok(stored),
        Err(err) => {
            // Reinstate the original so a failed move does not lose the
            // booking. The gap between closing the original and inserting
            // the replacement is the check-then-insert race window.
            let mut reverted = closed;
            reverted.status = previous_status;
            reverted.notes = original.notes.clone();
            reverted.updated_at = Utc::now();
            repo.update_booking(&reverted).await?;
            match err {
                RepositoryError::Conflict(msg) => Err(SchedulingError::SlotUnavailable(msg)),
                other => Err(other.into()),
            }
        }
    }
}

// ==================== Queries ====================

/// Get one reading by id.
pub async fn get_reading<R: FullRepository + ?Sized>(
    repo: &R,
    reading_id: BookingId,
) -> SchedulingResult<ScheduledReading> {
    load_booking(repo, reading_id).await
}

/// List readings for one side of the marketplace.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `user_id` - Client or reader id, interpreted per `role`
/// * `role` - Which side of the marketplace `user_id` refers to
/// * `status` - Optional status filter
///
/// # Returns
/// * `Ok(Vec<ScheduledReading>)` - Readings ordered by scheduled start
pub async fn get_scheduled_readings<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: i64,
    role: UserRole,
    status: Option<ReadingStatus>,
) -> SchedulingResult<Vec<ScheduledReading>> {
    info!(
        "Service layer: listing readings for {:?} {} (status {:?})",
        role, user_id, status
    );

    let mut readings = match role {
        UserRole::Client => {
            repo.list_bookings_for_client(ClientId(user_id), status)
                .await?
        }
        UserRole::Reader => {
            repo.list_bookings_for_reader(ReaderId(user_id), status)
                .await?
        }
    };
    readings.sort_by_key(|r| r.scheduled_at);
    Ok(readings)
}

async fn load_booking<R: FullRepository + ?Sized>(
    repo: &R,
    reading_id: BookingId,
) -> SchedulingResult<ScheduledReading> {
    match repo.get_booking(reading_id).await {
        Ok(reading) => Ok(reading),
        Err(RepositoryError::NotFound(msg)) => Err(SchedulingError::NotFound(msg)),
        Err(other) => Err(other.into()),
    }
}
