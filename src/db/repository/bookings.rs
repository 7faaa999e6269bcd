//! Booking repository trait.
//!
//! This trait defines the persistence operations for scheduled readings,
//! including the conditional insert that enforces the per-reader
//! no-overlap invariant.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::*;

/// Repository trait for scheduled reading storage.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the storage connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Booking Operations ====================

    /// Insert a new booking, enforcing the no-overlap invariant.
    ///
    /// This is a transactional check-and-insert: the booking is rejected
    /// with `Conflict` when any active booking of the same reader overlaps
    /// its `[scheduled_at, scheduled_at + duration)` interval. Concurrent
    /// inserts for the same window are serialized so exactly one wins.
    ///
    /// # Arguments
    /// * `reading` - The booking to store; its `id` field is ignored
    ///
    /// # Returns
    /// * `Ok(ScheduledReading)` - The stored booking with its assigned id
    /// * `Err(RepositoryError::Conflict)` - If an active booking overlaps
    /// * `Err(RepositoryError)` - If the operation fails
    async fn insert_booking(&self, reading: &ScheduledReading)
        -> RepositoryResult<ScheduledReading>;

    /// Retrieve a booking by id.
    ///
    /// # Arguments
    /// * `booking_id` - The booking to retrieve
    ///
    /// # Returns
    /// * `Ok(ScheduledReading)` - The booking
    /// * `Err(RepositoryError::NotFound)` - If the booking doesn't exist
    async fn get_booking(&self, booking_id: BookingId) -> RepositoryResult<ScheduledReading>;

    /// Overwrite an existing booking.
    ///
    /// Used for status transitions and completion bookkeeping; the overlap
    /// guard is not re-run because the occupied interval never changes
    /// through an update (a reschedule inserts a fresh booking instead).
    ///
    /// # Arguments
    /// * `reading` - The booking to store; `id` must be set
    ///
    /// # Returns
    /// * `Ok(ScheduledReading)` - The stored booking
    /// * `Err(RepositoryError::NotFound)` - If the booking doesn't exist
    async fn update_booking(&self, reading: &ScheduledReading)
        -> RepositoryResult<ScheduledReading>;

    /// List a reader's bookings, optionally filtered by status.
    ///
    /// # Arguments
    /// * `reader_id` - The reader whose bookings to list
    /// * `status` - When set, only bookings in this status are returned
    ///
    /// # Returns
    /// * `Ok(Vec<ScheduledReading>)` - Matching bookings, possibly empty
    /// * `Err(RepositoryError)` - If the operation fails
    async fn list_bookings_for_reader(
        &self,
        reader_id: ReaderId,
        status: Option<ReadingStatus>,
    ) -> RepositoryResult<Vec<ScheduledReading>>;

    /// List a client's bookings, optionally filtered by status.
    ///
    /// # Arguments
    /// * `client_id` - The client whose bookings to list
    /// * `status` - When set, only bookings in this status are returned
    ///
    /// # Returns
    /// * `Ok(Vec<ScheduledReading>)` - Matching bookings, possibly empty
    /// * `Err(RepositoryError)` - If the operation fails
    async fn list_bookings_for_client(
        &self,
        client_id: ClientId,
        status: Option<ReadingStatus>,
    ) -> RepositoryResult<Vec<ScheduledReading>>;

    /// Fetch the bookings that currently occupy a reader's calendar.
    ///
    /// Returns only bookings in an active status (pending, confirmed,
    /// in_progress); this is the input set for conflict checks.
    ///
    /// # Arguments
    /// * `reader_id` - The reader to fetch active bookings for
    ///
    /// # Returns
    /// * `Ok(Vec<ScheduledReading>)` - Active bookings, possibly empty
    /// * `Err(RepositoryError)` - If the operation fails
    async fn fetch_active_bookings(
        &self,
        reader_id: ReaderId,
    ) -> RepositoryResult<Vec<ScheduledReading>>;
}
