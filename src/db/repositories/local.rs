//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMap structures, providing fast, deterministic, and
//! isolated execution.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::*;
use crate::db::repository::*;

/// In-memory local repository.
///
/// All data lives behind a single `RwLock`, which is what serializes
/// concurrent booking inserts: the overlap guard and the insert happen
/// under one write lock, so exactly one of two racing inserts for the
/// same window succeeds.
///
/// # Example
/// ```ignore
/// let repo = LocalRepository::new();
/// repo.seed_rate_card(card);
///
/// let slots = services::get_available_time_slots(&repo, /* ... */).await?;
/// ```
#[derive(Debug, Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Debug)]
struct LocalData {
    availability: HashMap<ReaderId, Vec<ReaderAvailability>>,
    bookings: HashMap<BookingId, ScheduledReading>,
    requests: HashMap<RequestId, ReadingRequest>,

    // Reference data
    packages: HashMap<PackageId, ReadingPackage>,
    rate_cards: HashMap<ReaderId, ReaderRateCard>,

    // ID counters
    next_availability_id: i64,
    next_booking_id: i64,
    next_request_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            availability: HashMap::new(),
            bookings: HashMap::new(),
            requests: HashMap::new(),
            packages: HashMap::new(),
            rate_cards: HashMap::new(),
            next_availability_id: 1,
            next_booking_id: 1,
            next_request_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Add a package to the catalog.
    ///
    /// This is a helper method for setting up reference data; packages are
    /// read-only through the repository traits.
    pub fn seed_package(&self, package: ReadingPackage) {
        let mut data = self.data.write();
        data.packages.insert(package.id, package);
    }

    /// Publish a reader's rate card.
    ///
    /// Helper for setting up reference data; rate cards are read-only
    /// through the repository traits.
    pub fn seed_rate_card(&self, card: ReaderRateCard) {
        let mut data = self.data.write();
        data.rate_cards.insert(card.reader_id, card);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        let mut data = self.data.write();
        data.is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Number of bookings stored, across all statuses.
    pub fn booking_count(&self) -> usize {
        self.data.read().bookings.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        let data = self.data.read();
        if !data.is_healthy {
            return Err(RepositoryError::ConnectionError(
                "Storage is not healthy".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AvailabilityRepository for LocalRepository {
    async fn replace_availability(
        &self,
        reader_id: ReaderId,
        entries: Vec<ReaderAvailability>,
    ) -> RepositoryResult<Vec<ReaderAvailability>> {
        self.check_health()?;

        let mut data = self.data.write();
        let mut stored = Vec::with_capacity(entries.len());
        for mut entry in entries {
            if entry.id.is_none() {
                entry.id = Some(AvailabilityId(data.next_availability_id));
                data.next_availability_id += 1;
            }
            stored.push(entry);
        }
        data.availability.insert(reader_id, stored.clone());
        Ok(stored)
    }

    async fn fetch_availability(
        &self,
        reader_id: ReaderId,
    ) -> RepositoryResult<Vec<ReaderAvailability>> {
        let data = self.data.read();
        Ok(data.availability.get(&reader_id).cloned().unwrap_or_default())
    }

    async fn fetch_availability_for_day(
        &self,
        reader_id: ReaderId,
        day_of_week: u8,
    ) -> RepositoryResult<Vec<ReaderAvailability>> {
        let data = self.data.read();
        Ok(data
            .availability
            .get(&reader_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.day_of_week == day_of_week)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_packages(&self, reader_id: ReaderId) -> RepositoryResult<Vec<ReadingPackage>> {
        let data = self.data.read();
        let mut packages: Vec<ReadingPackage> = data
            .packages
            .values()
            .filter(|p| p.reader_id == reader_id)
            .cloned()
            .collect();
        packages.sort_by_key(|p| p.id);
        Ok(packages)
    }

    async fn fetch_package(&self, package_id: PackageId) -> RepositoryResult<ReadingPackage> {
        let data = self.data.read();
        data.packages
            .get(&package_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Package {} not found", package_id)))
    }

    async fn fetch_rate_card(
        &self,
        reader_id: ReaderId,
    ) -> RepositoryResult<Option<ReaderRateCard>> {
        let data = self.data.read();
        Ok(data.rate_cards.get(&reader_id).cloned())
    }
}

// ==================== Booking Repository ====================

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read();
        Ok(data.is_healthy)
    }

    async fn insert_booking(
        &self,
        reading: &ScheduledReading,
    ) -> RepositoryResult<ScheduledReading> {
        self.check_health()?;

        // Guard and insert under one write lock so racing inserts for the
        // same window serialize and the loser sees the winner's row.
        let mut data = self.data.write();

        let candidate_interval = reading.interval();
        for existing in data.bookings.values() {
            if existing.reader_id != reading.reader_id || !existing.status.is_active() {
                continue;
            }
            if existing.interval().overlaps(&candidate_interval) {
                return Err(RepositoryError::Conflict(format!(
                    "Reader {} already has booking {} over {} .. {}",
                    reading.reader_id,
                    existing.id.map(|id| id.to_string()).unwrap_or_default(),
                    existing.interval().start,
                    existing.interval().end,
                )));
            }
        }

        let booking_id = BookingId(data.next_booking_id);
        data.next_booking_id += 1;

        let mut stored = reading.clone();
        stored.id = Some(booking_id);
        data.bookings.insert(booking_id, stored.clone());

        Ok(stored)
    }

    async fn get_booking(&self, booking_id: BookingId) -> RepositoryResult<ScheduledReading> {
        let data = self.data.read();
        data.bookings
            .get(&booking_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Booking {} not found", booking_id)))
    }

    async fn update_booking(
        &self,
        reading: &ScheduledReading,
    ) -> RepositoryResult<ScheduledReading> {
        self.check_health()?;

        let booking_id = reading.id.ok_or_else(|| {
            RepositoryError::ValidationError("Cannot update a booking without an id".to_string())
        })?;

        let mut data = self.data.write();
        if !data.bookings.contains_key(&booking_id) {
            return Err(RepositoryError::NotFound(format!(
                "Booking {} not found",
                booking_id
            )));
        }
        data.bookings.insert(booking_id, reading.clone());
        Ok(reading.clone())
    }

    async fn list_bookings_for_reader(
        &self,
        reader_id: ReaderId,
        status: Option<ReadingStatus>,
    ) -> RepositoryResult<Vec<ScheduledReading>> {
        let data = self.data.read();
        let mut bookings: Vec<ScheduledReading> = data
            .bookings
            .values()
            .filter(|b| b.reader_id == reader_id)
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.id);
        Ok(bookings)
    }

    async fn list_bookings_for_client(
        &self,
        client_id: ClientId,
        status: Option<ReadingStatus>,
    ) -> RepositoryResult<Vec<ScheduledReading>> {
        let data = self.data.read();
        let mut bookings: Vec<ScheduledReading> = data
            .bookings
            .values()
            .filter(|b| b.client_id == client_id)
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.id);
        Ok(bookings)
    }

    async fn fetch_active_bookings(
        &self,
        reader_id: ReaderId,
    ) -> RepositoryResult<Vec<ScheduledReading>> {
        let data = self.data.read();
        let mut bookings: Vec<ScheduledReading> = data
            .bookings
            .values()
            .filter(|b| b.reader_id == reader_id && b.status.is_active())
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.scheduled_at);
        Ok(bookings)
    }
}

// ==================== Request Repository ====================

#[async_trait]
impl RequestRepository for LocalRepository {
    async fn insert_request(&self, request: &ReadingRequest) -> RepositoryResult<ReadingRequest> {
        self.check_health()?;

        let mut data = self.data.write();
        let request_id = RequestId(data.next_request_id);
        data.next_request_id += 1;

        let mut stored = request.clone();
        stored.id = Some(request_id);
        data.requests.insert(request_id, stored.clone());
        Ok(stored)
    }

    async fn get_request(&self, request_id: RequestId) -> RepositoryResult<ReadingRequest> {
        let data = self.data.read();
        data.requests
            .get(&request_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Request {} not found", request_id)))
    }

    async fn update_request(&self, request: &ReadingRequest) -> RepositoryResult<ReadingRequest> {
        self.check_health()?;

        let request_id = request.id.ok_or_else(|| {
            RepositoryError::ValidationError("Cannot update a request without an id".to_string())
        })?;

        let mut data = self.data.write();
        if !data.requests.contains_key(&request_id) {
            return Err(RepositoryError::NotFound(format!(
                "Request {} not found",
                request_id
            )));
        }
        data.requests.insert(request_id, request.clone());
        Ok(request.clone())
    }

    async fn list_requests_for_client(
        &self,
        client_id: ClientId,
    ) -> RepositoryResult<Vec<ReadingRequest>> {
        let data = self.data.read();
        let mut requests: Vec<ReadingRequest> = data
            .requests
            .values()
            .filter(|r| r.client_id == client_id)
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.id);
        Ok(requests)
    }

    async fn list_requests_for_reader(
        &self,
        reader_id: ReaderId,
    ) -> RepositoryResult<Vec<ReadingRequest>> {
        let data = self.data.read();
        let mut requests: Vec<ReadingRequest> = data
            .requests
            .values()
            .filter(|r| r.reader_id == reader_id)
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.id);
        Ok(requests)
    }
}
