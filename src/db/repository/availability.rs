//! Availability and catalog repository trait.
//!
//! This trait covers the reader-owned reference data the slot generator
//! consumes: weekly availability templates, priced packages, and the
//! per-minute rate card.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::*;

/// Repository trait for reader availability templates and pricing catalogs.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    // ==================== Availability Templates ====================

    /// Replace a reader's entire weekly availability template.
    ///
    /// Entries are stored as given, with ids assigned to entries that lack
    /// one. Callers are expected to have validated the entries first.
    ///
    /// # Arguments
    /// * `reader_id` - The reader whose template is being replaced
    /// * `entries` - The full new set of template entries
    ///
    /// # Returns
    /// * `Ok(Vec<ReaderAvailability>)` - The stored entries with ids assigned
    /// * `Err(RepositoryError)` - If the operation fails
    async fn replace_availability(
        &self,
        reader_id: ReaderId,
        entries: Vec<ReaderAvailability>,
    ) -> RepositoryResult<Vec<ReaderAvailability>>;

    /// Fetch all availability template entries for a reader.
    ///
    /// # Arguments
    /// * `reader_id` - The reader to fetch entries for
    ///
    /// # Returns
    /// * `Ok(Vec<ReaderAvailability>)` - The entries, empty for an unknown reader
    /// * `Err(RepositoryError)` - If the operation fails
    async fn fetch_availability(
        &self,
        reader_id: ReaderId,
    ) -> RepositoryResult<Vec<ReaderAvailability>>;

    /// Fetch the availability entries covering one day of the week.
    ///
    /// # Arguments
    /// * `reader_id` - The reader to fetch entries for
    /// * `day_of_week` - Day index, 0 = Sunday .. 6 = Saturday
    ///
    /// # Returns
    /// * `Ok(Vec<ReaderAvailability>)` - Matching entries, possibly empty
    /// * `Err(RepositoryError)` - If the operation fails
    async fn fetch_availability_for_day(
        &self,
        reader_id: ReaderId,
        day_of_week: u8,
    ) -> RepositoryResult<Vec<ReaderAvailability>>;

    // ==================== Packages & Rates ====================

    /// Fetch all packages a reader offers.
    ///
    /// # Arguments
    /// * `reader_id` - The reader to fetch packages for
    ///
    /// # Returns
    /// * `Ok(Vec<ReadingPackage>)` - The packages, empty for an unknown reader
    /// * `Err(RepositoryError)` - If the operation fails
    async fn fetch_packages(&self, reader_id: ReaderId) -> RepositoryResult<Vec<ReadingPackage>>;

    /// Fetch a single package by id.
    ///
    /// # Arguments
    /// * `package_id` - The package to fetch
    ///
    /// # Returns
    /// * `Ok(ReadingPackage)` - The package
    /// * `Err(RepositoryError::NotFound)` - If the package doesn't exist
    async fn fetch_package(&self, package_id: PackageId) -> RepositoryResult<ReadingPackage>;

    /// Fetch a reader's per-minute rate card.
    ///
    /// # Arguments
    /// * `reader_id` - The reader to fetch the rate card for
    ///
    /// # Returns
    /// * `Ok(Some(ReaderRateCard))` - The rate card
    /// * `Ok(None)` - If the reader has not published rates
    /// * `Err(RepositoryError)` - If the operation fails
    async fn fetch_rate_card(&self, reader_id: ReaderId)
        -> RepositoryResult<Option<ReaderRateCard>>;
}
