//! Repository trait definitions for scheduling storage.
//!
//! This module provides a collection of focused repository traits that abstract
//! storage operations. By splitting responsibilities across multiple traits,
//! implementations can be more focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`availability`]: Reader availability templates, packages, and rates
//! - [`bookings`]: Scheduled reading storage with the no-overlap guard
//! - [`requests`]: Instant reading request storage
//!
//! # Trait Composition
//!
//! A complete repository implementation typically implements all traits:
//!
//! ```ignore
//! impl AvailabilityRepository for MyRepo { ... }
//! impl BookingRepository for MyRepo { ... }
//! impl RequestRepository for MyRepo { ... }
//! ```
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository>(repo: &R) -> RepositoryResult<()> {
//!     // Can use any repository method
//!     let bookings = repo.fetch_active_bookings(reader_id).await?;
//!     Ok(())
//! }
//! ```

pub mod availability;
pub mod bookings;
pub mod error;
pub mod requests;

// Re-export error types
pub use error::{RepositoryError, RepositoryResult};

// Re-export all traits
pub use availability::AvailabilityRepository;
pub use bookings::BookingRepository;
pub use requests::RequestRepository;

/// Composite trait bound for a complete repository implementation.
///
/// This trait is automatically implemented for any type that implements
/// all three repository traits. Use this as a convenient bound when you
/// need access to all repository operations.
///
/// # Example
///
/// ```ignore
/// async fn process_booking<R: FullRepository>(
///     repo: &R,
///     reading: &ScheduledReading,
/// ) -> RepositoryResult<ScheduledReading> {
///     // Can use all repository methods
///     let stored = repo.insert_booking(reading).await?;
///     Ok(stored)
/// }
/// ```
pub trait FullRepository:
    AvailabilityRepository + BookingRepository + RequestRepository + std::fmt::Debug
{
}

// Blanket implementation: any type implementing all three traits automatically implements FullRepository
impl<T> FullRepository for T where
    T: AvailabilityRepository + BookingRepository + RequestRepository + std::fmt::Debug
{
}
