//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer that sits between the repository
//! traits and the HTTP surface. Services validate input, orchestrate
//! repository calls, and implement the scheduling rules; they hold no
//! state of their own beyond the injected repository.

pub mod availability;
pub mod bookings;
pub mod conflicts;
pub mod error;
pub mod pricing;
pub mod recurrence;
pub mod requests;
pub mod slots;

#[cfg(test)]
#[path = "recurrence_tests.rs"]
mod recurrence_tests;

pub use availability::{list_reader_availability, list_reader_packages, set_reader_availability};
pub use bookings::{
    begin_reading, book_reading, cancel_reading, complete_reading, confirm_reading, get_reading,
    get_scheduled_readings, reschedule_reading,
};
pub use conflicts::{interval_is_free, slot_is_available};
pub use error::{SchedulingError, SchedulingResult};
pub use pricing::{discount_percent, effective_price, package_discount};
pub use recurrence::{
    expand_recurring_booking, occurrence_dates, ExpansionReport, SkippedOccurrence,
    MAX_RECURRENCE_OCCURRENCES,
};
pub use requests::{
    list_reading_requests, respond_to_request, send_reading_request, DEFAULT_REQUEST_TTL_MINUTES,
};
pub use slots::get_available_time_slots;
