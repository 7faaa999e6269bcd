//! Data Transfer Objects for the HTTP API.
//!
//! Request and query shapes for the REST surface. Domain types from
//! [`crate::api`] already derive Serialize/Deserialize and cross the
//! boundary as-is; the types here exist where the wire shape differs from
//! the domain shape.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::{
    ReaderAvailability, ReaderId, ReadingPackage, ReadingStatus, ReadingType, ScheduledReading,
    UserRole,
};
use crate::models::time::hhmm;
use crate::services::pricing::package_discount;
use crate::services::ExpansionReport;

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_slot_duration() -> u32 {
    30
}

/// Query parameters for the time-slots endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotsQuery {
    pub reading_type: ReadingType,
    /// First day of the window, inclusive.
    pub start_date: NaiveDate,
    /// Last day of the window, inclusive.
    pub end_date: NaiveDate,
    /// Desired session length; defaults to half an hour.
    #[serde(default = "default_slot_duration")]
    pub duration_minutes: u32,
}

/// One availability window in a PUT availability body.
///
/// The reader id comes from the URL path, not the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityEntryBody {
    /// Day of week: 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub reading_types: Vec<ReadingType>,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default)]
    pub max_concurrent_sessions: Option<u32>,
    #[serde(default)]
    pub break_minutes: Option<u32>,
}

impl AvailabilityEntryBody {
    /// Attach the path reader id, producing the domain entry.
    pub fn into_entry(self, reader_id: ReaderId) -> ReaderAvailability {
        ReaderAvailability {
            id: None,
            reader_id,
            day_of_week: self.day_of_week,
            start_time: self.start_time,
            end_time: self.end_time,
            reading_types: self.reading_types,
            time_zone: self.time_zone,
            max_concurrent_sessions: self.max_concurrent_sessions,
            break_minutes: self.break_minutes,
        }
    }
}

/// A package decorated with its advertised discount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSummary {
    #[serde(flatten)]
    pub package: ReadingPackage,
    /// Percentage saved against the original price, when on offer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<i32>,
}

impl From<ReadingPackage> for PackageSummary {
    fn from(package: ReadingPackage) -> Self {
        let discount_percent = package_discount(&package);
        Self {
            package,
            discount_percent,
        }
    }
}

/// Response for booking creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookReadingResponse {
    /// The stored booking; the template of the series when recurring.
    pub reading: ScheduledReading,
    /// Expansion outcome for recurring bookings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expansion: Option<ExpansionReport>,
}

/// Query parameters for listing readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingsQuery {
    pub user_id: i64,
    pub user_type: UserRole,
    #[serde(default)]
    pub status: Option<ReadingStatus>,
}

/// Request body for rescheduling a reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    /// Start of the replacement window, UTC.
    pub scheduled_at: DateTime<Utc>,
    /// Replacement duration; omitted keeps the original.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Request body for cancelling a reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    pub reason: String,
}

/// Request body for completing a reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteRequest {
    /// Minutes the session actually ran.
    pub actual_minutes: u32,
    /// Amount actually charged.
    pub final_cost: Decimal,
}

/// Request body for responding to an instant request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondRequest {
    pub accept: bool,
}

/// Query parameters for listing instant requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestsQuery {
    pub user_id: i64,
    pub user_type: UserRole,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Storage connection status
    pub database: String,
}
