//! Public API surface for the scheduling engine.
//!
//! This file consolidates the domain types shared by the repository,
//! service, and HTTP layers. All types derive Serialize/Deserialize for
//! JSON serialization.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::time::{hhmm, resolve_utc, Interval};

crate::define_id_type!(i64, ReaderId);
crate::define_id_type!(i64, ClientId);
crate::define_id_type!(i64, AvailabilityId);
crate::define_id_type!(i64, BookingId);
crate::define_id_type!(i64, PackageId);
crate::define_id_type!(i64, RequestId);

/// Delivery channel for a reading session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingType {
    Chat,
    Phone,
    Video,
}

impl std::fmt::Display for ReadingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReadingType::Chat => "chat",
            ReadingType::Phone => "phone",
            ReadingType::Video => "video",
        };
        write!(f, "{label}")
    }
}

/// Lifecycle state of a scheduled reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Rescheduled,
}

impl ReadingStatus {
    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReadingStatus::Completed | ReadingStatus::Cancelled | ReadingStatus::Rescheduled
        )
    }

    /// Active states occupy the reader's calendar for conflict checks.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReadingStatus::Pending => "pending",
            ReadingStatus::Confirmed => "confirmed",
            ReadingStatus::InProgress => "in_progress",
            ReadingStatus::Completed => "completed",
            ReadingStatus::Cancelled => "cancelled",
            ReadingStatus::Rescheduled => "rescheduled",
        };
        write!(f, "{label}")
    }
}

/// Lifecycle state of an instant reading request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Expired => "expired",
        };
        write!(f, "{label}")
    }
}

/// Cadence of a recurring booking series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceFrequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl std::fmt::Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RecurrenceFrequency::Weekly => "weekly",
            RecurrenceFrequency::Biweekly => "biweekly",
            RecurrenceFrequency::Monthly => "monthly",
        };
        write!(f, "{label}")
    }
}

/// Which side of the marketplace a listing query is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Client,
    Reader,
}

/// Weekly recurring availability template entry for a reader.
///
/// One entry per (reader, day, time range); entries for the same reader and
/// day must not overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderAvailability {
    /// Server-assigned on insert; optional on input.
    #[serde(default)]
    pub id: Option<AvailabilityId>,
    pub reader_id: ReaderId,
    /// Day of week this entry covers: 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// Reading types offered inside this window.
    pub reading_types: Vec<ReadingType>,
    /// Zone label the reader declared; display metadata only.
    pub time_zone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_sessions: Option<u32>,
    /// Gap inserted between consecutive generated slots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_minutes: Option<u32>,
}

/// Concrete dated bookable interval derived from an availability template.
///
/// Ephemeral: recomputed on every query, never stored authoritatively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub reader_id: ReaderId,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub duration_minutes: u32,
    pub reading_type: ReadingType,
    pub price: Decimal,
    pub available: bool,
}

impl TimeSlot {
    /// UTC instant at which the slot begins.
    pub fn start_at(&self) -> DateTime<Utc> {
        resolve_utc(self.date, self.start_time)
    }

    /// Occupied interval `[start, start + duration)`.
    pub fn interval(&self) -> Interval {
        Interval::from_start(self.start_at(), self.duration_minutes)
    }
}

/// Repetition rule attached to a template booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringPattern {
    pub frequency: RecurrenceFrequency,
    /// Last date an occurrence may fall on, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Series length cap, counting the template booking itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_occurrences: Option<u32>,
    /// Anchor day of week: 0 = Sunday .. 6 = Saturday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    /// Anchor day of month for monthly series, clamped in shorter months.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
}

/// Persistent booking record.
///
/// Invariant: for a given reader, no two readings with overlapping
/// `[scheduled_at, scheduled_at + duration)` intervals may both hold an
/// active status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledReading {
    /// Server-assigned on insert; optional on input.
    #[serde(default)]
    pub id: Option<BookingId>,
    pub client_id: ClientId,
    pub reader_id: ReaderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<PackageId>,
    pub reading_type: ReadingType,
    /// Session start in UTC.
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub price: Decimal,
    pub status: ReadingStatus,
    /// Zone label the client booked in; display metadata only.
    pub time_zone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Present only on the template booking of a recurring series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurringPattern>,
    /// Payment-intent reference returned by the authorizer for paid bookings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    /// Recorded on completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduledReading {
    /// Occupied interval `[scheduled_at, scheduled_at + duration)`.
    pub fn interval(&self) -> Interval {
        Interval::from_start(self.scheduled_at, self.duration_minutes)
    }
}

/// Priced offering a reader advertises. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingPackage {
    pub id: PackageId,
    pub reader_id: ReaderId,
    pub name: String,
    pub duration_minutes: u32,
    pub price: Decimal,
    /// Pre-discount price when the package is on offer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    pub reading_type: ReadingType,
    #[serde(default)]
    pub features: Vec<String>,
    pub available: bool,
}

/// Per-minute rate for one reading type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRate {
    pub reading_type: ReadingType,
    /// Price per minute.
    pub rate: Decimal,
}

/// Per-reader per-minute rates by reading type. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderRateCard {
    pub reader_id: ReaderId,
    pub rates: Vec<ReadingRate>,
}

impl ReaderRateCard {
    /// Per-minute rate for the given type, if the reader offers it.
    pub fn rate_for(&self, reading_type: ReadingType) -> Option<Decimal> {
        self.rates
            .iter()
            .find(|r| r.reading_type == reading_type)
            .map(|r| r.rate)
    }
}

/// Instant reading request awaiting the reader's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRequest {
    /// Server-assigned on insert; optional on input.
    #[serde(default)]
    pub id: Option<RequestId>,
    pub client_id: ClientId,
    pub reader_id: ReaderId,
    pub reading_type: ReadingType,
    pub price: Decimal,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ReadingRequest {
    /// True once `now` has reached the expiry instant of a pending request.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status == RequestStatus::Pending && now >= self.expires_at
    }
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

/// Input for creating a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingInput {
    pub client_id: ClientId,
    pub reader_id: ReaderId,
    /// When set, the package's price and duration are authoritative.
    #[serde(default)]
    pub package_id: Option<PackageId>,
    pub reading_type: ReadingType,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub price: Decimal,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub recurrence: Option<RecurringPattern>,
}

/// Input for sending an instant reading request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestInput {
    pub client_id: ClientId,
    pub reader_id: ReaderId,
    pub reading_type: ReadingType,
    pub price: Decimal,
    #[serde(default)]
    pub message: Option<String>,
    /// Minutes until expiry; falls back to the dispatcher default.
    #[serde(default)]
    pub ttl_minutes: Option<i64>,
}
