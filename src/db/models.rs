//! Shared data models re-exported for storage layer consumers.

pub use crate::api::{
    AvailabilityId, BookingId, ClientId, PackageId, ReaderAvailability, ReaderId, ReaderRateCard,
    ReadingPackage, ReadingRate, ReadingRequest, ReadingStatus, ReadingType, RequestId,
    RequestStatus, ScheduledReading,
};
