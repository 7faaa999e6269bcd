//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic. Failures surface as [`AppError`]
//! and map to status codes there.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    AvailabilityEntryBody, BookReadingResponse, CancelRequest, CompleteRequest, HealthResponse,
    PackageSummary, ReadingsQuery, RequestsQuery, RescheduleRequest, RespondRequest,
    TimeSlotsQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{
    BookingId, BookingInput, ReaderAvailability, ReaderId, ReadingRequest, RequestId,
    RequestInput, ScheduledReading, TimeSlot,
};
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Reader Availability & Offerings
// =============================================================================

/// GET /v1/readers/{reader_id}/time-slots
///
/// List the bookable slots a reader has in a date range.
pub async fn get_time_slots(
    State(state): State<AppState>,
    Path(reader_id): Path<i64>,
    Query(query): Query<TimeSlotsQuery>,
) -> HandlerResult<Vec<TimeSlot>> {
    let slots = services::get_available_time_slots(
        state.repository.as_ref(),
        ReaderId::new(reader_id),
        query.reading_type,
        query.start_date,
        query.end_date,
        query.duration_minutes,
    )
    .await?;

    Ok(Json(slots))
}

/// PUT /v1/readers/{reader_id}/availability
///
/// Replace the reader's weekly availability template.
pub async fn set_availability(
    State(state): State<AppState>,
    Path(reader_id): Path<i64>,
    Json(entries): Json<Vec<AvailabilityEntryBody>>,
) -> HandlerResult<Vec<ReaderAvailability>> {
    let reader_id = ReaderId::new(reader_id);
    let entries: Vec<ReaderAvailability> = entries
        .into_iter()
        .map(|body| body.into_entry(reader_id))
        .collect();

    let stored =
        services::set_reader_availability(state.repository.as_ref(), reader_id, entries).await?;

    Ok(Json(stored))
}

/// GET /v1/readers/{reader_id}/availability
///
/// Fetch the reader's weekly availability template.
pub async fn list_availability(
    State(state): State<AppState>,
    Path(reader_id): Path<i64>,
) -> HandlerResult<Vec<ReaderAvailability>> {
    let entries =
        services::list_reader_availability(state.repository.as_ref(), ReaderId::new(reader_id))
            .await?;

    Ok(Json(entries))
}

/// GET /v1/readers/{reader_id}/packages
///
/// List the packages a reader offers, with advertised discounts.
pub async fn list_packages(
    State(state): State<AppState>,
    Path(reader_id): Path<i64>,
) -> HandlerResult<Vec<PackageSummary>> {
    let packages =
        services::list_reader_packages(state.repository.as_ref(), ReaderId::new(reader_id))
            .await?;

    let summaries: Vec<PackageSummary> = packages.into_iter().map(Into::into).collect();
    Ok(Json(summaries))
}

// =============================================================================
// Readings
// =============================================================================

/// POST /v1/readings
///
/// Book a new reading. Recurring bookings are expanded inline and the
/// stored template comes back together with the expansion report.
pub async fn create_reading(
    State(state): State<AppState>,
    Json(input): Json<BookingInput>,
) -> Result<(StatusCode, Json<BookReadingResponse>), AppError> {
    let reading = services::book_reading(
        state.repository.as_ref(),
        state.auth.as_ref(),
        state.payments.as_ref(),
        input,
    )
    .await?;

    let expansion = if reading.recurrence.is_some() {
        let report = services::expand_recurring_booking(
            state.repository.as_ref(),
            state.auth.as_ref(),
            state.payments.as_ref(),
            &reading,
        )
        .await?;
        Some(report)
    } else {
        None
    };

    Ok((
        StatusCode::CREATED,
        Json(BookReadingResponse { reading, expansion }),
    ))
}

/// GET /v1/readings
///
/// List readings for a client or a reader, optionally filtered by status.
pub async fn list_readings(
    State(state): State<AppState>,
    Query(query): Query<ReadingsQuery>,
) -> HandlerResult<Vec<ScheduledReading>> {
    let readings = services::get_scheduled_readings(
        state.repository.as_ref(),
        query.user_id,
        query.user_type,
        query.status,
    )
    .await?;

    Ok(Json(readings))
}

/// GET /v1/readings/{reading_id}
///
/// Fetch a single reading by id.
pub async fn get_reading(
    State(state): State<AppState>,
    Path(reading_id): Path<i64>,
) -> HandlerResult<ScheduledReading> {
    let reading =
        services::get_reading(state.repository.as_ref(), BookingId::new(reading_id)).await?;

    Ok(Json(reading))
}

/// POST /v1/readings/{reading_id}/confirm
///
/// Reader accepts a pending booking.
pub async fn confirm_reading(
    State(state): State<AppState>,
    Path(reading_id): Path<i64>,
) -> HandlerResult<ScheduledReading> {
    let reading =
        services::confirm_reading(state.repository.as_ref(), BookingId::new(reading_id)).await?;

    Ok(Json(reading))
}

/// POST /v1/readings/{reading_id}/start
///
/// Mark a confirmed reading as in progress.
pub async fn start_reading(
    State(state): State<AppState>,
    Path(reading_id): Path<i64>,
) -> HandlerResult<ScheduledReading> {
    let reading =
        services::begin_reading(state.repository.as_ref(), BookingId::new(reading_id)).await?;

    Ok(Json(reading))
}

/// POST /v1/readings/{reading_id}/complete
///
/// Close out an in-progress reading with the actual duration and charge.
pub async fn complete_reading(
    State(state): State<AppState>,
    Path(reading_id): Path<i64>,
    Json(body): Json<CompleteRequest>,
) -> HandlerResult<ScheduledReading> {
    let reading = services::complete_reading(
        state.repository.as_ref(),
        BookingId::new(reading_id),
        body.actual_minutes,
        body.final_cost,
    )
    .await?;

    Ok(Json(reading))
}

/// POST /v1/readings/{reading_id}/reschedule
///
/// Move a pending or confirmed reading to a new window.
pub async fn reschedule_reading(
    State(state): State<AppState>,
    Path(reading_id): Path<i64>,
    Json(body): Json<RescheduleRequest>,
) -> HandlerResult<ScheduledReading> {
    let reading = services::reschedule_reading(
        state.repository.as_ref(),
        BookingId::new(reading_id),
        body.scheduled_at,
        body.duration_minutes,
        body.reason,
    )
    .await?;

    Ok(Json(reading))
}

/// POST /v1/readings/{reading_id}/cancel
///
/// Cancel a pending or confirmed reading.
pub async fn cancel_reading(
    State(state): State<AppState>,
    Path(reading_id): Path<i64>,
    Json(body): Json<CancelRequest>,
) -> HandlerResult<ScheduledReading> {
    let reading = services::cancel_reading(
        state.repository.as_ref(),
        BookingId::new(reading_id),
        body.reason,
    )
    .await?;

    Ok(Json(reading))
}

// =============================================================================
// Instant Reading Requests
// =============================================================================

/// POST /v1/requests
///
/// Send an instant reading request to an online reader.
pub async fn create_request(
    State(state): State<AppState>,
    Json(input): Json<RequestInput>,
) -> Result<(StatusCode, Json<ReadingRequest>), AppError> {
    let request = services::send_reading_request(state.repository.as_ref(), input).await?;

    Ok((StatusCode::CREATED, Json(request)))
}

/// POST /v1/requests/{request_id}/respond
///
/// Reader accepts or rejects a pending request.
pub async fn respond_to_request(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    Json(body): Json<RespondRequest>,
) -> HandlerResult<ReadingRequest> {
    let request = services::respond_to_request(
        state.repository.as_ref(),
        RequestId::new(request_id),
        body.accept,
    )
    .await?;

    Ok(Json(request))
}

/// GET /v1/requests
///
/// List instant requests for a client or a reader.
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<RequestsQuery>,
) -> HandlerResult<Vec<ReadingRequest>> {
    let requests =
        services::list_reading_requests(state.repository.as_ref(), query.user_id, query.user_type)
            .await?;

    Ok(Json(requests))
}
