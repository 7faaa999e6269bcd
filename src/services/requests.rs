//! Instant reading request dispatch.
//!
//! Instant requests are unscheduled and short-lived: the reader either
//! accepts or rejects before the expiry instant, after which the request
//! lapses. There is no background timer; expiry is applied lazily whenever
//! a request is read back.

use chrono::{Duration, Utc};
use log::info;

use super::error::{SchedulingError, SchedulingResult};
use crate::api::{
    ClientId, ReaderId, ReadingRequest, RequestId, RequestInput, RequestStatus, UserRole,
};
use crate::db::repository::RepositoryError;
use crate::db::FullRepository;
use crate::models::money::Money;

/// Minutes an instant request stays open when the caller does not choose.
pub const DEFAULT_REQUEST_TTL_MINUTES: i64 = 5;

/// Send an instant reading request to a reader.
///
/// The request expires `ttl_minutes` after creation, defaulting to
/// [`DEFAULT_REQUEST_TTL_MINUTES`].
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `input` - Request parameters
///
/// # Returns
/// * `Ok(ReadingRequest)` - The stored `pending` request with its expiry set
/// * `Err(SchedulingError::Validation)` - If the TTL is not positive
/// * `Err(SchedulingError::InvalidPrice)` - If the price is negative
pub async fn send_reading_request<R: FullRepository + ?Sized>(
    repo: &R,
    input: RequestInput,
) -> SchedulingResult<ReadingRequest> {
    info!(
        "Service layer: client {} requesting instant {} reading from reader {}",
        input.client_id, input.reading_type, input.reader_id
    );

    let ttl_minutes = input.ttl_minutes.unwrap_or(DEFAULT_REQUEST_TTL_MINUTES);
    if ttl_minutes <= 0 {
        return Err(SchedulingError::Validation(format!(
            "Request TTL must be positive, got {} minutes",
            ttl_minutes
        )));
    }
    let amount = Money::from_decimal(input.price).ok_or_else(|| {
        SchedulingError::InvalidPrice(format!("Price out of range: {}", input.price))
    })?;
    if amount.cents() < 0 {
        return Err(SchedulingError::InvalidPrice(format!(
            "Price cannot be negative: {}",
            input.price
        )));
    }

    let now = Utc::now();
    let request = ReadingRequest {
        id: None,
        client_id: input.client_id,
        reader_id: input.reader_id,
        reading_type: input.reading_type,
        price: amount.to_decimal(),
        status: RequestStatus::Pending,
        message: input.message,
        created_at: now,
        expires_at: now + Duration::minutes(ttl_minutes),
    };
    Ok(repo.insert_request(&request).await?)
}

/// Accept or reject a pending request.
///
/// Expiry is applied first: responding to a request whose expiry instant
/// has passed flips the stored status to `expired` and fails
/// `InvalidTransition`. Terminal requests are never transitioned again.
pub async fn respond_to_request<R: FullRepository + ?Sized>(
    repo: &R,
    request_id: RequestId,
    accept: bool,
) -> SchedulingResult<ReadingRequest> {
    let target = if accept {
        RequestStatus::Accepted
    } else {
        RequestStatus::Rejected
    };
    info!(
        "Service layer: responding {} to request {}",
        target, request_id
    );

    let mut request = load_request(repo, request_id).await?;

    if request.is_expired_at(Utc::now()) {
        request.status = RequestStatus::Expired;
        repo.update_request(&request).await?;
        return Err(SchedulingError::transition(RequestStatus::Expired, target));
    }
    if request.status != RequestStatus::Pending {
        return Err(SchedulingError::transition(request.status, target));
    }

    request.status = target;
    Ok(repo.update_request(&request).await?)
}

/// List one user's instant requests, expiring lapsed ones on the way out.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `user_id` - Client or reader id, interpreted per `role`
/// * `role` - Which side of the marketplace `user_id` refers to
///
/// # Returns
/// * `Ok(Vec<ReadingRequest>)` - Requests in creation order, with any
///   pending request past its expiry already flipped to `expired`
pub async fn list_reading_requests<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: i64,
    role: UserRole,
) -> SchedulingResult<Vec<ReadingRequest>> {
    info!(
        "Service layer: listing requests for {:?} {}",
        role, user_id
    );

    let mut requests = match role {
        UserRole::Client => repo.list_requests_for_client(ClientId(user_id)).await?,
        UserRole::Reader => repo.list_requests_for_reader(ReaderId(user_id)).await?,
    };

    let now = Utc::now();
    for request in requests.iter_mut() {
        if request.is_expired_at(now) {
            request.status = RequestStatus::Expired;
            repo.update_request(request).await?;
        }
    }
    Ok(requests)
}

async fn load_request<R: FullRepository + ?Sized>(
    repo: &R,
    request_id: RequestId,
) -> SchedulingResult<ReadingRequest> {
    match repo.get_request(request_id).await {
        Ok(request) => Ok(request),
        Err(RepositoryError::NotFound(msg)) => Err(SchedulingError::NotFound(msg)),
        Err(other) => Err(other.into()),
    }
}
