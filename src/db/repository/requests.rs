//! Instant reading request repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::*;

/// Repository trait for instant reading request storage.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Insert a new reading request.
    ///
    /// # Arguments
    /// * `request` - The request to store; its `id` field is ignored
    ///
    /// # Returns
    /// * `Ok(ReadingRequest)` - The stored request with its assigned id
    /// * `Err(RepositoryError)` - If the operation fails
    async fn insert_request(&self, request: &ReadingRequest) -> RepositoryResult<ReadingRequest>;

    /// Retrieve a reading request by id.
    ///
    /// # Arguments
    /// * `request_id` - The request to retrieve
    ///
    /// # Returns
    /// * `Ok(ReadingRequest)` - The request
    /// * `Err(RepositoryError::NotFound)` - If the request doesn't exist
    async fn get_request(&self, request_id: RequestId) -> RepositoryResult<ReadingRequest>;

    /// Overwrite an existing reading request.
    ///
    /// # Arguments
    /// * `request` - The request to store; `id` must be set
    ///
    /// # Returns
    /// * `Ok(ReadingRequest)` - The stored request
    /// * `Err(RepositoryError::NotFound)` - If the request doesn't exist
    async fn update_request(&self, request: &ReadingRequest) -> RepositoryResult<ReadingRequest>;

    /// List all requests a client has sent.
    ///
    /// # Arguments
    /// * `client_id` - The client whose requests to list
    ///
    /// # Returns
    /// * `Ok(Vec<ReadingRequest>)` - The requests, possibly empty
    /// * `Err(RepositoryError)` - If the operation fails
    async fn list_requests_for_client(
        &self,
        client_id: ClientId,
    ) -> RepositoryResult<Vec<ReadingRequest>>;

    /// List all requests addressed to a reader.
    ///
    /// # Arguments
    /// * `reader_id` - The reader whose inbound requests to list
    ///
    /// # Returns
    /// * `Ok(Vec<ReadingRequest>)` - The requests, possibly empty
    /// * `Err(RepositoryError)` - If the operation fails
    async fn list_requests_for_reader(
        &self,
        reader_id: ReaderId,
    ) -> RepositoryResult<Vec<ReadingRequest>>;
}
