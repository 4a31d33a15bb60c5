//! Base trait for CRUD-style resource services.

use crate::errors::Result;

/// Common operations over one REST resource.
///
/// Mirrors the backend's resource shape: separate associated types for create requests, update
/// requests and responses. `delete` is a soft delete on the server and returns the updated entity.
#[async_trait::async_trait]
pub trait CrudService {
    /// The request type for creating entities
    type CreateRequest: Sync;

    /// The request type for updating entities
    type UpdateRequest: Sync;

    /// The response type returned by operations
    type Response: Send;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Create a new entity
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Get an entity by ID
    async fn get_by_id(&self, id: Self::Id) -> Result<Self::Response>;

    /// List entities with server-side filtering
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;

    /// Update an entity by ID
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response>;

    /// Soft-delete an entity by ID
    async fn delete(&self, id: Self::Id) -> Result<Self::Response>;
}
