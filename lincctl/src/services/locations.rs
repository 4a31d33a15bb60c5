//! Service for `/locations`.

use crate::api::ApiClient;
use crate::api::models::locations::{
    InfrastructureType, ListLocationsQuery, LocationCreate, LocationResource, LocationResponse, LocationUpdate, OperationalStatus,
};
use crate::api::models::pagination::Pagination;
use crate::errors::Result;
use crate::services::CrudService;
use crate::types::{LocationId, UserGroupId, abbrev_uuid};
use tracing::instrument;

/// Filter for listing locations
#[derive(Debug, Clone, Default)]
pub struct LocationFilter {
    pub pagination: Pagination,
    pub user_group_id: Option<UserGroupId>,
    pub province_code: Option<String>,
    pub infrastructure_type: Option<InfrastructureType>,
    pub operational_status: Option<OperationalStatus>,
}

impl LocationFilter {
    /// Everything up to `limit` rows, no filters.
    pub fn all(limit: u32) -> Self {
        Self {
            pagination: Pagination::first(limit),
            ..Default::default()
        }
    }

    pub fn with_user_group(mut self, user_group_id: UserGroupId) -> Self {
        self.user_group_id = Some(user_group_id);
        self
    }
}

pub struct Locations<'c> {
    client: &'c ApiClient,
}

impl<'c> Locations<'c> {
    pub fn new(client: &'c ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self), fields(location_id = %abbrev_uuid(&id)), err)]
    pub async fn resources(&self, id: LocationId) -> Result<Vec<LocationResource>> {
        self.client
            .get(&format!("locations/{id}/resources"))
            .await
            .map_err(|e| e.for_resource("Location", id))
    }
}

#[async_trait::async_trait]
impl<'c> CrudService for Locations<'c> {
    type CreateRequest = LocationCreate;
    type UpdateRequest = LocationUpdate;
    type Response = LocationResponse;
    type Id = LocationId;
    type Filter = LocationFilter;

    #[instrument(skip(self, request), fields(code = %request.location_code), err)]
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        self.client.post("locations/", request).await
    }

    #[instrument(skip(self), fields(location_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&self, id: Self::Id) -> Result<Self::Response> {
        self.client
            .get(&format!("locations/{id}"))
            .await
            .map_err(|e| e.for_resource("Location", id))
    }

    #[instrument(skip(self, filter), fields(limit = filter.pagination.limit(), skip = filter.pagination.skip()), err)]
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let query = ListLocationsQuery {
            pagination: filter.pagination,
            user_group_id: filter.user_group_id,
            province_code: filter.province_code.clone(),
            infrastructure_type: filter.infrastructure_type,
            operational_status: filter.operational_status,
        };
        self.client.get_with_query("locations/", &query).await
    }

    #[instrument(skip(self, request), fields(location_id = %abbrev_uuid(&id)), err)]
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        self.client
            .put(&format!("locations/{id}"), request)
            .await
            .map_err(|e| e.for_resource("Location", id))
    }

    #[instrument(skip(self), fields(location_id = %abbrev_uuid(&id)), err)]
    async fn delete(&self, id: Self::Id) -> Result<Self::Response> {
        self.client
            .delete(&format!("locations/{id}"))
            .await
            .map_err(|e| e.for_resource("Location", id))
    }
}
