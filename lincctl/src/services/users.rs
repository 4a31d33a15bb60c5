//! Service for `/users`.

use crate::api::ApiClient;
use crate::api::models::common::{FieldValidationRequest, ValidationResponse};
use crate::api::models::pagination::{PageQuery, PageResponse};
use crate::api::models::users::{ListUsersQuery, UserCreate, UserResponse, UserStatus, UserSummary, UserType, UserUpdate};
use crate::errors::Result;
use crate::services::CrudService;
use crate::types::{UserGroupId, UserId, abbrev_uuid};
use tracing::{debug, instrument, warn};

/// Filter for listing users
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub page: PageQuery,
    pub search: Option<String>,
    pub status: Option<UserStatus>,
    pub user_type: Option<UserType>,
    pub user_group_id: Option<UserGroupId>,
}

impl UserFilter {
    /// First page of `size` users, no filters.
    pub fn all(size: u32) -> Self {
        Self {
            page: PageQuery::new(1, size),
            ..Default::default()
        }
    }

    pub fn with_user_group(mut self, user_group_id: UserGroupId) -> Self {
        self.user_group_id = Some(user_group_id);
        self
    }

    fn query(&self) -> ListUsersQuery {
        ListUsersQuery {
            page: self.page,
            search: self.search.clone(),
            status: self.status,
            user_type: self.user_type,
            user_group_id: self.user_group_id,
        }
    }
}

pub struct Users<'c> {
    client: &'c ApiClient,
}

impl<'c> Users<'c> {
    pub fn new(client: &'c ApiClient) -> Self {
        Self { client }
    }

    /// One page of users with the server's paging metadata.
    #[instrument(skip(self, filter), fields(page = ?filter.page.page, size = ?filter.page.size), err)]
    pub async fn list_page(&self, filter: &UserFilter) -> Result<PageResponse<UserResponse>> {
        self.client.get_with_query("users/", &filter.query()).await
    }

    /// Free-text search over name, username and email.
    #[instrument(skip(self), err)]
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<UserSummary>> {
        self.client
            .get_with_query("users/search", &[("q", query.to_string()), ("limit", limit.to_string())])
            .await
    }

    /// Ask the server whether `value` is acceptable (and unused) for `field`.
    #[instrument(skip(self, value), err)]
    pub async fn validate_field(&self, field: &str, value: &str) -> Result<ValidationResponse> {
        self.client
            .post("users/validate-field", &FieldValidationRequest { field, value })
            .await
    }
}

#[async_trait::async_trait]
impl<'c> CrudService for Users<'c> {
    type CreateRequest = UserCreate;
    type UpdateRequest = UserUpdate;
    type Response = UserResponse;
    type Id = UserId;
    type Filter = UserFilter;

    #[instrument(skip(self, request), fields(username = %request.username), err)]
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        self.client.post("users/", request).await
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&self, id: Self::Id) -> Result<Self::Response> {
        self.client
            .get(&format!("users/{id}"))
            .await
            .map_err(|e| e.for_resource("User", id))
    }

    /// Every user matching `filter`, following pages from `filter.page` until `total` is reached.
    #[instrument(skip(self, filter), err)]
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut filter = filter.clone();
        let first = self.list_page(&filter).await?;
        let total = first.total;
        let mut page = first.page;
        let mut users = first.items;

        while (users.len() as u64) < total {
            page += 1;
            filter.page.page = Some(page);
            let next = self.list_page(&filter).await?;
            if next.items.is_empty() {
                warn!(loaded = users.len(), total, "Server reported more users than it returned");
                break;
            }
            users.extend(next.items);
        }
        debug!(count = users.len(), "Loaded users");
        Ok(users)
    }

    #[instrument(skip(self, request), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        self.client
            .put(&format!("users/{id}"), request)
            .await
            .map_err(|e| e.for_resource("User", id))
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn delete(&self, id: Self::Id) -> Result<Self::Response> {
        self.client
            .delete(&format!("users/{id}"))
            .await
            .map_err(|e| e.for_resource("User", id))
    }
}
