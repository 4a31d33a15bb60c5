//! Service for `/user-groups`.

use crate::api::ApiClient;
use crate::api::models::common::ValidationResponse;
use crate::api::models::pagination::Pagination;
use crate::api::models::user_groups::{ListUserGroupsQuery, UserGroupCreate, UserGroupResponse, UserGroupType, UserGroupUpdate};
use crate::errors::Result;
use crate::services::CrudService;
use crate::types::{UserGroupId, abbrev_uuid};
use tracing::instrument;

/// Filter for listing user groups
#[derive(Debug, Clone, Default)]
pub struct UserGroupFilter {
    pub pagination: Pagination,
    pub province_code: Option<String>,
    pub user_group_type: Option<UserGroupType>,
    pub is_active: Option<bool>,
}

impl UserGroupFilter {
    /// Everything up to `limit` rows, no filters.
    pub fn all(limit: u32) -> Self {
        Self {
            pagination: Pagination::first(limit),
            ..Default::default()
        }
    }

    pub fn with_province(mut self, province_code: impl Into<String>) -> Self {
        self.province_code = Some(province_code.into());
        self
    }
}

pub struct UserGroups<'c> {
    client: &'c ApiClient,
}

impl<'c> UserGroups<'c> {
    pub fn new(client: &'c ApiClient) -> Self {
        Self { client }
    }

    /// Ask the server whether a code is free. Used before submit; the create call can still fail.
    #[instrument(skip(self), err)]
    pub async fn validate_code(&self, code: &str) -> Result<ValidationResponse> {
        self.client.get(&format!("user-groups/validate-code/{code}")).await
    }
}

#[async_trait::async_trait]
impl<'c> CrudService for UserGroups<'c> {
    type CreateRequest = UserGroupCreate;
    type UpdateRequest = UserGroupUpdate;
    type Response = UserGroupResponse;
    type Id = UserGroupId;
    type Filter = UserGroupFilter;

    #[instrument(skip(self, request), fields(code = %request.user_group_code), err)]
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        self.client.post("user-groups/", request).await
    }

    #[instrument(skip(self), fields(user_group_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&self, id: Self::Id) -> Result<Self::Response> {
        self.client
            .get(&format!("user-groups/{id}"))
            .await
            .map_err(|e| e.for_resource("User group", id))
    }

    #[instrument(skip(self, filter), fields(limit = filter.pagination.limit(), skip = filter.pagination.skip()), err)]
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let query = ListUserGroupsQuery {
            pagination: filter.pagination,
            province_code: filter.province_code.clone(),
            user_group_type: filter.user_group_type,
            is_active: filter.is_active,
        };
        self.client.get_with_query("user-groups/", &query).await
    }

    #[instrument(skip(self, request), fields(user_group_id = %abbrev_uuid(&id)), err)]
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        self.client
            .put(&format!("user-groups/{id}"), request)
            .await
            .map_err(|e| e.for_resource("User group", id))
    }

    #[instrument(skip(self), fields(user_group_id = %abbrev_uuid(&id)), err)]
    async fn delete(&self, id: Self::Id) -> Result<Self::Response> {
        self.client
            .delete(&format!("user-groups/{id}"))
            .await
            .map_err(|e| e.for_resource("User group", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::user_groups::RegistrationStatus;
    use crate::errors::Error;
    use crate::test_utils::{test_client, user_group_json};
    use serde_json::json;
    use uuid::Uuid;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_sends_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/user-groups/"))
            .and(query_param("limit", "1000"))
            .and(query_param("province_code", "WC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                user_group_json(Uuid::new_v4(), "WC01", "WC"),
                user_group_json(Uuid::new_v4(), "WC02", "WC"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let groups = UserGroups::new(&client)
            .list(&UserGroupFilter::all(1000).with_province("WC"))
            .await
            .unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].user_group_code, "WC02");
    }

    #[tokio::test]
    async fn test_create_posts_body() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("POST"))
            .and(path("/api/v1/user-groups/"))
            .and(body_partial_json(json!({
                "user_group_code": "WC03",
                "user_group_type": "FIXED_DLTC",
                "registration_status": "REGISTERED"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(user_group_json(id, "WC03", "WC")))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let request = UserGroupCreate {
            user_group_code: "WC03".to_string(),
            user_group_name: "Western Cape DLTC".to_string(),
            user_group_type: UserGroupType::FixedDltc,
            province_code: "WC".to_string(),
            registration_status: RegistrationStatus::Registered,
            parent_group_id: None,
            contact_person: None,
            email: None,
            phone_number: None,
            fax_number: None,
            physical_address: None,
            postal_address: None,
            description: None,
        };
        let created = UserGroups::new(&client).create(&request).await.unwrap();
        assert_eq!(created.id, id);
    }

    #[tokio::test]
    async fn test_delete_is_soft() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        let mut body = user_group_json(id, "GP01", "GP");
        body["is_active"] = json!(false);
        Mock::given(method("DELETE"))
            .and(path(format!("/api/v1/user-groups/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let deleted = UserGroups::new(&client).delete(id).await.unwrap();
        assert!(!deleted.is_active);
    }

    #[tokio::test]
    async fn test_missing_group_is_named() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/user-groups/{id}")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found"})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = UserGroups::new(&client).get_by_id(id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { ref resource, .. } if resource == "User group"));
    }

    #[tokio::test]
    async fn test_validate_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/user-groups/validate-code/WC01"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"is_valid": false, "message": "Code already exists"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let answer = UserGroups::new(&client).validate_code("WC01").await.unwrap();
        assert!(!answer.is_valid);
    }
}
