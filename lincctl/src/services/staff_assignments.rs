//! Service for staff assignments, nested under `/locations/{id}/staff` and `/users/{id}/locations`.
//!
//! Two operations are known gaps: there is no endpoint for "every assignment across all
//! locations", and none for fetching a single assignment by id. [`StaffAssignments::list_all`]
//! returns an empty list and [`StaffAssignments::get_by_id`] returns [`Error::NotImplemented`].

use crate::api::ApiClient;
use crate::api::models::staff_assignments::{StaffAssignmentCreate, StaffAssignmentResponse, StaffAssignmentUpdate};
use crate::errors::{Error, FieldError, Result};
use crate::types::{AssignmentId, LocationId, UserId, abbrev_uuid};
use tracing::{instrument, warn};

pub struct StaffAssignments<'c> {
    client: &'c ApiClient,
}

impl<'c> StaffAssignments<'c> {
    pub fn new(client: &'c ApiClient) -> Self {
        Self { client }
    }

    /// Staff assigned to one location.
    #[instrument(skip(self), fields(location_id = %abbrev_uuid(&location_id)), err)]
    pub async fn list_for_location(&self, location_id: LocationId) -> Result<Vec<StaffAssignmentResponse>> {
        self.client
            .get(&format!("locations/{location_id}/staff"))
            .await
            .map_err(|e| e.for_resource("Location", location_id))
    }

    /// Locations one user is assigned to.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<StaffAssignmentResponse>> {
        self.client
            .get(&format!("users/{user_id}/locations"))
            .await
            .map_err(|e| e.for_resource("User", user_id))
    }

    /// Every assignment in the system. The API has no such endpoint yet, so this is always empty.
    pub async fn list_all(&self) -> Result<Vec<StaffAssignmentResponse>> {
        warn!("Loading all staff assignments is not supported by the API; returning an empty list");
        Ok(Vec::new())
    }

    /// Single assignment lookup. Not supported by the API yet.
    pub async fn get_by_id(&self, id: AssignmentId) -> Result<StaffAssignmentResponse> {
        warn!(assignment_id = %abbrev_uuid(&id), "Loading a single staff assignment is not supported");
        Err(Error::NotImplemented {
            feature: "Loading a staff assignment by ID".to_string(),
        })
    }

    #[instrument(skip(self, request), fields(location_id = %abbrev_uuid(&request.location_id), user_id = %abbrev_uuid(&request.user_id)), err)]
    pub async fn assign(&self, request: &StaffAssignmentCreate) -> Result<StaffAssignmentResponse> {
        if let Some(expiry) = request.expiry_date
            && expiry < request.effective_date
        {
            return Err(Error::Validation {
                errors: vec![FieldError::new("expiry_date", "Expiry date cannot be before the effective date")],
            });
        }
        self.client
            .post(&format!("locations/{}/staff", request.location_id), request)
            .await
    }

    #[instrument(skip(self, request), fields(location_id = %abbrev_uuid(&location_id), assignment_id = %abbrev_uuid(&id)), err)]
    pub async fn update(
        &self,
        location_id: LocationId,
        id: AssignmentId,
        request: &StaffAssignmentUpdate,
    ) -> Result<StaffAssignmentResponse> {
        self.client
            .put(&format!("locations/{location_id}/staff/{id}"), request)
            .await
            .map_err(|e| e.for_resource("Staff assignment", id))
    }

    #[instrument(skip(self), fields(location_id = %abbrev_uuid(&location_id), assignment_id = %abbrev_uuid(&id)), err)]
    pub async fn remove(&self, location_id: LocationId, id: AssignmentId) -> Result<StaffAssignmentResponse> {
        self.client
            .delete(&format!("locations/{location_id}/staff/{id}"))
            .await
            .map_err(|e| e.for_resource("Staff assignment", id))
    }
}
