//! API request/response models for staff assignments (user ↔ location links).

use crate::types::{AssignmentId, LocationId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentType {
    #[default]
    Primary,
    Secondary,
    Temporary,
}

impl AssignmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "PRIMARY",
            Self::Secondary => "SECONDARY",
            Self::Temporary => "TEMPORARY",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
    Pending,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Pending => "PENDING",
        }
    }
}

/// What an assigned staff member may do at the location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentCapabilities {
    pub can_manage_location: bool,
    pub can_assign_others: bool,
    pub can_view_reports: bool,
    pub can_manage_resources: bool,
}

/// Request body for `POST /locations/{location_id}/staff`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffAssignmentCreate {
    pub user_id: UserId,
    pub location_id: LocationId,
    pub assignment_type: AssignmentType,
    pub assignment_status: AssignmentStatus,
    pub effective_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub capabilities: AssignmentCapabilities,
    pub work_schedule: Option<String>,
    pub responsibilities: Option<String>,
    pub notes: Option<String>,
}

/// Request body for `PUT /locations/{location_id}/staff/{assignment_id}`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffAssignmentUpdate {
    pub assignment_type: Option<AssignmentType>,
    pub assignment_status: Option<AssignmentStatus>,
    pub effective_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub can_manage_location: Option<bool>,
    pub can_assign_others: Option<bool>,
    pub can_view_reports: Option<bool>,
    pub can_manage_resources: Option<bool>,
    pub work_schedule: Option<String>,
    pub responsibilities: Option<String>,
    pub notes: Option<String>,
}

/// Assignment as returned by the API, with display names joined in where the server provides them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffAssignmentResponse {
    pub id: AssignmentId,
    pub user_id: UserId,
    pub location_id: LocationId,
    pub assignment_type: AssignmentType,
    #[serde(default)]
    pub assignment_status: AssignmentStatus,
    pub effective_date: NaiveDate,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub capabilities: AssignmentCapabilities,
    #[serde(default)]
    pub work_schedule: Option<String>,
    #[serde(default)]
    pub responsibilities: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub user_full_name: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl StaffAssignmentResponse {
    /// Whether the assignment is in force on `date`.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.assignment_status == AssignmentStatus::Active
            && self.effective_date <= date
            && self.expiry_date.is_none_or(|expiry| date <= expiry)
    }
}
