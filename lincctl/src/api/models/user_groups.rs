//! API request/response models for user groups (regional authorities).

use super::pagination::Pagination;
use crate::types::UserGroupId;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Kind of authority a user group represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserGroupType {
    FixedDltc,
    MobileDltc,
    PrintingCenter,
    RegisteringAuthority,
    ProvincialHelpDesk,
    NationalHelpDesk,
    NationalAdmin,
}

impl UserGroupType {
    pub const ALL: [UserGroupType; 7] = [
        Self::FixedDltc,
        Self::MobileDltc,
        Self::PrintingCenter,
        Self::RegisteringAuthority,
        Self::ProvincialHelpDesk,
        Self::NationalHelpDesk,
        Self::NationalAdmin,
    ];

    /// Wire value, as used in filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedDltc => "FIXED_DLTC",
            Self::MobileDltc => "MOBILE_DLTC",
            Self::PrintingCenter => "PRINTING_CENTER",
            Self::RegisteringAuthority => "REGISTERING_AUTHORITY",
            Self::ProvincialHelpDesk => "PROVINCIAL_HELP_DESK",
            Self::NationalHelpDesk => "NATIONAL_HELP_DESK",
            Self::NationalAdmin => "NATIONAL_ADMIN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FixedDltc => "Fixed DLTC",
            Self::MobileDltc => "Mobile DLTC",
            Self::PrintingCenter => "Printing Centre",
            Self::RegisteringAuthority => "Registering Authority",
            Self::ProvincialHelpDesk => "Provincial Help Desk",
            Self::NationalHelpDesk => "National Help Desk",
            Self::NationalAdmin => "National Admin Office",
        }
    }

    /// National authorities are not tied to a single province's name.
    pub fn is_national(&self) -> bool {
        matches!(self, Self::NationalHelpDesk | Self::NationalAdmin)
    }
}

/// Registration state of an authority with the department.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    #[default]
    Registered,
    PendingRegistration,
    Suspended,
    Cancelled,
    Deregistered,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "REGISTERED",
            Self::PendingRegistration => "PENDING_REGISTRATION",
            Self::Suspended => "SUSPENDED",
            Self::Cancelled => "CANCELLED",
            Self::Deregistered => "DEREGISTERED",
        }
    }
}

/// Query parameters for `GET /user-groups/`
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListUserGroupsQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub province_code: Option<String>,
    pub user_group_type: Option<UserGroupType>,
    pub is_active: Option<bool>,
}

/// Request body for creating a user group.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGroupCreate {
    pub user_group_code: String,
    pub user_group_name: String,
    pub user_group_type: UserGroupType,
    pub province_code: String,
    pub registration_status: RegistrationStatus,
    pub parent_group_id: Option<UserGroupId>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub fax_number: Option<String>,
    pub physical_address: Option<String>,
    pub postal_address: Option<String>,
    pub description: Option<String>,
}

/// Request body for updating a user group. Only provided fields are changed.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserGroupUpdate {
    pub user_group_name: Option<String>,
    pub user_group_type: Option<UserGroupType>,
    pub province_code: Option<String>,
    pub registration_status: Option<RegistrationStatus>,
    pub parent_group_id: Option<UserGroupId>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub fax_number: Option<String>,
    pub physical_address: Option<String>,
    pub postal_address: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Full user group details returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGroupResponse {
    pub id: UserGroupId,
    pub user_group_code: String,
    pub user_group_name: String,
    pub user_group_type: UserGroupType,
    pub province_code: String,
    #[serde(default)]
    pub registration_status: RegistrationStatus,
    #[serde(default)]
    pub parent_group_id: Option<UserGroupId>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub fax_number: Option<String>,
    #[serde(default)]
    pub physical_address: Option<String>,
    #[serde(default)]
    pub postal_address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

pub(crate) fn default_true() -> bool {
    true
}
