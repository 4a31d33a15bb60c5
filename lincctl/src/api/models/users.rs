//! API request/response models for users.
//!
//! The backend has served personal details in both snake_case and camelCase over time. Both
//! shapes are accepted here, once, via serde aliases, so the rest of the console only ever sees
//! the canonical [`PersonalDetails`].

use super::pagination::PageQuery;
use crate::types::{UserGroupId, UserId};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    #[default]
    Standard,
    Examiner,
    Supervisor,
    Admin,
    System,
}

impl UserType {
    pub const ALL: [UserType; 5] = [Self::Standard, Self::Examiner, Self::Supervisor, Self::Admin, Self::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Examiner => "EXAMINER",
            Self::Supervisor => "SUPERVISOR",
            Self::Admin => "ADMIN",
            Self::System => "SYSTEM",
        }
    }
}

/// Scope of a user's authority, from the whole country down to their own records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorityLevel {
    National,
    Provincial,
    Regional,
    Office,
    #[default]
    Personal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Suspended,
    Inactive,
    Locked,
    #[default]
    PendingActivation,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Inactive => "INACTIVE",
            Self::Locked => "LOCKED",
            Self::PendingActivation => "PENDING_ACTIVATION",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdType {
    #[default]
    RsaId,
    Passport,
    ForeignId,
}

/// Named capabilities granted to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    CreateUsers,
    ManageUserGroups,
    ManageLocations,
    AssignStaff,
    ConductTests,
    ApproveApplications,
    ViewReports,
    SystemAdministration,
}

impl Privilege {
    pub const ALL: [Privilege; 8] = [
        Self::CreateUsers,
        Self::ManageUserGroups,
        Self::ManageLocations,
        Self::AssignStaff,
        Self::ConductTests,
        Self::ApproveApplications,
        Self::ViewReports,
        Self::SystemAdministration,
    ];
}

/// Canonical personal details.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalDetails {
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "lastName", alias = "surname")]
    pub last_name: Option<String>,
    #[serde(alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(alias = "emailAddress")]
    pub email: Option<String>,
    #[serde(alias = "phoneNumber", alias = "phone")]
    pub phone_number: Option<String>,
    #[serde(alias = "idType")]
    pub id_type: Option<IdType>,
    #[serde(alias = "idNumber")]
    pub id_number: Option<String>,
}

impl PersonalDetails {
    /// Full name if the server sent one, otherwise first and last name joined.
    pub fn display_name(&self) -> Option<String> {
        if let Some(full) = self.full_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            return Some(full.to_string());
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() { None } else { Some(parts.join(" ")) }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeographicAssignment {
    #[serde(alias = "countryCode")]
    pub country_code: Option<String>,
    #[serde(alias = "provinceCode")]
    pub province_code: Option<String>,
    pub region: Option<String>,
}

/// Query parameters for `GET /users/`
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListUsersQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub search: Option<String>,
    pub status: Option<UserStatus>,
    pub user_type: Option<UserType>,
    pub user_group_id: Option<UserGroupId>,
}

/// Request body for creating a user.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub user_group_id: Option<UserGroupId>,
    pub personal_details: PersonalDetails,
    pub geographic_assignment: GeographicAssignment,
    pub user_type: UserType,
    pub authority_level: AuthorityLevel,
    pub status: UserStatus,
    pub password: Option<String>,
    pub require_password_change: bool,
    pub require_2fa: bool,
    pub privileges: BTreeSet<Privilege>,
}

/// Request body for updating a user. Only provided fields are changed.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub personal_details: Option<PersonalDetails>,
    pub geographic_assignment: Option<GeographicAssignment>,
    pub user_type: Option<UserType>,
    pub authority_level: Option<AuthorityLevel>,
    pub status: Option<UserStatus>,
    pub require_password_change: Option<bool>,
    pub require_2fa: Option<bool>,
    pub privileges: Option<BTreeSet<Privilege>>,
}

/// Full user details returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    #[serde(default, alias = "userGroupId")]
    pub user_group_id: Option<UserGroupId>,
    #[serde(default, alias = "personalDetails")]
    pub personal_details: PersonalDetails,
    #[serde(default, alias = "geographicAssignment")]
    pub geographic_assignment: GeographicAssignment,
    #[serde(default, alias = "userType")]
    pub user_type: UserType,
    #[serde(default, alias = "authorityLevel")]
    pub authority_level: AuthorityLevel,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, alias = "requirePasswordChange")]
    pub require_password_change: bool,
    #[serde(default, alias = "require2fa", alias = "require2FA")]
    pub require_2fa: bool,
    #[serde(default)]
    pub privileges: BTreeSet<Privilege>,
    #[serde(default, alias = "lastLogin")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Compact user record used by search results and contact pickers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    #[serde(default, alias = "personalDetails")]
    pub personal_details: PersonalDetails,
    #[serde(default)]
    pub status: Option<UserStatus>,
}

impl From<UserResponse> for UserSummary {
    fn from(user: UserResponse) -> Self {
        Self {
            id: user.id,
            username: user.username,
            personal_details: user.personal_details,
            status: Some(user.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snake_case_personal_details() {
        let user: UserSummary = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "username": "WC01001",
            "personal_details": {
                "full_name": "Jane Doe",
                "email": "jane@example.gov.za",
                "phone_number": "0821234567"
            }
        }))
        .unwrap();

        assert_eq!(user.personal_details.display_name().as_deref(), Some("Jane Doe"));
        assert_eq!(user.personal_details.phone_number.as_deref(), Some("0821234567"));
    }

    #[test]
    fn test_camel_case_personal_details() {
        let user: UserSummary = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "username": "WC01001",
            "personalDetails": {
                "firstName": "Jane",
                "lastName": "Doe",
                "emailAddress": "jane@example.gov.za",
                "phoneNumber": "0821234567"
            }
        }))
        .unwrap();

        assert_eq!(user.personal_details.display_name().as_deref(), Some("Jane Doe"));
        assert_eq!(user.personal_details.email.as_deref(), Some("jane@example.gov.za"));
    }

    #[test]
    fn test_display_name_missing() {
        let details = PersonalDetails {
            full_name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(details.display_name(), None);
    }

    #[test]
    fn test_privileges_serialize_as_snake_case_list() {
        let privileges: BTreeSet<Privilege> = [Privilege::ViewReports, Privilege::ConductTests].into_iter().collect();
        assert_eq!(serde_json::to_value(privileges).unwrap(), json!(["conduct_tests", "view_reports"]));
    }

    #[test]
    fn test_minimal_user_response() {
        let user: UserResponse = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "username": "GP02001",
            "status": "LOCKED"
        }))
        .unwrap();
        assert_eq!(user.status, UserStatus::Locked);
        assert_eq!(user.user_type, UserType::Standard);
        assert!(user.privileges.is_empty());
    }
}
