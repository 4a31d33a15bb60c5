//! API request/response models for locations (testing centres and offices).

use super::pagination::Pagination;
use super::user_groups::default_true;
use crate::types::{LocationId, ResourceId, UserGroupId, UserId};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Physical or functional kind of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InfrastructureType {
    FixedDltc,
    MobileDltc,
    PrintingCenter,
    RegisteringAuthority,
    ProvincialHelpDesk,
    NationalHelpDesk,
    AdminOffice,
}

impl InfrastructureType {
    pub const ALL: [InfrastructureType; 7] = [
        Self::FixedDltc,
        Self::MobileDltc,
        Self::PrintingCenter,
        Self::RegisteringAuthority,
        Self::ProvincialHelpDesk,
        Self::NationalHelpDesk,
        Self::AdminOffice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedDltc => "FIXED_DLTC",
            Self::MobileDltc => "MOBILE_DLTC",
            Self::PrintingCenter => "PRINTING_CENTER",
            Self::RegisteringAuthority => "REGISTERING_AUTHORITY",
            Self::ProvincialHelpDesk => "PROVINCIAL_HELP_DESK",
            Self::NationalHelpDesk => "NATIONAL_HELP_DESK",
            Self::AdminOffice => "ADMIN_OFFICE",
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
            Self::AdminOffice => "Admin Office",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationalStatus {
    #[default]
    Operational,
    Maintenance,
    Suspended,
    Closed,
    Planning,
}

impl OperationalStatus {
    pub const ALL: [OperationalStatus; 5] = [
        Self::Operational,
        Self::Maintenance,
        Self::Suspended,
        Self::Closed,
        Self::Planning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operational => "OPERATIONAL",
            Self::Maintenance => "MAINTENANCE",
            Self::Suspended => "SUSPENDED",
            Self::Closed => "CLOSED",
            Self::Planning => "PLANNING",
        }
    }
}

/// Street address block shared by create, update and response bodies.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address_line_1: String,
    #[serde(default)]
    pub address_line_2: Option<String>,
    #[serde(default)]
    pub address_line_3: Option<String>,
    pub city: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    pub province_code: String,
    #[serde(default = "default_country")]
    pub country_code: String,
}

fn default_country() -> String {
    "ZA".to_string()
}

/// Query parameters for `GET /locations/`
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListLocationsQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub user_group_id: Option<UserGroupId>,
    pub province_code: Option<String>,
    pub infrastructure_type: Option<InfrastructureType>,
    pub operational_status: Option<OperationalStatus>,
}

/// Request body for creating a location.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCreate {
    pub location_code: String,
    pub location_name: String,
    pub user_group_id: UserGroupId,
    pub infrastructure_type: InfrastructureType,
    pub operational_status: OperationalStatus,
    #[serde(flatten)]
    pub address: Address,
    pub max_users: Option<u32>,
    pub max_daily_capacity: Option<u32>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_user_id: Option<UserId>,
    pub operating_hours: Option<String>,
    pub notes: Option<String>,
}

/// Request body for updating a location. Only provided fields are changed.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub location_name: Option<String>,
    pub infrastructure_type: Option<InfrastructureType>,
    pub operational_status: Option<OperationalStatus>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub address_line_3: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub province_code: Option<String>,
    pub max_users: Option<u32>,
    pub max_daily_capacity: Option<u32>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_user_id: Option<UserId>,
    pub operating_hours: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// Full location details returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResponse {
    pub id: LocationId,
    pub location_code: String,
    pub location_name: String,
    pub user_group_id: UserGroupId,
    pub infrastructure_type: InfrastructureType,
    #[serde(default)]
    pub operational_status: OperationalStatus,
    #[serde(flatten)]
    pub address: Address,
    #[serde(default)]
    pub max_users: Option<u32>,
    #[serde(default)]
    pub max_daily_capacity: Option<u32>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_user_id: Option<UserId>,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Equipment or room attached to a location (`GET /locations/{id}/resources`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResource {
    pub id: ResourceId,
    pub location_id: LocationId,
    pub resource_type: String,
    pub resource_name: String,
    #[serde(default)]
    pub resource_code: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_address_is_flattened() {
        let location: LocationResponse = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "location_code": "WC01L001",
            "location_name": "Western Cape DLTC",
            "user_group_id": "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "infrastructure_type": "FIXED_DLTC",
            "operational_status": "MAINTENANCE",
            "address_line_1": "1 Main Road",
            "city": "Cape Town",
            "province_code": "WC",
            "max_daily_capacity": 120
        }))
        .unwrap();

        assert_eq!(location.address.city, "Cape Town");
        assert_eq!(location.address.country_code, "ZA");
        assert_eq!(location.operational_status, OperationalStatus::Maintenance);
        assert_eq!(location.max_daily_capacity, Some(120));
        assert!(location.is_active);
    }
}
