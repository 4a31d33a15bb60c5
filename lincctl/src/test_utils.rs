//! Test utilities: clients pointed at a wiremock server and JSON fixtures shaped like the API.

use crate::api::ApiClient;
use crate::api::models::locations::{Address, InfrastructureType, LocationResponse, OperationalStatus};
use crate::api::models::user_groups::{RegistrationStatus, UserGroupResponse, UserGroupType};
use crate::config::ApiConfig;
use crate::types::{AssignmentId, LocationId, UserGroupId, UserId};
use serde_json::{Value, json};
use std::time::Duration;
use uuid::Uuid;
use wiremock::MockServer;

pub fn test_api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri().parse().expect("mock server uri is a valid url"),
        prefix: "/api/v1".to_string(),
        token: Some("test-token".to_string()),
        request_timeout: Duration::from_secs(5),
    }
}

pub fn test_client(server: &MockServer) -> ApiClient {
    ApiClient::new(&test_api_config(server)).expect("Failed to create test client")
}

pub fn user_group_json(id: UserGroupId, code: &str, province_code: &str) -> Value {
    json!({
        "id": id,
        "user_group_code": code,
        "user_group_name": format!("{code} DLTC"),
        "user_group_type": "FIXED_DLTC",
        "province_code": province_code,
        "registration_status": "REGISTERED",
        "is_active": true
    })
}

pub fn location_json(id: LocationId, user_group_id: UserGroupId, code: &str, province_code: &str) -> Value {
    json!({
        "id": id,
        "location_code": code,
        "location_name": format!("Centre {code}"),
        "user_group_id": user_group_id,
        "infrastructure_type": "FIXED_DLTC",
        "operational_status": "OPERATIONAL",
        "address_line_1": "1 Main Road",
        "city": "Cape Town",
        "province_code": province_code,
        "country_code": "ZA",
        "is_active": true
    })
}

pub fn user_json(id: UserId, username: &str, full_name: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "personal_details": {
            "full_name": full_name,
            "email": format!("{}@example.gov.za", username.to_lowercase()),
            "phone_number": "0821234567"
        },
        "user_type": "EXAMINER",
        "authority_level": "OFFICE",
        "status": "ACTIVE"
    })
}

pub fn assignment_json(id: AssignmentId, user_id: UserId, location_id: LocationId) -> Value {
    json!({
        "id": id,
        "user_id": user_id,
        "location_id": location_id,
        "assignment_type": "PRIMARY",
        "assignment_status": "ACTIVE",
        "effective_date": "2025-03-01",
        "can_view_reports": true
    })
}

/// In-memory user group for form and filter tests.
pub fn user_group(code: &str, province_code: &str, group_type: UserGroupType) -> UserGroupResponse {
    UserGroupResponse {
        id: Uuid::new_v4(),
        user_group_code: code.to_string(),
        user_group_name: format!("{code} authority"),
        user_group_type: group_type,
        province_code: province_code.to_string(),
        registration_status: RegistrationStatus::Registered,
        parent_group_id: None,
        contact_person: None,
        email: None,
        phone_number: None,
        fax_number: None,
        physical_address: None,
        postal_address: None,
        description: None,
        is_active: true,
        created_at: None,
        updated_at: None,
    }
}

/// In-memory location for form and filter tests.
pub fn location(code: &str, name: &str, province_code: &str) -> LocationResponse {
    LocationResponse {
        id: Uuid::new_v4(),
        location_code: code.to_string(),
        location_name: name.to_string(),
        user_group_id: Uuid::new_v4(),
        infrastructure_type: InfrastructureType::FixedDltc,
        operational_status: OperationalStatus::Operational,
        address: Address {
            address_line_1: "1 Main Road".to_string(),
            city: "Cape Town".to_string(),
            province_code: province_code.to_string(),
            country_code: "ZA".to_string(),
            ..Default::default()
        },
        max_users: None,
        max_daily_capacity: None,
        contact_person: None,
        contact_email: None,
        contact_phone: None,
        contact_user_id: None,
        operating_hours: None,
        notes: None,
        is_active: true,
        created_at: None,
        updated_at: None,
    }
}
