use super::{FieldErrors, FormMode, contact_value, optional};
use crate::api::models::locations::{
    Address, InfrastructureType, LocationCreate, LocationResponse, LocationUpdate, OperationalStatus,
};
use crate::api::models::user_groups::UserGroupResponse;
use crate::console::codegen::{self, derive_name};
use crate::console::contact::ContactFields;
use crate::console::provinces::province_name;
use crate::console::validation;
use crate::errors::{Error, FieldError, Result};
use crate::types::{LocationId, UserGroupId};

/// Draft of a location.
#[derive(Debug, Clone)]
pub struct LocationForm {
    mode: FormMode<LocationId>,
    existing_codes: Vec<String>,
    user_group_id: Option<UserGroupId>,
    user_group_code: String,
    pub code: String,
    pub name: String,
    pub name_suffix: String,
    pub infrastructure_type: InfrastructureType,
    pub operational_status: OperationalStatus,
    pub address_line_1: String,
    pub address_line_2: String,
    pub address_line_3: String,
    pub city: String,
    pub postal_code: String,
    pub province_code: String,
    pub max_users: Option<u32>,
    pub max_daily_capacity: Option<u32>,
    pub contact: ContactFields,
    pub operating_hours: String,
    pub notes: String,
    pub is_active: bool,
    code_overridden: bool,
    name_overridden: bool,
}

impl LocationForm {
    pub fn create(infrastructure_type: InfrastructureType, existing: &[LocationResponse]) -> Self {
        Self {
            mode: FormMode::Create,
            existing_codes: existing.iter().map(|l| l.location_code.clone()).collect(),
            user_group_id: None,
            user_group_code: String::new(),
            code: String::new(),
            name: String::new(),
            name_suffix: String::new(),
            infrastructure_type,
            operational_status: OperationalStatus::default(),
            address_line_1: String::new(),
            address_line_2: String::new(),
            address_line_3: String::new(),
            city: String::new(),
            postal_code: String::new(),
            province_code: String::new(),
            max_users: None,
            max_daily_capacity: None,
            contact: ContactFields::default(),
            operating_hours: String::new(),
            notes: String::new(),
            is_active: true,
            code_overridden: false,
            name_overridden: false,
        }
    }

    pub fn edit(location: &LocationResponse) -> Self {
        let address = &location.address;
        let contact = ContactFields::manual(
            location.contact_person.as_deref(),
            location.contact_email.as_deref(),
            location.contact_phone.as_deref(),
        );
        Self {
            mode: FormMode::Edit(location.id),
            existing_codes: Vec::new(),
            user_group_id: Some(location.user_group_id),
            user_group_code: String::new(),
            code: location.location_code.clone(),
            name: location.location_name.clone(),
            name_suffix: String::new(),
            infrastructure_type: location.infrastructure_type,
            operational_status: location.operational_status,
            address_line_1: address.address_line_1.clone(),
            address_line_2: address.address_line_2.clone().unwrap_or_default(),
            address_line_3: address.address_line_3.clone().unwrap_or_default(),
            city: address.city.clone(),
            postal_code: address.postal_code.clone().unwrap_or_default(),
            province_code: address.province_code.clone(),
            max_users: location.max_users,
            max_daily_capacity: location.max_daily_capacity,
            contact,
            operating_hours: location.operating_hours.clone().unwrap_or_default(),
            notes: location.notes.clone().unwrap_or_default(),
            is_active: location.is_active,
            code_overridden: true,
            name_overridden: true,
        }
    }

    pub fn mode(&self) -> FormMode<LocationId> {
        self.mode
    }

    pub fn user_group_id(&self) -> Option<UserGroupId> {
        self.user_group_id
    }

    /// Attach the location to a user group; the group's province becomes the location's province.
    pub fn set_user_group(&mut self, group: &UserGroupResponse) -> Result<()> {
        self.user_group_id = Some(group.id);
        self.user_group_code = group.user_group_code.clone();
        self.province_code = group.province_code.clone();
        self.regenerate()
    }

    pub fn set_province(&mut self, province_code: &str) -> Result<()> {
        self.province_code = province_code.trim().to_uppercase();
        self.regenerate()
    }

    pub fn set_infrastructure_type(&mut self, infrastructure_type: InfrastructureType) -> Result<()> {
        self.infrastructure_type = infrastructure_type;
        self.regenerate()
    }

    pub fn set_name_suffix(&mut self, suffix: &str) -> Result<()> {
        self.name_suffix = suffix.to_string();
        self.regenerate()
    }

    pub fn set_code(&mut self, code: &str) -> Result<()> {
        self.code = code.trim().to_uppercase();
        self.code_overridden = !self.code.is_empty();
        self.regenerate()
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = name.trim().to_string();
        self.name_overridden = !self.name.is_empty();
        self.regenerate()
    }

    fn regenerate(&mut self) -> Result<()> {
        if !self.name_overridden && !self.province_code.is_empty() {
            let province = province_name(&self.province_code).unwrap_or(self.province_code.as_str());
            self.name = derive_name(self.infrastructure_type, province, Some(&self.name_suffix));
        }
        if self.mode.is_create() && !self.code_overridden && !self.user_group_code.is_empty() {
            self.code = codegen::location_code(&self.user_group_code, self.existing_codes.iter().map(String::as_str))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::default();
        if self.user_group_id.is_none() {
            errors.check("user_group_id", Err("Select a user group".to_string()));
        }
        if self.mode.is_create() {
            errors.check("location_code", validation::location_code(&self.code));
        }
        errors.check("location_name", validation::required(&self.name));
        errors.check("location_name", validation::max_length(&self.name, 200));
        errors.check("address_line_1", validation::required(&self.address_line_1));
        errors.check("city", validation::required(&self.city));
        errors.check("province_code", validation::required(&self.province_code));
        errors.check("postal_code", validation::postal_code(&self.postal_code));
        errors.check("contact_email", validation::email(contact_value(self.contact.email())));
        errors.check("contact_phone", validation::sa_phone(self.contact.phone(), false));
        if self.max_daily_capacity == Some(0) {
            errors.check("max_daily_capacity", Err("Capacity must be greater than zero".to_string()));
        }
        errors.into_result()
    }

    fn address(&self) -> Address {
        Address {
            address_line_1: self.address_line_1.trim().to_string(),
            address_line_2: optional(&self.address_line_2),
            address_line_3: optional(&self.address_line_3),
            city: self.city.trim().to_string(),
            postal_code: optional(&self.postal_code),
            province_code: self.province_code.clone(),
            country_code: "ZA".to_string(),
        }
    }

    pub fn to_create(&self) -> Result<LocationCreate> {
        self.validate()?;
        let user_group_id = self.user_group_id.ok_or_else(|| Error::Validation {
            errors: vec![FieldError::new("user_group_id", "Select a user group")],
        })?;
        Ok(LocationCreate {
            location_code: self.code.clone(),
            location_name: self.name.clone(),
            user_group_id,
            infrastructure_type: self.infrastructure_type,
            operational_status: self.operational_status,
            address: self.address(),
            max_users: self.max_users,
            max_daily_capacity: self.max_daily_capacity,
            contact_person: optional(self.contact.person()),
            contact_email: optional(self.contact.email()),
            contact_phone: optional(self.contact.phone()),
            contact_user_id: self.contact.selected_user(),
            operating_hours: optional(&self.operating_hours),
            notes: optional(&self.notes),
        })
    }

    pub fn to_update(&self) -> Result<LocationUpdate> {
        self.validate()?;
        let address = self.address();
        Ok(LocationUpdate {
            location_name: Some(self.name.clone()),
            infrastructure_type: Some(self.infrastructure_type),
            operational_status: Some(self.operational_status),
            address_line_1: Some(address.address_line_1),
            address_line_2: address.address_line_2,
            address_line_3: address.address_line_3,
            city: Some(address.city),
            postal_code: address.postal_code,
            province_code: Some(address.province_code),
            max_users: self.max_users,
            max_daily_capacity: self.max_daily_capacity,
            contact_person: optional(self.contact.person()),
            contact_email: optional(self.contact.email()),
            contact_phone: optional(self.contact.phone()),
            contact_user_id: self.contact.selected_user(),
            operating_hours: optional(&self.operating_hours),
            notes: optional(&self.notes),
            is_active: Some(self.is_active),
        })
    }
}
