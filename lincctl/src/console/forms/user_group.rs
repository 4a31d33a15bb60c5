use super::{FieldErrors, FormMode, contact_value, optional};
use crate::api::models::user_groups::{RegistrationStatus, UserGroupCreate, UserGroupResponse, UserGroupType, UserGroupUpdate};
use crate::console::codegen::{self, derive_name};
use crate::console::contact::ContactFields;
use crate::console::provinces::province_name;
use crate::console::validation;
use crate::errors::Result;
use crate::types::UserGroupId;

/// Draft of a user group.
#[derive(Debug, Clone)]
pub struct UserGroupForm {
    mode: FormMode<UserGroupId>,
    existing_codes: Vec<String>,
    pub code: String,
    pub name: String,
    pub name_suffix: String,
    pub group_type: UserGroupType,
    pub province_code: String,
    pub registration_status: RegistrationStatus,
    pub parent_group_id: Option<UserGroupId>,
    pub contact: ContactFields,
    pub fax_number: String,
    pub physical_address: String,
    pub postal_address: String,
    pub description: String,
    pub is_active: bool,
    code_overridden: bool,
    name_overridden: bool,
}

impl UserGroupForm {
    /// Empty create form. `existing` is the list already loaded by the page, used to pick a free code.
    pub fn create(group_type: UserGroupType, existing: &[UserGroupResponse]) -> Self {
        Self {
            mode: FormMode::Create,
            existing_codes: existing.iter().map(|g| g.user_group_code.clone()).collect(),
            code: String::new(),
            name: String::new(),
            name_suffix: String::new(),
            group_type,
            province_code: String::new(),
            registration_status: RegistrationStatus::default(),
            parent_group_id: None,
            contact: ContactFields::default(),
            fax_number: String::new(),
            physical_address: String::new(),
            postal_address: String::new(),
            description: String::new(),
            is_active: true,
            code_overridden: false,
            name_overridden: false,
        }
    }

    /// Edit form for an existing group. Code and name are kept as stored.
    pub fn edit(group: &UserGroupResponse) -> Self {
        Self {
            mode: FormMode::Edit(group.id),
            existing_codes: Vec::new(),
            code: group.user_group_code.clone(),
            name: group.user_group_name.clone(),
            name_suffix: String::new(),
            group_type: group.user_group_type,
            province_code: group.province_code.clone(),
            registration_status: group.registration_status,
            parent_group_id: group.parent_group_id,
            contact: ContactFields::manual(
                group.contact_person.as_deref(),
                group.email.as_deref(),
                group.phone_number.as_deref(),
            ),
            fax_number: group.fax_number.clone().unwrap_or_default(),
            physical_address: group.physical_address.clone().unwrap_or_default(),
            postal_address: group.postal_address.clone().unwrap_or_default(),
            description: group.description.clone().unwrap_or_default(),
            is_active: group.is_active,
            code_overridden: true,
            name_overridden: true,
        }
    }

    pub fn mode(&self) -> FormMode<UserGroupId> {
        self.mode
    }

    /// Change the province and regenerate whatever the operator has not overridden.
    pub fn set_province(&mut self, province_code: &str) -> Result<()> {
        self.province_code = province_code.trim().to_uppercase();
        self.regenerate()
    }

    pub fn set_group_type(&mut self, group_type: UserGroupType) -> Result<()> {
        self.group_type = group_type;
        self.regenerate()
    }

    pub fn set_name_suffix(&mut self, suffix: &str) -> Result<()> {
        self.name_suffix = suffix.to_string();
        self.regenerate()
    }

    /// Operator-typed code. An empty value hands the field back to the generator.
    pub fn set_code(&mut self, code: &str) -> Result<()> {
        self.code = code.trim().to_uppercase();
        self.code_overridden = !self.code.is_empty();
        self.regenerate()
    }

    /// Operator-typed name. An empty value hands the field back to the generator.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = name.trim().to_string();
        self.name_overridden = !self.name.is_empty();
        self.regenerate()
    }

    fn regenerate(&mut self) -> Result<()> {
        if self.province_code.is_empty() {
            return Ok(());
        }
        if !self.name_overridden {
            let province = province_name(&self.province_code).unwrap_or(self.province_code.as_str());
            self.name = derive_name(self.group_type, province, Some(&self.name_suffix));
        }
        if self.mode.is_create() && !self.code_overridden {
            self.code = codegen::user_group_code(&self.province_code, self.existing_codes.iter().map(String::as_str))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::default();
        if self.mode.is_create() {
            errors.check("user_group_code", validation::user_group_code(&self.code));
        }
        errors.check("user_group_name", validation::required(&self.name));
        errors.check("user_group_name", validation::max_length(&self.name, 200));
        errors.check("province_code", validation::required(&self.province_code));
        errors.check("email", validation::email(contact_value(self.contact.email())));
        errors.check("phone_number", validation::sa_phone(self.contact.phone(), false));
        errors.check("fax_number", validation::sa_phone(&self.fax_number, false));
        errors.into_result()
    }

    pub fn to_create(&self) -> Result<UserGroupCreate> {
        self.validate()?;
        Ok(UserGroupCreate {
            user_group_code: self.code.clone(),
            user_group_name: self.name.clone(),
            user_group_type: self.group_type,
            province_code: self.province_code.clone(),
            registration_status: self.registration_status,
            parent_group_id: self.parent_group_id,
            contact_person: optional(self.contact.person()),
            email: optional(self.contact.email()),
            phone_number: optional(self.contact.phone()),
            fax_number: optional(&self.fax_number),
            physical_address: optional(&self.physical_address),
            postal_address: optional(&self.postal_address),
            description: optional(&self.description),
        })
    }

    /// Full replacement of the editable fields.
    pub fn to_update(&self) -> Result<UserGroupUpdate> {
        self.validate()?;
        Ok(UserGroupUpdate {
            user_group_name: Some(self.name.clone()),
            user_group_type: Some(self.group_type),
            province_code: Some(self.province_code.clone()),
            registration_status: Some(self.registration_status),
            parent_group_id: self.parent_group_id,
            contact_person: optional(self.contact.person()),
            email: optional(self.contact.email()),
            phone_number: optional(self.contact.phone()),
            fax_number: optional(&self.fax_number),
            physical_address: optional(&self.physical_address),
            postal_address: optional(&self.postal_address),
            description: optional(&self.description),
            is_active: Some(self.is_active),
        })
    }
}
