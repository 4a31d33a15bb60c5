//! Five-step user creation wizard.
//!
//! The steps and the fields each one owns are a single table, [`STEP_FIELDS`]. Moving forward
//! validates the current step's fields with the same per-field validator that `submit` runs over
//! every step, so a field cannot pass one check and fail the other.
//!
//! Privilege defaults follow the user type. Privileges the operator toggled by hand are remembered
//! and kept when the type changes, unless a full reset is requested.

use std::collections::BTreeSet;

use crate::api::models::user_groups::UserGroupResponse;
use crate::api::models::users::{
    AuthorityLevel, GeographicAssignment, IdType, PersonalDetails, Privilege, UserCreate, UserResponse, UserStatus,
    UserType,
};
use crate::console::codegen;
use crate::console::forms::{FieldErrors, optional};
use crate::console::validation::{self, FieldResult};
use crate::errors::{Error, FieldError, Result};
use crate::types::UserGroupId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    BasicInfo,
    WorkAssignment,
    Security,
    Privileges,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        Self::BasicInfo,
        Self::WorkAssignment,
        Self::Security,
        Self::Privileges,
        Self::Review,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Info",
            Self::WorkAssignment => "Work Assignment",
            Self::Security => "Security",
            Self::Privileges => "Privileges",
            Self::Review => "Review",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardField {
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    IdNumber,
    UserGroup,
    Username,
    ProvinceCode,
    Password,
    ConfirmPassword,
    Privileges,
}

impl WizardField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
            Self::IdNumber => "id_number",
            Self::UserGroup => "user_group_id",
            Self::Username => "username",
            Self::ProvinceCode => "province_code",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm_password",
            Self::Privileges => "privileges",
        }
    }
}

/// Which fields each step validates before the operator may move on.
pub const STEP_FIELDS: [(WizardStep, &[WizardField]); 5] = [
    (
        WizardStep::BasicInfo,
        &[
            WizardField::FirstName,
            WizardField::LastName,
            WizardField::Email,
            WizardField::PhoneNumber,
            WizardField::IdNumber,
        ],
    ),
    (
        WizardStep::WorkAssignment,
        &[WizardField::UserGroup, WizardField::Username, WizardField::ProvinceCode],
    ),
    (WizardStep::Security, &[WizardField::Password, WizardField::ConfirmPassword]),
    (WizardStep::Privileges, &[WizardField::Privileges]),
    (WizardStep::Review, &[]),
];

fn fields_of(step: WizardStep) -> &'static [WizardField] {
    STEP_FIELDS
        .iter()
        .find(|(s, _)| *s == step)
        .map(|(_, fields)| *fields)
        .unwrap_or(&[])
}

/// Privileges a new user of `user_type` starts with.
pub fn default_privileges(user_type: UserType) -> BTreeSet<Privilege> {
    use Privilege::*;
    let privileges: &[Privilege] = match user_type {
        UserType::Standard => &[ViewReports],
        UserType::Examiner => &[ConductTests, ViewReports],
        UserType::Supervisor => &[ConductTests, ApproveApplications, AssignStaff, ViewReports],
        UserType::Admin => &[
            CreateUsers,
            ManageUserGroups,
            ManageLocations,
            AssignStaff,
            ApproveApplications,
            ViewReports,
        ],
        UserType::System => &Privilege::ALL,
    };
    privileges.iter().copied().collect()
}

/// What to do with hand-toggled privileges when the user type changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrivilegeReset {
    #[default]
    KeepOverrides,
    /// Replace every privilege with the new type's defaults and forget the overrides.
    Overwrite,
}

/// Everything the wizard collects apart from privileges.
#[derive(Debug, Clone, Default)]
pub struct UserDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub id_type: IdType,
    pub id_number: String,
    pub user_group_id: Option<UserGroupId>,
    pub username: String,
    pub province_code: String,
    pub region: String,
    pub user_type: UserType,
    pub authority_level: AuthorityLevel,
    pub status: UserStatus,
    pub password: String,
    pub confirm_password: String,
    pub require_password_change: bool,
    pub require_2fa: bool,
}

#[derive(Debug, Clone)]
pub struct UserWizard {
    step: WizardStep,
    pub draft: UserDraft,
    existing_usernames: Vec<String>,
    user_group_code: String,
    username_overridden: bool,
    privileges: BTreeSet<Privilege>,
    overridden: BTreeSet<Privilege>,
}

impl UserWizard {
    /// `existing` is the user list already loaded, used to pick a free username.
    pub fn new(existing: &[UserResponse]) -> Self {
        let draft = UserDraft {
            require_password_change: true,
            ..Default::default()
        };
        Self {
            step: WizardStep::BasicInfo,
            privileges: default_privileges(draft.user_type),
            draft,
            existing_usernames: existing.iter().map(|u| u.username.clone()).collect(),
            user_group_code: String::new(),
            username_overridden: false,
            overridden: BTreeSet::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn privileges(&self) -> &BTreeSet<Privilege> {
        &self.privileges
    }

    /// Privileges the operator has toggled by hand.
    pub fn overridden(&self) -> &BTreeSet<Privilege> {
        &self.overridden
    }

    /// Pick the user group; the username is regenerated unless the operator typed one.
    pub fn set_user_group(&mut self, group: &UserGroupResponse) -> Result<()> {
        self.draft.user_group_id = Some(group.id);
        self.draft.province_code = group.province_code.clone();
        self.user_group_code = group.user_group_code.clone();
        if !self.username_overridden {
            self.draft.username =
                codegen::username(&self.user_group_code, self.existing_usernames.iter().map(String::as_str))?;
        }
        Ok(())
    }

    /// Operator-typed username. Empty hands it back to the generator.
    pub fn set_username(&mut self, username: &str) -> Result<()> {
        self.draft.username = username.trim().to_string();
        self.username_overridden = !self.draft.username.is_empty();
        if !self.username_overridden && !self.user_group_code.is_empty() {
            self.draft.username =
                codegen::username(&self.user_group_code, self.existing_usernames.iter().map(String::as_str))?;
        }
        Ok(())
    }

    /// Change the user type and recompute privilege defaults.
    ///
    /// Returns the overridden privileges whose hand-set value differs from the new default, so a
    /// front end can ask whether to keep them.
    pub fn set_user_type(&mut self, user_type: UserType, reset: PrivilegeReset) -> Vec<Privilege> {
        self.draft.user_type = user_type;
        let defaults = default_privileges(user_type);

        let conflicts: Vec<Privilege> = self
            .overridden
            .iter()
            .copied()
            .filter(|p| self.privileges.contains(p) != defaults.contains(p))
            .collect();

        match reset {
            PrivilegeReset::Overwrite => {
                self.privileges = defaults;
                self.overridden.clear();
            }
            PrivilegeReset::KeepOverrides => {
                for privilege in Privilege::ALL {
                    if self.overridden.contains(&privilege) {
                        continue;
                    }
                    if defaults.contains(&privilege) {
                        self.privileges.insert(privilege);
                    } else {
                        self.privileges.remove(&privilege);
                    }
                }
            }
        }
        conflicts
    }

    pub fn set_privilege(&mut self, privilege: Privilege, granted: bool) {
        if granted {
            self.privileges.insert(privilege);
        } else {
            self.privileges.remove(&privilege);
        }
        self.overridden.insert(privilege);
    }

    pub fn validate_field(&self, field: WizardField) -> FieldResult {
        let d = &self.draft;
        match field {
            WizardField::FirstName => validation::required(&d.first_name)
                .and_then(|_| validation::max_length(&d.first_name, 100)),
            WizardField::LastName => validation::required(&d.last_name)
                .and_then(|_| validation::max_length(&d.last_name, 100)),
            WizardField::Email => validation::required(&d.email).and_then(|_| validation::email(&d.email)),
            WizardField::PhoneNumber => validation::sa_phone(&d.phone_number, false),
            WizardField::IdNumber => match d.id_type {
                IdType::RsaId => validation::rsa_id_number(&d.id_number),
                IdType::Passport | IdType::ForeignId => validation::required(&d.id_number),
            },
            WizardField::UserGroup => match d.user_group_id {
                Some(_) => Ok(()),
                None => Err("Select a user group".to_string()),
            },
            WizardField::Username => validation::username(&d.username),
            WizardField::ProvinceCode => validation::required(&d.province_code),
            WizardField::Password => validation::password(&d.password),
            WizardField::ConfirmPassword => {
                if d.password == d.confirm_password {
                    Ok(())
                } else {
                    Err("Passwords do not match".to_string())
                }
            }
            WizardField::Privileges => {
                if self.privileges.is_empty() {
                    Err("Grant at least one privilege".to_string())
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn validate_step(&self, step: WizardStep) -> Result<()> {
        let mut errors = FieldErrors::default();
        for field in fields_of(step) {
            errors.check(field.name(), self.validate_field(*field));
        }
        errors.into_result()
    }

    /// Advance if the current step validates. At Review this is a no-op.
    pub fn next(&mut self) -> Result<WizardStep> {
        self.validate_step(self.step)?;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Go back one step. Never fails; at the first step this is a no-op.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Validate everything and build the create request. Only allowed from Review.
    pub fn submit(&self) -> Result<UserCreate> {
        if self.step != WizardStep::Review {
            return Err(Error::Validation {
                errors: vec![FieldError::new("step", "Complete every step before submitting")],
            });
        }
        let mut errors = FieldErrors::default();
        for (_, fields) in STEP_FIELDS.iter() {
            for field in fields.iter() {
                errors.check(field.name(), self.validate_field(*field));
            }
        }
        errors.into_result()?;

        let d = &self.draft;
        Ok(UserCreate {
            username: d.username.clone(),
            user_group_id: d.user_group_id,
            personal_details: PersonalDetails {
                first_name: optional(&d.first_name),
                last_name: optional(&d.last_name),
                full_name: Some(format!("{} {}", d.first_name.trim(), d.last_name.trim())),
                email: optional(&d.email),
                phone_number: optional(&d.phone_number),
                id_type: Some(d.id_type),
                id_number: optional(&d.id_number),
            },
            geographic_assignment: GeographicAssignment {
                country_code: Some("ZA".to_string()),
                province_code: optional(&d.province_code),
                region: optional(&d.region),
            },
            user_type: d.user_type,
            authority_level: d.authority_level,
            status: d.status,
            password: optional(&d.password),
            require_password_change: d.require_password_change,
            require_2fa: d.require_2fa,
            privileges: self.privileges.clone(),
        })
    }
}
