//! Contact fields that can be filled from a selected user.

use crate::api::models::users::{PersonalDetails, UserSummary};
use crate::errors::{Error, FieldError, Result};
use crate::types::UserId;

pub const NO_NAME: &str = "No Name";
pub const NO_EMAIL: &str = "No Email";

/// Name, email and phone for a user group or location contact.
///
/// While a user is selected the three fields mirror that user and are read-only. Clearing the
/// selection empties them and hands them back to the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    person: String,
    email: String,
    phone: String,
    selected_user: Option<UserId>,
}

impl ContactFields {
    /// Editable fields pre-filled with existing values.
    pub fn manual(person: Option<&str>, email: Option<&str>, phone: Option<&str>) -> Self {
        Self {
            person: person.unwrap_or_default().to_string(),
            email: email.unwrap_or_default().to_string(),
            phone: phone.unwrap_or_default().to_string(),
            selected_user: None,
        }
    }

    pub fn select_user(&mut self, user: &UserSummary) {
        let (person, email, phone) = contact_from(&user.personal_details);
        self.person = person;
        self.email = email;
        self.phone = phone;
        self.selected_user = Some(user.id);
    }

    pub fn clear_selection(&mut self) {
        *self = Self::default();
    }

    pub fn is_read_only(&self) -> bool {
        self.selected_user.is_some()
    }

    pub fn selected_user(&self) -> Option<UserId> {
        self.selected_user
    }

    pub fn person(&self) -> &str {
        &self.person
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn set_person(&mut self, value: impl Into<String>) -> Result<()> {
        self.ensure_editable("contact_person")?;
        self.person = value.into();
        Ok(())
    }

    pub fn set_email(&mut self, value: impl Into<String>) -> Result<()> {
        self.ensure_editable("email")?;
        self.email = value.into();
        Ok(())
    }

    pub fn set_phone(&mut self, value: impl Into<String>) -> Result<()> {
        self.ensure_editable("phone_number")?;
        self.phone = value.into();
        Ok(())
    }

    fn ensure_editable(&self, field: &str) -> Result<()> {
        if self.is_read_only() {
            return Err(Error::Validation {
                errors: vec![FieldError::new(
                    field,
                    "Contact details come from the selected user; clear the selection to edit them",
                )],
            });
        }
        Ok(())
    }
}

fn contact_from(details: &PersonalDetails) -> (String, String, String) {
    let name = details.display_name().unwrap_or_else(|| NO_NAME.to_string());
    let email = details
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_EMAIL)
        .to_string();
    let phone = details.phone_number.clone().unwrap_or_default();
    (name, email, phone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn jane() -> UserSummary {
        UserSummary {
            id: Uuid::new_v4(),
            username: "WC01001".to_string(),
            personal_details: PersonalDetails {
                full_name: Some("Jane Doe".to_string()),
                email: Some("jane@example.gov.za".to_string()),
                phone_number: Some("0821234567".to_string()),
                ..Default::default()
            },
            status: None,
        }
    }

    #[test]
    fn test_select_then_clear() {
        let mut contact = ContactFields::default();
        let user = jane();
        contact.select_user(&user);

        assert_eq!(contact.person(), "Jane Doe");
        assert_eq!(contact.email(), "jane@example.gov.za");
        assert_eq!(contact.phone(), "0821234567");
        assert!(contact.is_read_only());
        assert_eq!(contact.selected_user(), Some(user.id));

        contact.clear_selection();
        assert_eq!(contact.person(), "");
        assert_eq!(contact.email(), "");
        assert_eq!(contact.phone(), "");
        assert!(!contact.is_read_only());
        contact.set_person("Someone Else").unwrap();
        assert_eq!(contact.person(), "Someone Else");
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let mut contact = ContactFields::default();
        contact.select_user(&jane());

        let err = contact.set_email("other@example.gov.za").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(contact.email(), "jane@example.gov.za");
    }

    #[test]
    fn test_placeholders() {
        let mut contact = ContactFields::default();
        let user = UserSummary {
            personal_details: PersonalDetails::default(),
            ..jane()
        };
        contact.select_user(&user);
        assert_eq!(contact.person(), NO_NAME);
        assert_eq!(contact.email(), NO_EMAIL);
        assert_eq!(contact.phone(), "");
    }

    #[test]
    fn test_manual_prefill() {
        let contact = ContactFields::manual(Some("Front desk"), None, Some("0211234567"));
        assert!(!contact.is_read_only());
        assert_eq!(contact.person(), "Front desk");
        assert_eq!(contact.email(), "");
    }
}
