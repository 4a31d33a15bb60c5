//! Code and name auto-generation.
//!
//! Codes are `prefix + zero-padded sequence`, with the sequence starting at 1 and skipping every
//! value already present in the list the page has loaded. The result is a suggestion only: another
//! operator can take the same code before submit, in which case the server rejects the create
//! and the operator picks again.
//!
//! | Entity     | Prefix                  | Width | Max |
//! |------------|-------------------------|-------|-----|
//! | User group | province code (`WC`)    | 2     | 99  |
//! | Location   | user group code + `L`   | 3     | 999 |
//! | Username   | user group code         | 3     | 999 |

use std::collections::HashSet;

use crate::api::models::locations::InfrastructureType;
use crate::api::models::user_groups::UserGroupType;
use crate::errors::{Error, Result};

pub const USER_GROUP_SEQUENCE: CodeSequence = CodeSequence { width: 2, max: 99 };
pub const LOCATION_SEQUENCE: CodeSequence = CodeSequence { width: 3, max: 999 };
pub const USERNAME_SEQUENCE: CodeSequence = CodeSequence { width: 3, max: 999 };

/// Width and cap of the numeric suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSequence {
    pub width: usize,
    pub max: u32,
}

impl CodeSequence {
    /// First free `prefix + NN..` not present in `existing`.
    ///
    /// Comparison is case-insensitive and only codes starting with `prefix` are considered.
    /// Running past `max` is an error; no value beyond the cap is ever produced.
    pub fn next_code<'a, I>(&self, prefix: &str, existing: I) -> Result<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let prefix = prefix.trim().to_uppercase();
        let taken: HashSet<String> = existing
            .into_iter()
            .map(|code| code.trim().to_uppercase())
            .filter(|code| code.starts_with(&prefix))
            .collect();

        (1..=self.max)
            .map(|seq| format!("{prefix}{seq:0width$}", width = self.width))
            .find(|candidate| !taken.contains(candidate))
            .ok_or(Error::CodeSpaceExhausted { prefix, max: self.max })
    }
}

/// User group code: `<ProvinceCode><NN>`.
pub fn user_group_code<'a, I>(province_code: &str, existing: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    USER_GROUP_SEQUENCE.next_code(province_code, existing)
}

/// Location code: `<UserGroupCode>L<NNN>`.
pub fn location_code<'a, I>(user_group_code: &str, existing: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    LOCATION_SEQUENCE.next_code(&format!("{}L", user_group_code.trim()), existing)
}

/// Username: `<UserGroupCode><NNN>`.
pub fn username<'a, I>(user_group_code: &str, existing: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    USERNAME_SEQUENCE.next_code(user_group_code, existing)
}

/// How a display name is built from the province.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameTemplate {
    /// `"<Province> <suffix>"`, e.g. `"Western Cape DLTC"`
    Provincial(&'static str),
    /// Fixed name regardless of province, e.g. `"National Help Desk"`
    National(&'static str),
}

impl NameTemplate {
    /// Base name, plus the trimmed free-text suffix when one is given.
    pub fn render(&self, province_name: &str, suffix: Option<&str>) -> String {
        let base = match self {
            NameTemplate::Provincial(kind) => format!("{} {kind}", province_name.trim()),
            NameTemplate::National(name) => (*name).to_string(),
        };
        match suffix.map(str::trim).filter(|s| !s.is_empty()) {
            Some(suffix) => format!("{base} {suffix}"),
            None => base,
        }
    }
}

impl From<UserGroupType> for NameTemplate {
    fn from(value: UserGroupType) -> Self {
        match value {
            UserGroupType::FixedDltc => NameTemplate::Provincial("DLTC"),
            UserGroupType::MobileDltc => NameTemplate::Provincial("Mobile DLTC"),
            UserGroupType::PrintingCenter => NameTemplate::Provincial("Printing Centre"),
            UserGroupType::RegisteringAuthority => NameTemplate::Provincial("Registering Authority"),
            UserGroupType::ProvincialHelpDesk => NameTemplate::Provincial("Help Desk"),
            UserGroupType::NationalHelpDesk => NameTemplate::National("National Help Desk"),
            UserGroupType::NationalAdmin => NameTemplate::National("National Admin Office"),
        }
    }
}

impl From<InfrastructureType> for NameTemplate {
    fn from(value: InfrastructureType) -> Self {
        match value {
            InfrastructureType::FixedDltc => NameTemplate::Provincial("DLTC"),
            InfrastructureType::MobileDltc => NameTemplate::Provincial("Mobile DLTC"),
            InfrastructureType::PrintingCenter => NameTemplate::Provincial("Printing Centre"),
            InfrastructureType::RegisteringAuthority => NameTemplate::Provincial("Registering Authority"),
            InfrastructureType::ProvincialHelpDesk => NameTemplate::Provincial("Help Desk"),
            InfrastructureType::NationalHelpDesk => NameTemplate::National("National Help Desk"),
            InfrastructureType::AdminOffice => NameTemplate::Provincial("Admin Office"),
        }
    }
}

/// Derive a display name for an entity of `kind` in `province_name`.
pub fn derive_name(kind: impl Into<NameTemplate>, province_name: &str, suffix: Option<&str>) -> String {
    kind.into().render(province_name, suffix)
}
