use std::fmt::Display;

use crate::{errors::ConversionError, id::CompanyId};

use super::{AppRole, CompanyRole};

/// An email address, only loosely checked as the backend is authoritative
#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub const MAX_LENGTH: usize = 254;
}

impl TryFrom<String> for Email {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(ConversionError::Empty);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: value.len(),
            });
        }
        match value.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(Self(value)),
            _ => Err(ConversionError::InvalidFormat("expected an email address")),
        }
    }
}

impl TryFrom<&str> for Email {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One company the user belongs to and the role held there
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMembership {
    pub company_id: CompanyId,
    pub role: CompanyRole,
    /// Only some versions of the backend include the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl CompanyMembership {
    pub fn new(company_id: CompanyId, role: CompanyRole) -> Self {
        Self {
            company_id,
            role,
            company_name: None,
        }
    }
}

/// Identity returned by the current user endpoint
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: Email,
    pub app_role: AppRole,
    #[serde(default)]
    pub company_memberships: Vec<CompanyMembership>,
}

impl UserProfile {
    pub fn is_platform_privileged(&self) -> bool {
        self.app_role.is_platform_privileged()
    }
}
