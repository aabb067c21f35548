use serde::{Deserialize, Serialize};

/// Application wide role, independent of any company
#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppRole {
    #[serde(alias = "ADMIN")]
    PlatformAdmin,
    #[serde(alias = "SUPERADMIN")]
    PlatformSuperadmin,
    #[serde(other)]
    RegularUser,
}

impl AppRole {
    /// Privileged roles do not need a selected company to navigate
    pub fn is_platform_privileged(&self) -> bool {
        matches!(self, Self::PlatformAdmin | Self::PlatformSuperadmin)
    }
}

/// Role held inside one company. The backend has used several names for the
/// same levels over time so the older names are accepted as aliases
#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyRole {
    #[serde(
        alias = "PROPIETARIO",
        alias = "COMPANY_OWNER",
        alias = "ADMIN",
        alias = "COMPANY_ADMIN"
    )]
    Owner,
    #[serde(alias = "ARRENDATARIO", alias = "COMPANY_TENANT", alias = "RENTER")]
    Tenant,
    #[serde(other)]
    Viewer,
}

/// The single role in effect for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CurrentRole {
    Platform(AppRole),
    Company(CompanyRole),
    #[default]
    Unknown,
}

impl CurrentRole {
    pub fn is_platform_privileged(&self) -> bool {
        matches!(self, Self::Platform(role) if role.is_platform_privileged())
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, Self::Company(CompanyRole::Owner))
    }

    pub fn is_tenant(&self) -> bool {
        matches!(self, Self::Company(CompanyRole::Tenant))
    }
}
