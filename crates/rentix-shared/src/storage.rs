//! Keys and values persisted client side between runs

/// Every value the clients persist. Logout removes all of them
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumIter,
    strum::EnumCount,
)]
pub enum StoreKey {
    AccessToken,
    RefreshToken,
    SelectedCompanyId,
    ThemePreference,
}

impl StoreKey {
    /// Name used where the storage backend needs a string key (eg. browser
    /// local storage)
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::AccessToken => "rentix.accessToken",
            StoreKey::RefreshToken => "rentix.refreshToken",
            StoreKey::SelectedCompanyId => "rentix.selectedCompanyId",
            StoreKey::ThemePreference => "rentix.theme",
        }
    }
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}
