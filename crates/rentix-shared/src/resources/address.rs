use crate::id::RecordId;

use super::Resource;

#[derive(
    Debug, Default, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressType {
    /// Registered address used on invoices
    #[default]
    Fiscal,
    Postal,
    #[serde(other)]
    Other,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: RecordId,
    #[serde(rename = "type", default)]
    pub address_type: AddressType,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country_code: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    #[serde(rename = "type")]
    pub address_type: AddressType,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country_code: String,
    pub is_default: bool,
}

impl AddressDraft {
    pub const DEFAULT_COUNTRY_CODE: &'static str = "ES";
}

impl Default for AddressDraft {
    fn default() -> Self {
        Self {
            address_type: AddressType::Fiscal,
            address_line1: String::new(),
            address_line2: None,
            city: String::new(),
            postal_code: String::new(),
            country_code: Self::DEFAULT_COUNTRY_CODE.to_string(),
            is_default: true,
        }
    }
}

impl Resource for Address {
    const PATH: &'static str = "/addresses";
    type Draft = AddressDraft;

    fn id(&self) -> &RecordId {
        &self.id
    }
}
