//! Draft of everything needed to register a company. It is filled in section
//! by section and nothing is sent until a section is submitted

use crate::id::RecordId;

use super::{AddressDraft, AddressType, FiscalIdentityDraft, PersonType};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} needs at least {min} characters")]
    TooShort { field: &'static str, min: usize },
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanySection {
    /// Owner of the new company
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<RecordId>,
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct CompanyLegalDraft {
    pub company: CompanySection,
    pub fiscal: FiscalIdentityDraft,
    pub address: AddressDraft,
}

/// Changes to one section of a [`CompanyLegalDraft`]. Fields left as `None`
/// keep what the draft already holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegalSection {
    Owner(RecordId),
    Fiscal(FiscalPatch),
    Address(AddressPatch),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FiscalPatch {
    pub person_type: Option<PersonType>,
    pub tax_id_type: Option<String>,
    pub corporate_name: Option<String>,
    pub tax_id: Option<String>,
}

impl FiscalPatch {
    pub fn person_type(mut self, person_type: PersonType) -> Self {
        self.person_type = Some(person_type);
        self
    }

    pub fn corporate_name(mut self, corporate_name: impl Into<String>) -> Self {
        self.corporate_name = Some(corporate_name.into());
        self
    }

    pub fn tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.tax_id = Some(tax_id.into());
        self
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AddressPatch {
    pub address_type: Option<AddressType>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: Option<String>,
    pub is_default: Option<bool>,
}

impl AddressPatch {
    pub fn address_line1(mut self, line: impl Into<String>) -> Self {
        self.address_line1 = Some(line.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    pub fn country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }
}

fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl CompanyLegalDraft {
    pub fn update_section(&mut self, section: LegalSection) {
        match section {
            LegalSection::Owner(user_id) => self.company.user_id = Some(user_id),
            LegalSection::Fiscal(patch) => {
                let fiscal = &mut self.fiscal;
                merge(&mut fiscal.person_type, patch.person_type);
                merge(&mut fiscal.tax_id_type, patch.tax_id_type);
                merge(&mut fiscal.corporate_name, patch.corporate_name);
                merge(&mut fiscal.tax_id, patch.tax_id);
            }
            LegalSection::Address(patch) => {
                let address = &mut self.address;
                merge(&mut address.address_type, patch.address_type);
                merge(&mut address.address_line1, patch.address_line1);
                if patch.address_line2.is_some() {
                    address.address_line2 = patch.address_line2;
                }
                merge(&mut address.city, patch.city);
                merge(&mut address.postal_code, patch.postal_code);
                merge(&mut address.country_code, patch.country_code);
                merge(&mut address.is_default, patch.is_default);
            }
        }
    }

    /// Back to the initial values, eg. after the company was registered or
    /// the user gave up
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn validate_address(&self) -> Result<(), DraftError> {
        let address = &self.address;
        required("address line", &address.address_line1)?;
        required("city", &address.city)?;
        required("postal code", &address.postal_code)?;
        required("country", &address.country_code)
    }

    pub fn validate_fiscal(&self) -> Result<(), DraftError> {
        let fiscal = &self.fiscal;
        min_len(
            "corporate name",
            &fiscal.corporate_name,
            FiscalIdentityDraft::MIN_CORPORATE_NAME_LEN,
        )?;
        min_len("tax id", &fiscal.tax_id, FiscalIdentityDraft::MIN_TAX_ID_LEN)
    }
}

fn required(field: &'static str, value: &str) -> Result<(), DraftError> {
    if value.trim().is_empty() {
        Err(DraftError::Missing(field))
    } else {
        Ok(())
    }
}

fn min_len(field: &'static str, value: &str, min: usize) -> Result<(), DraftError> {
    required(field, value)?;
    if value.trim().chars().count() < min {
        Err(DraftError::TooShort { field, min })
    } else {
        Ok(())
    }
}
