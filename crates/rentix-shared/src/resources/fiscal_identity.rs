use crate::id::RecordId;

use super::Resource;

#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PersonType {
    #[default]
    LegalEntity,
    Individual,
}

/// Tax identity of a party as it appears on electronic invoices (Facturae)
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FiscalIdentity {
    pub id: RecordId,
    #[serde(default)]
    pub person_type: PersonType,
    pub tax_id_type: String,
    pub corporate_name: String,
    pub tax_id: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FiscalIdentityDraft {
    pub person_type: PersonType,
    pub tax_id_type: String,
    pub corporate_name: String,
    pub tax_id: String,
}

impl FiscalIdentityDraft {
    /// Facturae code for a Spanish NIF
    pub const TAX_ID_TYPE_NIF: &'static str = "01";
    pub const MIN_CORPORATE_NAME_LEN: usize = 3;
    pub const MIN_TAX_ID_LEN: usize = 8;
}

impl Default for FiscalIdentityDraft {
    fn default() -> Self {
        Self {
            person_type: PersonType::LegalEntity,
            tax_id_type: Self::TAX_ID_TYPE_NIF.to_string(),
            corporate_name: String::new(),
            tax_id: String::new(),
        }
    }
}

impl Resource for FiscalIdentity {
    const PATH: &'static str = "/fiscal-identities";
    type Draft = FiscalIdentityDraft;

    fn id(&self) -> &RecordId {
        &self.id
    }
}
