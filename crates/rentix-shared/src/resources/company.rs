use crate::id::RecordId;

use super::Resource;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: RecordId,
    pub legal_name: String,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Registers a company once its owner, fiscal address and fiscal identity
/// exist on the backend
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDraft {
    pub user_id: RecordId,
    pub fiscal_address_id: RecordId,
    /// The fiscal identity, named after the Facturae party it becomes
    pub facturae_party_id: RecordId,
}

impl Resource for Company {
    const PATH: &'static str = "/companies";
    type Draft = CompanyDraft;

    fn id(&self) -> &RecordId {
        &self.id
    }
}
