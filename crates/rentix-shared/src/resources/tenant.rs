use crate::id::RecordId;

use super::Resource;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: RecordId,
    pub full_name: String,
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// National tax identifier (NIF/NIE)
    #[serde(default)]
    pub tax_id: Option<String>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TenantDraft {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
}

impl Resource for Tenant {
    const PATH: &'static str = "/tenants";
    type Draft = TenantDraft;

    fn id(&self) -> &RecordId {
        &self.id
    }
}
