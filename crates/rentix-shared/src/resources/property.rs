use chrono::{DateTime, Utc};

use crate::id::RecordId;

use super::{Resource, SoftDeletable};

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: RecordId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub cadastral_reference: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadastral_reference: Option<String>,
}

pub(super) fn default_active() -> bool {
    true
}

impl Resource for Property {
    const PATH: &'static str = "/properties";
    type Draft = PropertyDraft;

    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl SoftDeletable for Property {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}
