use chrono::{DateTime, Utc};

use crate::id::RecordId;

use super::{property::default_active, Resource, SoftDeletable};

/// A tax definition. Amounts are computed server side, `rate` is only shown
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tax {
    pub id: RecordId,
    pub name: String,
    pub rate: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaxDraft {
    pub name: String,
    pub rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for Tax {
    const PATH: &'static str = "/taxes";
    type Draft = TaxDraft;

    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl SoftDeletable for Tax {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}
