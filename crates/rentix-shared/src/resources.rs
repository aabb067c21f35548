//! Records managed through the standard CRUD endpoints. The backend owns all
//! the business rules, these types only describe what goes over the wire

mod address;
mod company;
mod fiscal_identity;
mod legal;
mod property;
mod tax;
mod tenant;
mod user;

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

use crate::id::RecordId;

pub use address::{Address, AddressDraft, AddressType};
pub use company::{Company, CompanyDraft};
pub use fiscal_identity::{FiscalIdentity, FiscalIdentityDraft, PersonType};
pub use legal::{
    AddressPatch, CompanyLegalDraft, CompanySection, DraftError, FiscalPatch, LegalSection,
};
pub use property::{Property, PropertyDraft};
pub use tax::{Tax, TaxDraft};
pub use tenant::{Tenant, TenantDraft};
pub use user::{User, UserListing};

/// A record type exposed under `PATH` with the usual
/// findAll/findOne/create/update/remove endpoints
pub trait Resource: Debug + Serialize + DeserializeOwned + Send + 'static {
    /// Base path of the collection eg. `/properties`
    const PATH: &'static str;
    /// Body sent to create or update a record
    type Draft: Debug + Serialize;

    fn id(&self) -> &RecordId;

    fn record_path(id: &RecordId) -> String {
        format!("{}/{id}", Self::PATH)
    }
}

/// Records that are deactivated (flag + timestamp) instead of being removed
/// and can be restored afterwards
pub trait SoftDeletable: Resource {
    fn is_active(&self) -> bool;
    fn deleted_at(&self) -> Option<chrono::DateTime<chrono::Utc>>;
}
