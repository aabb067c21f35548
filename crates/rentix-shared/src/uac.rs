//! Shared items related to identity and role based access

mod responses;
mod role;
mod user;

pub use responses::{ContextResponse, LoginResponse};
pub use role::{AppRole, CompanyRole, CurrentRole};
pub use user::{CompanyMembership, Email, UserProfile};
