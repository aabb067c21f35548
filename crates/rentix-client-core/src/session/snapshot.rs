use std::sync::Arc;

use rentix_shared::{
    id::CompanyId,
    token::AuthToken,
    uac::{CompanyMembership, CurrentRole, UserProfile},
};

/// Where the session is in its lifecycle. Always derived from a
/// [`SessionSnapshot`], never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No access token
    Anonymous,
    /// Token present, identity not resolved yet
    Loading,
    AuthenticatedNoContext,
    AuthenticatedWithContext,
}

/// Owned copy of the session at one point in time. Everything consumers need
/// (guard, menu, views) is computed from this on read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub access_token: Option<AuthToken>,
    pub refresh_token: Option<AuthToken>,
    pub user: Option<Arc<UserProfile>>,
    pub company_memberships: Vec<CompanyMembership>,
    pub selected_company_id: Option<CompanyId>,
    pub is_loading: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn is_platform_privileged(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| user.is_platform_privileged())
    }

    /// Privileged users always count as having a context even without a
    /// selected company
    pub fn has_context(&self) -> bool {
        self.is_platform_privileged() || self.selected_company_id.is_some()
    }

    pub fn is_member_of(&self, company_id: &CompanyId) -> bool {
        self.company_memberships
            .iter()
            .any(|membership| &membership.company_id == company_id)
    }

    pub fn selected_membership(&self) -> Option<&CompanyMembership> {
        let selected = self.selected_company_id.as_ref()?;
        self.company_memberships
            .iter()
            .find(|membership| &membership.company_id == selected)
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_authenticated() && self.is_loading {
            SessionPhase::Loading
        } else {
            self.settled_phase()
        }
    }

    /// The phase ignoring any load that is still in flight
    pub fn settled_phase(&self) -> SessionPhase {
        if !self.is_authenticated() {
            SessionPhase::Anonymous
        } else if self.user.is_none() {
            SessionPhase::Loading
        } else if self.has_context() {
            SessionPhase::AuthenticatedWithContext
        } else {
            SessionPhase::AuthenticatedNoContext
        }
    }

    /// Platform role if privileged, else the role in the selected company,
    /// else [`CurrentRole::Unknown`]
    pub fn current_role(&self) -> CurrentRole {
        match &self.user {
            Some(user) if user.is_platform_privileged() => CurrentRole::Platform(user.app_role),
            Some(_) => self
                .selected_membership()
                .map(|membership| CurrentRole::Company(membership.role))
                .unwrap_or_default(),
            None => CurrentRole::Unknown,
        }
    }
}
