use tracing::debug;

use super::Route;
use crate::SessionSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// The session is still loading, evaluate again once it settles
    Defer,
    Redirect(Route),
}

/// Decides if `target` may be shown for this session. Rules in order:
/// 1. Public routes are always allowed
/// 2. No token redirects to login
/// 3. A session that is loading defers
/// 4. No company context redirects to company selection unless the target is
///    a screen used to set one up
/// 5. Anything else is allowed
#[tracing::instrument(level = "debug", skip(snapshot), ret)]
pub fn evaluate(snapshot: &SessionSnapshot, target: Route) -> GuardDecision {
    if target.is_public() {
        return GuardDecision::Allow;
    }
    if !snapshot.is_authenticated() {
        return GuardDecision::Redirect(Route::Login);
    }
    if snapshot.is_loading {
        debug!("session still loading");
        return GuardDecision::Defer;
    }
    if !snapshot.has_context() && !target.is_context_setup() {
        return GuardDecision::Redirect(Route::SelectCompany);
    }
    GuardDecision::Allow
}
