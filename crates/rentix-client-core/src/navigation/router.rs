use tracing::{debug, info};

use super::{evaluate, GuardDecision, Route};
use crate::{SessionOutcome, SessionSnapshot};

/// Whatever actually shows a screen (browser history, a console, ...)
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// The only place that turns session outcomes into navigation. Every move
/// goes through the guard
#[derive(Debug)]
pub struct RouterAdapter<N> {
    navigator: N,
    current: Option<Route>,
    /// Where the user wanted to go before being deferred or redirected
    pending: Option<Route>,
}

impl<N: Navigator> RouterAdapter<N> {
    pub fn new(navigator: N) -> Self {
        Self {
            navigator,
            current: None,
            pending: None,
        }
    }

    /// Starts at `current` without navigating (eg. the screen restored on
    /// start up)
    pub fn with_current(navigator: N, current: Route) -> Self {
        Self {
            current: Some(current),
            ..Self::new(navigator)
        }
    }

    pub fn current(&self) -> Option<Route> {
        self.current
    }

    pub fn pending(&self) -> Option<Route> {
        self.pending
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Navigates to `target` if the guard allows it, otherwise to where the
    /// guard redirects. A deferred or redirected target is remembered and
    /// retried on the next [`SessionOutcome::Ready`]
    #[tracing::instrument(skip(self, snapshot))]
    pub fn request(&mut self, snapshot: &SessionSnapshot, target: Route) -> GuardDecision {
        let decision = evaluate(snapshot, target);
        match decision {
            GuardDecision::Allow => {
                self.pending = None;
                self.go(target);
            }
            GuardDecision::Defer => self.pending = Some(target),
            GuardDecision::Redirect(to) => {
                self.pending = Some(target);
                self.go(to);
            }
        }
        decision
    }

    /// Reacts to a session change. Returns `None` if nothing was attempted
    #[tracing::instrument(skip(self, snapshot))]
    pub fn apply(
        &mut self,
        outcome: &SessionOutcome,
        snapshot: &SessionSnapshot,
    ) -> Option<GuardDecision> {
        match outcome {
            SessionOutcome::LoggedOut { reason } => {
                if let Some(reason) = reason {
                    info!(%reason, "session ended");
                }
                self.pending = None;
                self.go(Route::Login);
                Some(GuardDecision::Redirect(Route::Login))
            }
            SessionOutcome::Ready(_) => {
                let target = self
                    .pending
                    .take()
                    .or_else(|| self.resumable_current(snapshot))
                    .unwrap_or(Route::Dashboard);
                Some(self.request(snapshot, target))
            }
            SessionOutcome::Discarded => None,
        }
    }

    /// The current screen is kept unless it only made sense before the
    /// session was ready
    fn resumable_current(&self, snapshot: &SessionSnapshot) -> Option<Route> {
        self.current.filter(|route| {
            !route.is_public() && !(route.is_context_setup() && snapshot.has_context())
        })
    }

    fn go(&mut self, route: Route) {
        if self.current == Some(route) {
            return;
        }
        debug!(%route, "navigating");
        self.navigator.navigate(route);
        self.current = Some(route);
    }
}
