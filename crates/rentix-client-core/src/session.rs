//! The session state machine.
//!
//! Owns the credentials, the resolved identity and the selected company. It
//! never navigates by itself, every operation returns a [`SessionOutcome`]
//! that a [`crate::RouterAdapter`] (or any other consumer) interprets.
//!
//! Work that is in flight when the session changes under it is discarded:
//! - every login and logout starts a new epoch and results from an older
//!   epoch are dropped so a late response can never resurrect a cleared
//!   session
//! - every identity fetch gets an increasing id and is only applied if no
//!   newer fetch has been applied already

mod backend;
mod loading;
mod snapshot;

use std::sync::{Arc, Mutex, MutexGuard};

use futures::channel::mpsc;
use rentix_shared::{
    errors::{ApiError, ApiResult},
    id::CompanyId,
    req_args::LoginReqArgs,
    storage::StoreKey,
    token::AuthToken,
    uac::{CompanyMembership, CurrentRole, LoginResponse, UserProfile},
};
use tracing::{debug, info, warn};

use crate::{
    menu::MenuEntry,
    token_store::{SharedTokenStore, TokenStore},
};

pub use backend::SessionBackend;
pub use snapshot::{SessionPhase, SessionSnapshot};

pub(crate) use backend::recv;
use loading::LoadingGuard;

#[cfg(test)]
pub(crate) use snapshot::test_data;

/// What an operation did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The identity is loaded, the phase tells if a company context exists
    Ready(SessionPhase),
    /// The session was cleared. `reason` is set when it was not requested
    LoggedOut { reason: Option<String> },
    /// The session changed while the operation was in flight so its result
    /// was thrown away
    Discarded,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Company {0} is not one of your companies")]
    NotAMember(CompanyId),
    #[error("The user has not logged in")]
    NotLoggedIn,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SessionError {
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionManager<B> {
    backend: B,
    store: SharedTokenStore,
    state: Arc<Mutex<SessionState>>,
}

#[derive(Debug, Default)]
struct SessionState {
    access_token: Option<AuthToken>,
    refresh_token: Option<AuthToken>,
    user: Option<Arc<UserProfile>>,
    company_memberships: Vec<CompanyMembership>,
    selected_company_id: Option<CompanyId>,
    epoch: u64,
    /// Last id handed out to an identity fetch
    fetch_seq: u64,
    /// Id of the newest identity fetch that was applied
    applied_fetch: u64,
    loading_count: usize,
    subscribers: Vec<mpsc::UnboundedSender<SessionOutcome>>,
}

impl SessionState {
    fn hydrate(store: &dyn TokenStore) -> Self {
        let access_token = store.get(StoreKey::AccessToken).map(AuthToken::from);
        if access_token.is_none() {
            return Self::default();
        }
        Self {
            access_token,
            refresh_token: store.get(StoreKey::RefreshToken).map(AuthToken::from),
            selected_company_id: stored_selection(store),
            ..Default::default()
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            user: self.user.clone(),
            company_memberships: self.company_memberships.clone(),
            selected_company_id: self.selected_company_id.clone(),
            is_loading: self.loading_count > 0
                || (self.access_token.is_some() && self.user.is_none()),
        }
    }

    /// Invalidates everything in flight and clears all session fields
    fn begin_epoch(&mut self) {
        self.epoch += 1;
        self.loading_count = 0;
        self.applied_fetch = self.fetch_seq;
        self.access_token = None;
        self.refresh_token = None;
        self.user = None;
        self.company_memberships.clear();
        self.selected_company_id = None;
    }

    fn next_fetch_id(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.fetch_seq
    }

    fn is_member_of(&self, company_id: &CompanyId) -> bool {
        self.company_memberships
            .iter()
            .any(|membership| &membership.company_id == company_id)
    }

    fn is_platform_privileged(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| user.is_platform_privileged())
    }

    /// Company a fresh session switches to: the one selected before if it is
    /// still allowed, otherwise the only membership
    fn initial_context(&self, previous_selection: Option<CompanyId>) -> Option<CompanyId> {
        if let Some(previous) = previous_selection {
            if self.is_platform_privileged() || self.is_member_of(&previous) {
                return Some(previous);
            }
            info!(%previous, "previous company is no longer a membership, dropping it");
        }
        match self.company_memberships.as_slice() {
            [only] => Some(only.company_id.clone()),
            _ => None,
        }
    }

    /// Returns false if a newer fetch was applied already
    fn apply_identity(
        &mut self,
        store: &dyn TokenStore,
        fetch_id: u64,
        profile: UserProfile,
        memberships: Vec<CompanyMembership>,
    ) -> bool {
        if fetch_id <= self.applied_fetch {
            debug!(fetch_id, applied = self.applied_fetch, "stale identity fetch");
            return false;
        }
        self.applied_fetch = fetch_id;
        self.user = Some(Arc::new(profile));
        self.company_memberships = memberships;
        if let Some(selected) = self.selected_company_id.clone() {
            if !self.is_platform_privileged() && !self.is_member_of(&selected) {
                info!(%selected, "selected company is no longer a membership, clearing it");
                self.selected_company_id = None;
                store.remove(StoreKey::SelectedCompanyId);
            }
        }
        true
    }

    /// The token and the company are always written together
    fn set_context(
        &mut self,
        store: &dyn TokenStore,
        access_token: Option<AuthToken>,
        selected_company_id: Option<CompanyId>,
    ) {
        store.update_many(&[
            (
                StoreKey::AccessToken,
                access_token.as_ref().map(AuthToken::expose),
            ),
            (
                StoreKey::SelectedCompanyId,
                selected_company_id.as_ref().map(AsRef::<str>::as_ref),
            ),
        ]);
        self.access_token = access_token;
        self.selected_company_id = selected_company_id;
    }

    fn end(&mut self, store: &dyn TokenStore, reason: Option<String>) -> SessionOutcome {
        self.begin_epoch();
        store.clear();
        self.emit(SessionOutcome::LoggedOut { reason })
    }

    fn commit_ready(&mut self) -> SessionOutcome {
        let phase = self.snapshot().settled_phase();
        self.emit(SessionOutcome::Ready(phase))
    }

    fn emit(&mut self, outcome: SessionOutcome) -> SessionOutcome {
        self.subscribers
            .retain(|subscriber| subscriber.unbounded_send(outcome.clone()).is_ok());
        outcome
    }
}

fn stored_selection(store: &dyn TokenStore) -> Option<CompanyId> {
    store
        .get(StoreKey::SelectedCompanyId)
        .and_then(|id| CompanyId::try_from(id).ok())
}

impl<B: SessionBackend> SessionManager<B> {
    /// Picks up any session left in `store` (eg. before a reload). Call
    /// [`Self::restore`] afterwards to resolve its identity
    #[tracing::instrument(name = "NEW SESSION", skip(backend, store))]
    pub fn new(backend: B, store: SharedTokenStore) -> Self {
        let state = Arc::new(Mutex::new(SessionState::hydrate(store.as_ref())));
        let weak_state = Arc::downgrade(&state);
        let hook_store = Arc::clone(&store);
        backend.set_unauthorized_hook(Arc::new(move || {
            if let Some(state) = weak_state.upgrade() {
                let mut state = state.lock().expect("mutex poisoned");
                state.end(
                    hook_store.as_ref(),
                    Some(ApiError::SessionExpired.to_string()),
                );
            }
        }));
        Self {
            backend,
            store,
            state,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    pub fn current_role(&self) -> CurrentRole {
        self.snapshot().current_role()
    }

    pub fn menu(&self) -> Vec<MenuEntry> {
        crate::menu::project_menu(self.current_role())
    }

    /// Receives every outcome that changed the session, including logouts
    /// forced by the backend rejecting the token
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionOutcome> {
        let (tx, rx) = mpsc::unbounded();
        self.lock().subscribers.push(tx);
        rx
    }

    /// Resolves the identity of a session found in the token store at start
    /// up. Failing to do so ends the session
    #[tracing::instrument(skip(self))]
    pub async fn restore(&self) -> Result<SessionOutcome, SessionError> {
        let has_token = self.lock().access_token.is_some();
        if !has_token {
            debug!("no stored session to restore");
            return Ok(SessionOutcome::LoggedOut { reason: None });
        }
        self.refresh_session_data().await
    }

    /// Exchanges the credentials for tokens then behaves as
    /// [`Self::login_success`]. Rejected credentials leave the session as is
    #[tracing::instrument(skip(self))]
    pub async fn login(&self, args: LoginReqArgs) -> Result<SessionOutcome, SessionError> {
        let tokens = recv(self.backend.login(&args)).await?;
        Ok(self.login_success(tokens).await)
    }

    /// Starts a new session with these tokens and loads its identity. Any
    /// failure while loading ends the session again as partial identity data
    /// could misrepresent what the user is allowed to do
    #[tracing::instrument(skip(self, tokens))]
    pub async fn login_success(&self, tokens: LoginResponse) -> SessionOutcome {
        let (epoch, fetch_id, previous_selection, _loading) = {
            let mut state = self.lock();
            // Selection saved by a previous session on this device. The login
            // token is not scoped to it so it is only a candidate for the
            // context exchange once the memberships are known
            let previous_selection = stored_selection(self.store.as_ref());
            state.begin_epoch();
            self.store.update_many(&[
                (StoreKey::AccessToken, Some(tokens.access_token.expose())),
                (StoreKey::RefreshToken, Some(tokens.refresh_token.expose())),
                (StoreKey::SelectedCompanyId, None),
            ]);
            state.access_token = Some(tokens.access_token);
            state.refresh_token = Some(tokens.refresh_token);
            let fetch_id = state.next_fetch_id();
            let loading = LoadingGuard::new(&self.state, &mut state);
            (state.epoch, fetch_id, previous_selection, loading)
        };
        match self.bootstrap(epoch, fetch_id, previous_selection).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(?err, "failed to load the session after login");
                let mut state = self.lock();
                if state.epoch == epoch {
                    state.end(self.store.as_ref(), Some(err.user_message()))
                } else {
                    SessionOutcome::Discarded
                }
            }
        }
    }

    async fn bootstrap(
        &self,
        epoch: u64,
        fetch_id: u64,
        previous_selection: Option<CompanyId>,
    ) -> ApiResult<SessionOutcome> {
        let (profile, memberships) = self.fetch_identity().await?;
        let initial_context = {
            let mut state = self.lock();
            if state.epoch != epoch
                || !state.apply_identity(self.store.as_ref(), fetch_id, profile, memberships)
            {
                return Ok(SessionOutcome::Discarded);
            }
            match state.initial_context(previous_selection) {
                Some(company_id) => company_id,
                None => return Ok(state.commit_ready()),
            }
        };
        info!(%initial_context, "switching the new session to its company");
        self.switch_context(epoch, initial_context).await
    }

    /// Switches the session to `company_id`. Only companies the user is a
    /// member of are allowed unless the user is platform privileged. On
    /// failure the session is left exactly as it was
    #[tracing::instrument(skip(self))]
    pub async fn select_company(
        &self,
        company_id: CompanyId,
    ) -> Result<SessionOutcome, SessionError> {
        let (epoch, _loading) = {
            let mut state = self.lock();
            if state.user.is_none() {
                return Err(SessionError::NotLoggedIn);
            }
            if !state.is_platform_privileged() && !state.is_member_of(&company_id) {
                return Err(SessionError::NotAMember(company_id));
            }
            let loading = LoadingGuard::new(&self.state, &mut state);
            (state.epoch, loading)
        };
        Ok(self.switch_context(epoch, company_id).await?)
    }

    /// Gets a token for the company, swaps it in together with the selection
    /// and reloads the identity under it. If the reload fails the previous
    /// token and selection are put back
    async fn switch_context(
        &self,
        epoch: u64,
        company_id: CompanyId,
    ) -> ApiResult<SessionOutcome> {
        let context = recv(self.backend.exchange_company_context(&company_id)).await?;
        let (previous_token, previous_selection, fetch_id) = {
            let mut state = self.lock();
            if state.epoch != epoch {
                return Ok(SessionOutcome::Discarded);
            }
            let previous_token = state.access_token.clone();
            let previous_selection = state.selected_company_id.clone();
            state.set_context(
                self.store.as_ref(),
                Some(context.access_token),
                Some(company_id),
            );
            // Fetches still in flight were made with the old token
            state.applied_fetch = state.fetch_seq;
            (previous_token, previous_selection, state.next_fetch_id())
        };

        let fetched = self.fetch_identity().await;

        let mut state = self.lock();
        if state.epoch != epoch {
            return Ok(SessionOutcome::Discarded);
        }
        match fetched {
            Ok((profile, memberships)) => {
                if !state.apply_identity(self.store.as_ref(), fetch_id, profile, memberships) {
                    return Ok(SessionOutcome::Discarded);
                }
                Ok(state.commit_ready())
            }
            Err(err) => {
                warn!(?err, "identity reload failed after switching company, rolling back");
                state.set_context(self.store.as_ref(), previous_token, previous_selection);
                Err(err)
            }
        }
    }

    /// Reloads profile and memberships with the current token. A selection
    /// that is no longer among the memberships is cleared.
    ///
    /// If no identity has been resolved yet in this session a failure ends the
    /// session, otherwise the session is kept and the error returned
    #[tracing::instrument(skip(self))]
    pub async fn refresh_session_data(&self) -> Result<SessionOutcome, SessionError> {
        let (epoch, fetch_id, _loading) = {
            let mut state = self.lock();
            if state.access_token.is_none() {
                return Ok(SessionOutcome::LoggedOut { reason: None });
            }
            let fetch_id = state.next_fetch_id();
            let loading = LoadingGuard::new(&self.state, &mut state);
            (state.epoch, fetch_id, loading)
        };

        let fetched = self.fetch_identity().await;

        let mut state = self.lock();
        if state.epoch != epoch {
            return Ok(SessionOutcome::Discarded);
        }
        match fetched {
            Ok((profile, memberships)) => {
                if !state.apply_identity(self.store.as_ref(), fetch_id, profile, memberships) {
                    return Ok(SessionOutcome::Discarded);
                }
                Ok(state.commit_ready())
            }
            Err(err) if state.user.is_none() => {
                warn!(?err, "unable to resolve the identity of the session");
                Ok(state.end(self.store.as_ref(), Some(err.user_message())))
            }
            Err(err) => {
                warn!(?err, "session refresh failed, keeping the current session");
                Err(err.into())
            }
        }
    }

    /// Clears the session and everything persisted for it. Safe to call when
    /// already logged out
    #[tracing::instrument(skip(self))]
    pub fn logout(&self) -> SessionOutcome {
        self.lock().end(self.store.as_ref(), None)
    }

    async fn fetch_identity(&self) -> ApiResult<(UserProfile, Vec<CompanyMembership>)> {
        let profile = recv(self.backend.fetch_profile()).await?;
        let memberships = recv(self.backend.fetch_memberships()).await?;
        Ok((profile, memberships))
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("mutex poisoned")
    }
}
