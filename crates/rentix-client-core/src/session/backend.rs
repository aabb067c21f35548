use std::fmt::Debug;

use rentix_shared::{
    errors::{ApiError, ApiResult},
    id::CompanyId,
    req_args::LoginReqArgs,
    uac::{CompanyMembership, ContextResponse, LoginResponse, UserProfile},
};

use crate::client::{ApiReceiver, UnauthorizedHook};

/// The calls the session needs from the backend. Implemented by
/// [`crate::Client`], tests substitute their own
pub trait SessionBackend: Debug + Send + Sync + 'static {
    fn login(&self, args: &LoginReqArgs) -> ApiReceiver<LoginResponse>;

    fn fetch_profile(&self) -> ApiReceiver<UserProfile>;

    fn fetch_memberships(&self) -> ApiReceiver<Vec<CompanyMembership>>;

    /// Must return a new access token scoped to `company_id`
    fn exchange_company_context(&self, company_id: &CompanyId) -> ApiReceiver<ContextResponse>;

    /// `hook` must be run whenever the backend ends the session on its own
    fn set_unauthorized_hook(&self, hook: UnauthorizedHook);
}

pub(crate) async fn recv<T>(rx: ApiReceiver<T>) -> ApiResult<T> {
    rx.await.unwrap_or_else(|_canceled| Err(ApiError::Canceled))
}
