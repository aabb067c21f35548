use rentix_shared::{
    const_config::path::{PATH_LOGIN, PATH_MY_COMPANIES, PATH_SELECT_COMPANY, PATH_USERS_ME},
    id::CompanyId,
    req_args::{LoginReqArgs, SelectCompanyReqArgs},
    uac::{CompanyMembership, ContextResponse, LoginResponse, UserProfile},
};
use secrecy::ExposeSecret as _;

use crate::{
    client::{no_cb, ApiReceiver, UiCallBack, UnauthorizedHook, NO_ARGS},
    session::SessionBackend,
    Client,
};

pub mod onboarding;
pub mod resources;

impl Client {
    /// Only exchanges the credentials for tokens, nothing is stored. See
    /// [`crate::SessionManager::login`] to also start the session
    #[tracing::instrument(skip(ui_notify))]
    pub fn login<F: UiCallBack>(
        &self,
        args: &LoginReqArgs,
        ui_notify: F,
    ) -> ApiReceiver<LoginResponse> {
        let args = serde_json::json!({
            "email": args.email,
            "password": args.password.expose_secret(),
        });
        self.send_spec_expect_json(PATH_LOGIN, &args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn current_user<F: UiCallBack>(&self, ui_notify: F) -> ApiReceiver<UserProfile> {
        self.send_spec_expect_json(PATH_USERS_ME, NO_ARGS, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn my_companies<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> ApiReceiver<Vec<CompanyMembership>> {
        self.send_spec_expect_json(PATH_MY_COMPANIES, NO_ARGS, ui_notify)
    }

    /// Returns a new access token scoped to `company_id`. Storing it is left to
    /// the caller
    #[tracing::instrument(skip(ui_notify))]
    pub fn select_company<F: UiCallBack>(
        &self,
        company_id: &CompanyId,
        ui_notify: F,
    ) -> ApiReceiver<ContextResponse> {
        let args = SelectCompanyReqArgs {
            company_id: company_id.clone(),
        };
        self.send_spec_expect_json(PATH_SELECT_COMPANY, &args, ui_notify)
    }
}

impl SessionBackend for Client {
    fn login(&self, args: &LoginReqArgs) -> ApiReceiver<LoginResponse> {
        Client::login(self, args, no_cb)
    }

    fn fetch_profile(&self) -> ApiReceiver<UserProfile> {
        self.current_user(no_cb)
    }

    fn fetch_memberships(&self) -> ApiReceiver<Vec<CompanyMembership>> {
        self.my_companies(no_cb)
    }

    fn exchange_company_context(&self, company_id: &CompanyId) -> ApiReceiver<ContextResponse> {
        Client::select_company(self, company_id, no_cb)
    }

    fn set_unauthorized_hook(&self, hook: UnauthorizedHook) {
        Client::set_unauthorized_hook(self, hook)
    }
}
