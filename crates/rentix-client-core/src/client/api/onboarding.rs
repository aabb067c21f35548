//! Calls used while registering a company that do not fit the plain CRUD shape

use rentix_shared::{
    const_config::path::{PATH_ADDRESS_DRAFT, PATH_USERS, PATH_USERS_NEW},
    req_args::{NewUserReqArgs, UserSearchReqArgs},
    resources::{Address, AddressDraft, User, UserListing},
};
use secrecy::ExposeSecret as _;

use crate::{
    client::{ApiReceiver, UiCallBack},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn search_users<F: UiCallBack>(
        &self,
        args: &UserSearchReqArgs,
        ui_notify: F,
    ) -> ApiReceiver<UserListing> {
        self.send_spec_expect_json(PATH_USERS, args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn new_user<F: UiCallBack>(&self, args: &NewUserReqArgs, ui_notify: F) -> ApiReceiver<User> {
        let args = serde_json::json!({
            "email": args.email,
            "password": args.password.expose_secret(),
            "appRole": args.app_role,
        });
        self.send_spec_expect_json(PATH_USERS_NEW, &args, ui_notify)
    }

    /// Stores an address that is not linked to anything yet. Its id is then
    /// used to register the company
    #[tracing::instrument(skip(ui_notify))]
    pub fn create_address_draft<F: UiCallBack>(
        &self,
        draft: &AddressDraft,
        ui_notify: F,
    ) -> ApiReceiver<Address> {
        self.send_spec_expect_json(PATH_ADDRESS_DRAFT, draft, ui_notify)
    }
}
