//! This module stores the expected format of the arguments for the requests.
//! Some structs are not serializable (they hold secrets) but are still
//! included here to know what needs to be sent

use secrecy::{ExposeSecret, SecretString};
use std::fmt::Debug;

use crate::{
    id::CompanyId,
    uac::{AppRole, Email},
};

#[derive(serde::Deserialize, Clone)]
pub struct LoginReqArgs {
    pub email: Email,
    pub password: SecretString,
}

impl LoginReqArgs {
    pub fn new(email: Email, password: SecretString) -> Self {
        Self { email, password }
    }

    pub fn email(mut self, email: Email) -> Self {
        self.email = email;
        self
    }

    pub fn password(mut self, password: SecretString) -> Self {
        self.password = password;
        self
    }
}

impl Debug for LoginReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReqArgs")
            .field("email", &self.email)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .finish()
    }
}

/// Account created for the owner of a company being registered
#[derive(Debug, serde::Deserialize, Clone)]
pub struct NewUserReqArgs {
    pub email: Email,
    pub password: SecretString,
    pub app_role: AppRole,
}

impl NewUserReqArgs {
    pub const MIN_PASSWORD_LEN: usize = 6;

    pub fn new(email: Email, password: SecretString) -> Self {
        Self {
            email,
            password,
            app_role: AppRole::RegularUser,
        }
    }
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct UserSearchReqArgs {
    /// Matched against the email and the name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take: Option<u32>,
}

impl UserSearchReqArgs {
    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            take: None,
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectCompanyReqArgs {
    pub company_id: CompanyId,
}
