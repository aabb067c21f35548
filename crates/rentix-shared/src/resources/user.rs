use crate::{
    id::RecordId,
    uac::{AppRole, Email},
};

/// A platform account as returned by the user search. Used to choose who owns
/// a company being registered
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub email: Email,
    #[serde(default)]
    pub app_role: Option<AppRole>,
}

/// The user search answers either with a bare list or with a page wrapping it
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum UserListing {
    Plain(Vec<User>),
    Paged {
        #[serde(default)]
        data: Vec<User>,
    },
}

impl UserListing {
    pub fn into_users(self) -> Vec<User> {
        match self {
            UserListing::Plain(users) | UserListing::Paged { data: users } => users,
        }
    }
}
