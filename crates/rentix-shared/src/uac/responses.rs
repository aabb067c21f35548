use crate::token::AuthToken;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: AuthToken,
    pub refresh_token: AuthToken,
}

/// Returned when switching company, carries a token scoped to that company
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContextResponse {
    pub access_token: AuthToken,
}
