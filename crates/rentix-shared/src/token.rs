use std::fmt::Debug;

/// Bearer credential issued by the backend. The value is never printed by
/// `Debug` so it is safe to include in traces
#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for AuthToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for AuthToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthToken(len: {})", self.0.len())
    }
}
