use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attrs {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub org_id: i64,
    /// Superuser flag supplied by the authentication layer; every capability
    /// query short-circuits to allow when set.
    #[serde(default)]
    pub is_server_admin: bool,
    #[serde(default)]
    pub attrs: Attrs,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, org_id: i64) -> Self {
        Principal { user_id: user_id.into(), org_id, ..Default::default() }
    }

    pub fn server_admin(user_id: impl Into<String>, org_id: i64) -> Self {
        Principal { user_id: user_id.into(), org_id, is_server_admin: true, ..Default::default() }
    }
}
