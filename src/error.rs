//! Engine error model. Every construction failure is recovered at the
//! Guardian/PermissionSet boundary and turned into a deny decision by the
//! caller; capability queries themselves never fail.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineError {
    /// Ancestry lookup failed or the resource no longer exists. Deny all.
    ResourceNotResolvable { code: String, message: String },
    /// Grant store unreachable or timed out. Deny all; retry is the HTTP
    /// layer's business.
    GrantLoadFailed { code: String, message: String },
    /// Request context canceled while a load was outstanding.
    Canceled { code: String, message: String },
}

impl EngineError {
    pub fn code_str(&self) -> &str {
        match self {
            EngineError::ResourceNotResolvable { code, .. }
            | EngineError::GrantLoadFailed { code, .. }
            | EngineError::Canceled { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            EngineError::ResourceNotResolvable { message, .. }
            | EngineError::GrantLoadFailed { message, .. }
            | EngineError::Canceled { message, .. } => message.as_str(),
        }
    }

    pub fn not_resolvable<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self {
        EngineError::ResourceNotResolvable { code: code.into(), message: msg.into() }
    }

    pub fn grant_load<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self {
        EngineError::GrantLoadFailed { code: code.into(), message: msg.into() }
    }

    pub fn canceled<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self {
        EngineError::Canceled { code: code.into(), message: msg.into() }
    }

    /// Map to HTTP status code. Never 200: a construction failure must not
    /// surface as a successful response.
    pub fn http_status(&self) -> u16 {
        match self {
            EngineError::ResourceNotResolvable { .. } => 404,
            EngineError::GrantLoadFailed { .. } => 503,
            EngineError::Canceled { .. } => 499,
        }
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for EngineError {}

pub type EngineResult<T> = Result<T, EngineError>;
