//! Core vocabulary: actions, scopes, permissions and resource references.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub mod actions {
    pub const DASHBOARDS_READ: &str = "dashboards:read";
    pub const DASHBOARDS_WRITE: &str = "dashboards:write";
    pub const DASHBOARDS_DELETE: &str = "dashboards:delete";
    pub const DASHBOARDS_PERMISSIONS_READ: &str = "dashboards.permissions:read";
    pub const DASHBOARDS_PERMISSIONS_WRITE: &str = "dashboards.permissions:write";
    pub const FOLDERS_READ: &str = "folders:read";
    pub const FOLDERS_WRITE: &str = "folders:write";
    pub const FOLDERS_DELETE: &str = "folders:delete";
    pub const FOLDERS_PERMISSIONS_READ: &str = "folders.permissions:read";
    pub const FOLDERS_PERMISSIONS_WRITE: &str = "folders.permissions:write";
}

static KNOWN_ACTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        actions::DASHBOARDS_READ,
        actions::DASHBOARDS_WRITE,
        actions::DASHBOARDS_DELETE,
        actions::DASHBOARDS_PERMISSIONS_READ,
        actions::DASHBOARDS_PERMISSIONS_WRITE,
        actions::FOLDERS_READ,
        actions::FOLDERS_WRITE,
        actions::FOLDERS_DELETE,
        actions::FOLDERS_PERMISSIONS_READ,
        actions::FOLDERS_PERMISSIONS_WRITE,
    ]
    .into_iter()
    .collect()
});

/// The action vocabulary is closed: anything outside it never matches.
pub fn is_known_action(action: &str) -> bool {
    KNOWN_ACTIONS.contains(action)
}

/// Scope string of the form `<kind>:<id-type>:<id>` with optional trailing
/// wildcard segments. Opaque to everything except the matcher in `scope`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Scope(pub String);

impl Scope {
    pub fn dashboard_uid(uid: &str) -> Self {
        Scope(format!("dashboards:uid:{uid}"))
    }

    pub fn folder_uid(uid: &str) -> Self {
        Scope(format!("folders:uid:{uid}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Scope {
    fn from(s: &str) -> Self {
        Scope(s.to_string())
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FolderUid(pub String);

impl FolderUid {
    pub fn new(uid: impl Into<String>) -> Self {
        FolderUid(uid.into())
    }
}

impl Display for FolderUid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An (action, scope) grant. Immutable once issued; set semantics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Permission {
    pub action: String,
    pub scope: Scope,
}

impl Permission {
    pub fn new(action: impl Into<String>, scope: impl Into<Scope>) -> Self {
        Permission { action: action.into(), scope: scope.into() }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Dashboard,
    Folder,
}

impl ResourceKind {
    pub fn read_action(self) -> &'static str {
        match self {
            ResourceKind::Dashboard => actions::DASHBOARDS_READ,
            ResourceKind::Folder => actions::FOLDERS_READ,
        }
    }

    pub fn write_action(self) -> &'static str {
        match self {
            ResourceKind::Dashboard => actions::DASHBOARDS_WRITE,
            ResourceKind::Folder => actions::FOLDERS_WRITE,
        }
    }

    pub fn delete_action(self) -> &'static str {
        match self {
            ResourceKind::Dashboard => actions::DASHBOARDS_DELETE,
            ResourceKind::Folder => actions::FOLDERS_DELETE,
        }
    }

    pub fn permissions_read_action(self) -> &'static str {
        match self {
            ResourceKind::Dashboard => actions::DASHBOARDS_PERMISSIONS_READ,
            ResourceKind::Folder => actions::FOLDERS_PERMISSIONS_READ,
        }
    }

    pub fn permissions_write_action(self) -> &'static str {
        match self {
            ResourceKind::Dashboard => actions::DASHBOARDS_PERMISSIONS_WRITE,
            ResourceKind::Folder => actions::FOLDERS_PERMISSIONS_WRITE,
        }
    }
}

/// Identifies one resource instance a Guardian can be bound to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub uid: String,
}

impl ResourceRef {
    pub fn dashboard(uid: impl Into<String>) -> Self {
        ResourceRef { kind: ResourceKind::Dashboard, uid: uid.into() }
    }

    pub fn folder(uid: impl Into<String>) -> Self {
        ResourceRef { kind: ResourceKind::Folder, uid: uid.into() }
    }

    /// The resource's own concrete scope, as requested-scope input to the matcher.
    pub fn scope(&self) -> Scope {
        match self.kind {
            ResourceKind::Dashboard => Scope::dashboard_uid(&self.uid),
            ResourceKind::Folder => Scope::folder_uid(&self.uid),
        }
    }
}

impl Display for ResourceRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.scope())
    }
}
