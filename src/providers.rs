//! External collaborators the engine loads its per-request snapshots from:
//! folder ancestry and flattened grants. The in-memory implementations serve
//! tests and embedded setups; production wires real stores behind the traits.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::cache::{RoleExpansionCache, RoleKey};
use crate::identity::Principal;
use crate::model::{FolderUid, Permission, ResourceRef};

#[async_trait]
pub trait AncestryProvider: Send + Sync {
    /// Ordered folder chain for `resource`, direct parent first, root last.
    /// Any error means the resource is not resolvable and must deny.
    async fn ancestry_of(&self, resource: &ResourceRef) -> Result<Vec<FolderUid>>;
}

#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Direct plus role-derived grants for `principal` in `org_id`, already
    /// flattened to (action, scope) pairs.
    async fn grants_for(&self, principal: &Principal, org_id: i64) -> Result<Vec<Permission>>;
}

#[derive(Debug, Default)]
struct FolderTreeInner {
    known: HashSet<ResourceRef>,
    parent: HashMap<ResourceRef, FolderUid>,
}

/// In-memory folder tree. Resources must be registered before lookup; a
/// parent pointing at an unregistered folder is a broken chain and errors.
#[derive(Debug, Default)]
pub struct MemoryFolderTree {
    inner: RwLock<FolderTreeInner>,
}

impl MemoryFolderTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `resource` at the tree root (no parent folder).
    pub fn insert_root(&self, resource: ResourceRef) {
        self.inner.write().known.insert(resource);
    }

    /// Register `resource` under `parent`.
    pub fn insert(&self, resource: ResourceRef, parent: FolderUid) {
        let mut inner = self.inner.write();
        inner.known.insert(resource.clone());
        inner.parent.insert(resource, parent);
    }

    pub fn remove(&self, resource: &ResourceRef) {
        let mut inner = self.inner.write();
        inner.known.remove(resource);
        inner.parent.remove(resource);
    }
}

#[async_trait]
impl AncestryProvider for MemoryFolderTree {
    async fn ancestry_of(&self, resource: &ResourceRef) -> Result<Vec<FolderUid>> {
        let inner = self.inner.read();
        if !inner.known.contains(resource) {
            return Err(anyhow!("resource not found: {resource}"));
        }
        let mut chain: Vec<FolderUid> = Vec::new();
        let mut cursor = inner.parent.get(resource).cloned();
        while let Some(folder) = cursor {
            if chain.contains(&folder) {
                return Err(anyhow!("folder cycle at {folder}"));
            }
            let folder_ref = ResourceRef::folder(folder.0.clone());
            if !inner.known.contains(&folder_ref) {
                return Err(anyhow!("broken folder chain: {folder} is not registered"));
            }
            chain.push(folder.clone());
            cursor = inner.parent.get(&folder_ref).cloned();
        }
        Ok(chain)
    }
}

#[derive(Debug, Default)]
struct GrantData {
    direct: HashMap<(i64, String), Vec<Permission>>,
    role_grants: HashMap<(i64, String), Vec<Permission>>,
    memberships: HashMap<(i64, String), Vec<String>>,
}

/// In-memory grant source: direct grants plus role-derived grants flattened
/// at load time. Role expansions go through [`RoleExpansionCache`], keyed by
/// the current catalog version so invalidation retires whole entries.
#[derive(Debug, Default)]
pub struct MemoryGrantStore {
    inner: RwLock<GrantData>,
    cache: RoleExpansionCache,
    version: AtomicU64,
}

impl MemoryGrantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant_user(&self, org_id: i64, user_id: &str, permission: Permission) {
        let mut inner = self.inner.write();
        inner.direct.entry((org_id, user_id.to_string())).or_default().push(permission);
    }

    pub fn grant_role(&self, org_id: i64, role: &str, permission: Permission) {
        let mut inner = self.inner.write();
        inner.role_grants.entry((org_id, role.to_string())).or_default().push(permission);
    }

    pub fn add_member(&self, org_id: i64, user_id: &str, role: &str) {
        let mut inner = self.inner.write();
        inner
            .memberships
            .entry((org_id, user_id.to_string()))
            .or_default()
            .push(role.to_string());
    }

    /// Retire every cached role expansion; subsequent loads re-expand under
    /// the bumped catalog version.
    pub fn invalidate(&self) {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        self.cache.evict_before(version);
    }

    #[cfg(test)]
    pub(crate) fn cached_expansions(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl GrantStore for MemoryGrantStore {
    async fn grants_for(&self, principal: &Principal, org_id: i64) -> Result<Vec<Permission>> {
        let version = self.version.load(Ordering::SeqCst);
        let inner = self.inner.read();
        let user_key = (org_id, principal.user_id.clone());
        let mut out = inner.direct.get(&user_key).cloned().unwrap_or_default();
        for role in inner.memberships.get(&user_key).into_iter().flatten() {
            let key = RoleKey::new(org_id, role.clone(), version);
            let expansion = match self.cache.get(&key) {
                Some(hit) => hit,
                None => {
                    let perms = inner
                        .role_grants
                        .get(&(org_id, role.clone()))
                        .cloned()
                        .unwrap_or_default();
                    self.cache.publish(key, perms)
                }
            };
            out.extend(expansion.iter().cloned());
        }
        Ok(out)
    }
}

/// Grant source for principals with no grants at all; useful as a default in
/// setups where only server admins exist.
#[derive(Debug, Default)]
pub struct EmptyGrantStore;

#[async_trait]
impl GrantStore for EmptyGrantStore {
    async fn grants_for(&self, _principal: &Principal, _org_id: i64) -> Result<Vec<Permission>> {
        Ok(Vec::new())
    }
}
