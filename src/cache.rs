//! Cache of role→permission expansions for grant-store implementations.
//! Entries are write-once behind `Arc` and replaced wholesale under a new
//! key; a reader holding an expansion never observes a partial update.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::model::Permission;

/// Cache key: one role's expansion in one organization at one version of the
/// role catalog. Bumping the version retires every older entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleKey {
    pub org_id: i64,
    pub role: String,
    pub version: u64,
}

impl RoleKey {
    pub fn new(org_id: i64, role: impl Into<String>, version: u64) -> Self {
        RoleKey { org_id, role: role.into(), version }
    }
}

#[derive(Debug, Default)]
pub struct RoleExpansionCache {
    entries: RwLock<HashMap<RoleKey, Arc<Vec<Permission>>>>,
}

impl RoleExpansionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &RoleKey) -> Option<Arc<Vec<Permission>>> {
        self.entries.read().get(key).cloned()
    }

    /// Publish a full expansion for `key`, replacing any previous entry
    /// wholesale. Returns the shared handle readers will see.
    pub fn publish(&self, key: RoleKey, permissions: Vec<Permission>) -> Arc<Vec<Permission>> {
        let entry = Arc::new(permissions);
        self.entries.write().insert(key, Arc::clone(&entry));
        entry
    }

    /// Drop entries superseded by a catalog version bump.
    pub fn evict_before(&self, version: u64) {
        self.entries.write().retain(|k, _| k.version >= version);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::actions;

    fn perm(scope: &str) -> Permission {
        Permission::new(actions::DASHBOARDS_READ, scope)
    }

    #[test]
    fn publish_then_get() {
        let cache = RoleExpansionCache::new();
        let key = RoleKey::new(1, "viewer", 0);
        assert!(cache.get(&key).is_none());
        cache.publish(key.clone(), vec![perm("dashboards:uid:1")]);
        let hit = cache.get(&key).expect("published entry");
        assert_eq!(hit.len(), 1);
    }

    #[test]
    fn replacement_is_wholesale_and_readers_keep_their_snapshot() {
        let cache = RoleExpansionCache::new();
        let key = RoleKey::new(1, "viewer", 0);
        let old = cache.publish(key.clone(), vec![perm("dashboards:uid:1")]);
        cache.publish(key.clone(), vec![perm("dashboards:uid:1"), perm("dashboards:uid:2")]);
        // The handle taken before replacement is untouched
        assert_eq!(old.len(), 1);
        assert_eq!(cache.get(&key).unwrap().len(), 2);
    }

    #[test]
    fn version_bump_keys_are_disjoint() {
        let cache = RoleExpansionCache::new();
        cache.publish(RoleKey::new(1, "viewer", 0), vec![perm("dashboards:uid:1")]);
        assert!(cache.get(&RoleKey::new(1, "viewer", 1)).is_none());
        cache.publish(RoleKey::new(1, "viewer", 1), vec![]);
        assert_eq!(cache.len(), 2);
        cache.evict_before(1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&RoleKey::new(1, "viewer", 0)).is_none());
    }
}
