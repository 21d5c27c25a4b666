//! Per-resource capability façade. An [`AccessEngine`] owns the external
//! providers; a [`Guardian`] binds one principal to one resource for one
//! request and answers capability queries from the loaded snapshot.

use std::sync::Arc;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::evaluator::{evaluate, Requirement};
use crate::identity::{Principal, RequestContext};
use crate::model::{FolderUid, ResourceKind, ResourceRef, Scope};
use crate::permissions::PermissionSet;
use crate::providers::{AncestryProvider, GrantStore};

pub struct AccessEngine {
    ancestry: Arc<dyn AncestryProvider>,
    grants: Arc<dyn GrantStore>,
}

impl AccessEngine {
    pub fn new(ancestry: Arc<dyn AncestryProvider>, grants: Arc<dyn GrantStore>) -> Self {
        AccessEngine { ancestry, grants }
    }

    /// Bind `principal` to `resource` in `org_id`, loading ancestry and
    /// grants once. Any failure surfaces here; the returned Guardian's
    /// queries are total.
    pub async fn guardian(
        &self,
        ctx: &RequestContext,
        principal: &Principal,
        org_id: i64,
        resource: ResourceRef,
    ) -> EngineResult<Guardian> {
        let ancestry = tokio::select! {
            _ = ctx.canceled() => {
                return Err(EngineError::canceled("ancestry_load", "request canceled during ancestry load"));
            }
            out = self.ancestry.ancestry_of(&resource) => out.map_err(|e| {
                EngineError::not_resolvable("ancestry_load", format!("{resource}: {e}"))
            })?,
        };
        let set = tokio::select! {
            _ = ctx.canceled() => {
                return Err(EngineError::canceled("grant_load", "request canceled during grant load"));
            }
            out = self.permission_set_inner(principal, org_id) => out?,
        };
        debug!(
            resource = %resource,
            user = principal.user_id.as_str(),
            org = org_id,
            depth = ancestry.len(),
            actions = set.action_count(),
            "guardian bound"
        );
        Ok(Guardian { kind: resource.kind, scope: resource.scope(), ancestry, set })
    }

    /// Load the principal's permission snapshot without binding a resource,
    /// for bulk list filtering via [`crate::evaluator::has_permission`].
    pub async fn permission_set(
        &self,
        ctx: &RequestContext,
        principal: &Principal,
        org_id: i64,
    ) -> EngineResult<PermissionSet> {
        tokio::select! {
            _ = ctx.canceled() => {
                Err(EngineError::canceled("grant_load", "request canceled during grant load"))
            }
            out = self.permission_set_inner(principal, org_id) => out,
        }
    }

    async fn permission_set_inner(&self, principal: &Principal, org_id: i64) -> EngineResult<PermissionSet> {
        let grants = self
            .grants
            .grants_for(principal, org_id)
            .await
            .map_err(|e| EngineError::grant_load("grant_store", e.to_string()))?;
        Ok(PermissionSet::build(principal.is_server_admin, grants))
    }
}

/// Snapshot-backed capability queries for one resource. Side-effect free;
/// repeated calls on the same instance always agree.
#[derive(Debug, Clone)]
pub struct Guardian {
    kind: ResourceKind,
    scope: Scope,
    ancestry: Vec<FolderUid>,
    set: PermissionSet,
}

impl Guardian {
    pub fn can_view(&self) -> bool {
        self.allows(&Requirement::action(self.kind.read_action()))
    }

    pub fn can_save(&self) -> bool {
        self.allows(&Requirement::action(self.kind.write_action()))
    }

    /// Edit and save gate the same write action and always agree.
    pub fn can_edit(&self) -> bool {
        self.can_save()
    }

    pub fn can_delete(&self) -> bool {
        self.allows(&Requirement::action(self.kind.delete_action()))
    }

    /// Administering a resource needs both permissions-read and
    /// permissions-write; holding one is not enough.
    pub fn can_admin(&self) -> bool {
        self.allows(&Requirement::all_of([
            Requirement::action(self.kind.permissions_read_action()),
            Requirement::action(self.kind.permissions_write_action()),
        ]))
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn ancestry(&self) -> &[FolderUid] {
        &self.ancestry
    }

    pub fn permission_set(&self) -> &PermissionSet {
        &self.set
    }

    fn allows(&self, req: &Requirement) -> bool {
        evaluate(&self.set, req, &self.scope, &self.ancestry)
    }
}
