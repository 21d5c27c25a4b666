//! Required-permission expressions and their evaluation against a permission
//! snapshot. Pure and fail-closed: absence of a permission is `false`, never
//! an error, and unknown actions are false leaves.

use tracing::{debug, warn};

use crate::model::{is_known_action, FolderUid, Scope};
use crate::permissions::PermissionSet;
use crate::scope;

/// Boolean expression over (action, optional scope) leaves. A leaf without a
/// scope is checked against the evaluation target passed to [`evaluate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Has { action: String, scope: Option<Scope> },
    AnyOf(Vec<Requirement>),
    AllOf(Vec<Requirement>),
}

impl Requirement {
    /// Leaf: `action` on the evaluation target.
    pub fn action(action: impl Into<String>) -> Self {
        Requirement::Has { action: action.into(), scope: None }
    }

    /// Leaf pinned to an explicit scope instead of the target.
    pub fn action_on(action: impl Into<String>, scope: impl Into<Scope>) -> Self {
        Requirement::Has { action: action.into(), scope: Some(scope.into()) }
    }

    pub fn any_of(reqs: impl IntoIterator<Item = Requirement>) -> Self {
        Requirement::AnyOf(reqs.into_iter().collect())
    }

    pub fn all_of(reqs: impl IntoIterator<Item = Requirement>) -> Self {
        Requirement::AllOf(reqs.into_iter().collect())
    }
}

/// Evaluate `req` for `target` with the resource's folder `ancestry`.
/// Server admins bypass action/scope evaluation entirely.
pub fn evaluate(set: &PermissionSet, req: &Requirement, target: &Scope, ancestry: &[FolderUid]) -> bool {
    if set.server_admin() {
        return true;
    }
    eval_inner(set, req, target, ancestry)
}

fn eval_inner(set: &PermissionSet, req: &Requirement, target: &Scope, ancestry: &[FolderUid]) -> bool {
    match req {
        Requirement::Has { action, scope } => {
            if !is_known_action(action) {
                debug!(action = action.as_str(), "requirement names an unknown action; denying");
                return false;
            }
            let requested = scope.as_ref().unwrap_or(target);
            set.scopes_for(action).iter().any(|granted| {
                if scope::parse(granted.as_str()).is_none() {
                    warn!(
                        scope = granted.as_str(),
                        action = action.as_str(),
                        "malformed scope in stored grant; treated as non-matching"
                    );
                    return false;
                }
                scope::matches(granted, requested, ancestry)
            })
        }
        // Empty combinators deny: a vacuous AllOf would be an implicit allow.
        Requirement::AnyOf(reqs) => reqs.iter().any(|r| eval_inner(set, r, target, ancestry)),
        Requirement::AllOf(reqs) => {
            !reqs.is_empty() && reqs.iter().all(|r| eval_inner(set, r, target, ancestry))
        }
    }
}

/// One-off check without a full Guardian; the bulk list-filtering entry point.
pub fn has_permission(set: &PermissionSet, action: &str, scope: &Scope, ancestry: &[FolderUid]) -> bool {
    evaluate(set, &Requirement::action(action), scope, ancestry)
}
