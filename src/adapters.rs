//! Wire-facing capability flags: a 1:1 projection of Guardian answers so the
//! HTTP layer's JSON contract stays decoupled from the engine vocabulary.

use serde::{Deserialize, Serialize};

use crate::guardian::Guardian;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityFlags {
    pub can_save: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_admin: bool,
}

pub fn to_capability_flags(guardian: &Guardian) -> CapabilityFlags {
    CapabilityFlags {
        can_save: guardian.can_save(),
        can_edit: guardian.can_edit(),
        can_delete: guardian.can_delete(),
        can_admin: guardian.can_admin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_field_names_are_the_wire_contract() {
        let flags = CapabilityFlags { can_save: true, can_edit: true, can_delete: false, can_admin: false };
        let v = serde_json::to_value(flags).unwrap();
        assert_eq!(v["canSave"], true);
        assert_eq!(v["canEdit"], true);
        assert_eq!(v["canDelete"], false);
        assert_eq!(v["canAdmin"], false);
        assert!(v.get("can_save").is_none());
    }

    #[test]
    fn round_trips() {
        let flags = CapabilityFlags { can_save: false, can_edit: false, can_delete: true, can_admin: true };
        let back: CapabilityFlags = serde_json::from_value(serde_json::to_value(flags).unwrap()).unwrap();
        assert_eq!(back, flags);
    }
}
