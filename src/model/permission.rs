//! Permission grants grouped per securable

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// `sys.database_permissions.state_desc`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PermissionState {
    Grant,
    GrantWithGrantOption,
    Deny,
    Revoke,
}

impl PermissionState {
    /// Statement keyword; the grant option is a suffix, not a keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            PermissionState::Grant | PermissionState::GrantWithGrantOption => "GRANT",
            PermissionState::Deny => "DENY",
            PermissionState::Revoke => "REVOKE",
        }
    }
}

impl FromStr for PermissionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GRANT" => Ok(PermissionState::Grant),
            "GRANT_WITH_GRANT_OPTION" => Ok(PermissionState::GrantWithGrantOption),
            "DENY" => Ok(PermissionState::Deny),
            "REVOKE" => Ok(PermissionState::Revoke),
            other => Err(format!("unknown permission state '{}'", other)),
        }
    }
}

/// One catalog permission row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRecord {
    /// `[schema]` or `[schema].[object]`
    pub securable: String,
    pub grantee: String,
    pub state: PermissionState,
    pub permission: String,
}

/// grantee -> state -> permission names, all sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPermissions {
    grants: BTreeMap<String, BTreeMap<PermissionState, BTreeSet<String>>>,
}

impl ObjectPermissions {
    pub fn add(
        &mut self,
        grantee: impl Into<String>,
        state: PermissionState,
        permission: impl Into<String>,
    ) {
        self.grants
            .entry(grantee.into())
            .or_default()
            .entry(state)
            .or_default()
            .insert(permission.into());
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// One entry per (grantee, state), grantees ascending.
    pub fn blocks(&self) -> impl Iterator<Item = (&str, PermissionState, &BTreeSet<String>)> + '_ {
        self.grants.iter().flat_map(|(grantee, states)| {
            states
                .iter()
                .map(move |(state, permissions)| (grantee.as_str(), *state, permissions))
        })
    }
}
