//! GRANT / DENY / REVOKE blocks

use crate::model::{ObjectPermissions, PermissionState};
use crate::util::quote_ident;

/// One statement per (grantee, state); `target` is the securable clause,
/// e.g. `SCHEMA :: [sales]` or `[sales].[Orders]`.
pub fn permission_statements(permissions: &ObjectPermissions, target: &str) -> Vec<String> {
    permissions
        .blocks()
        .map(|(grantee, state, names)| {
            let listed: Vec<&str> = names.iter().map(String::as_str).collect();
            let grant_option = if state == PermissionState::GrantWithGrantOption {
                " WITH GRANT OPTION"
            } else {
                ""
            };
            format!(
                "{}\n  {}\nON {} TO {}{}",
                state.keyword(),
                listed.join(",\n  "),
                target,
                quote_ident(grantee),
                grant_option
            )
        })
        .collect()
}
