use std::collections::HashSet;

use crate::prelude::*;

/// Whether a member with `roles` may use the recruit commands.
///
/// Any single overlap is enough. An empty role list is never authorized.
pub fn is_authorized(roles: &[RoleId], authorized: &HashSet<RoleId>) -> bool {
    roles.iter().any(|r| authorized.contains(r))
}
