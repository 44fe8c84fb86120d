use std::collections::HashSet;

use crate::prelude::*;

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    /// Holding any one of these roles grants access to every command.
    pub authorized_roles: HashSet<RoleId>,
    #[serde(default)]
    pub welcome: WelcomeRoles,
}

/// Roles changed by `/welcome`.
#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct WelcomeRoles {
    #[serde(default)]
    pub add: Vec<RoleId>,
    #[serde(default)]
    pub remove: Vec<RoleId>,
}
