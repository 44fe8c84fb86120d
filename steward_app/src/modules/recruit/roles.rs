use super::WelcomeRoles;
use super::discord::Gateway;
use crate::prelude::*;

/// The result of both welcome role mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleChangeOutcome {
    pub added: bool,
    pub removed: bool,
}

impl RoleChangeOutcome {
    pub fn fully_succeeded(self) -> bool {
        self.added && self.removed
    }
}

/// Adds and removes the welcome roles on a member.
///
/// Each step replaces the whole role list in a single request. The two steps
/// are attempted independently, so one failing doesn't skip the other. Only
/// failing to fetch the member up front is an error.
pub async fn apply_welcome_roles<G: Gateway>(
    gateway: &G,
    guild: GuildId,
    user: UserId,
    roles: &WelcomeRoles,
) -> Result<RoleChangeOutcome> {
    let before = gateway
        .member_roles(guild, user)
        .await
        .context("cannot fetch member to welcome")?;

    log::info!("Roles of {user} before welcome: {before:?}");

    let mut current = before;

    let added = if roles.add.is_empty() {
        true
    } else {
        let next = with_roles(&current, &roles.add);
        let ok = replace("add", &roles.add, gateway.set_roles(guild, user, &next)).await;
        if ok {
            current = next;
        }
        ok
    };

    let removed = if roles.remove.is_empty() {
        true
    } else {
        let next = without_roles(&current, &roles.remove);
        replace("remove", &roles.remove, gateway.set_roles(guild, user, &next)).await
    };

    match gateway.member_roles(guild, user).await {
        Ok(after) => log::info!("Roles of {user} after welcome: {after:?}"),
        Err(why) => log::warn!("Cannot fetch roles of {user} after welcome: {why:?}"),
    }

    Ok(RoleChangeOutcome { added, removed })
}

async fn replace(action: &str, roles: &[RoleId], fut: impl Future<Output = Result>) -> bool {
    match fut.await {
        Ok(()) => {
            log::info!("Welcome: {action} {roles:?} succeeded");
            true
        },
        Err(why) => {
            log::error!("Welcome: {action} {roles:?} failed: {why:?}");
            false
        },
    }
}

/// `current` followed by every role of `add` it doesn't have yet.
fn with_roles(current: &[RoleId], add: &[RoleId]) -> Vec<RoleId> {
    let mut out = current.to_vec();
    for role in add {
        if !out.contains(role) {
            out.push(*role);
        }
    }
    out
}

/// `current` without any role in `remove`.
fn without_roles(current: &[RoleId], remove: &[RoleId]) -> Vec<RoleId> {
    current.iter().copied().filter(|r| !remove.contains(r)).collect()
}
