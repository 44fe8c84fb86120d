//! Recruitment workflow commands.
//!
//! Staff with an authorized role post templated messages into a channel,
//! rendered under their own name and avatar where possible. `/welcome`
//! additionally swaps the target's roles.

use serenity::prelude::*;

use crate::prelude::*;

mod auth;
mod config;
mod delivery;
mod discord;
mod dispatch;
mod roles;
mod slashies;
mod template;

#[cfg(test)]
mod tests;

pub use config::{Config, WelcomeRoles};

pub struct Module;

impl super::Module for Module {
    fn enabled(&self, _config: &crate::config::BotConfig) -> bool {
        true
    }

    fn intents(&self, _config: &crate::config::BotConfig) -> GatewayIntents {
        GatewayIntents::GUILDS
    }

    fn commands(&self, _config: &crate::config::BotConfig) -> impl IntoIterator<Item = SCommand> {
        [
            slashies::steamid(),
            slashies::accepted(),
            slashies::noresponse(),
            slashies::welcome(),
        ]
    }

    fn validate(&self, config: &crate::config::BotConfig) -> Result {
        let recruit = &config.recruit;
        anyhow::ensure!(
            !recruit.authorized_roles.is_empty(),
            "recruit.authorized_roles must not be empty, nobody could use the commands"
        );

        log::info!(
            "Recruit commands enabled for {} role(s). Welcome adds {} and removes {} role(s).",
            recruit.authorized_roles.len(),
            recruit.welcome.add.len(),
            recruit.welcome.remove.len(),
        );
        Ok(())
    }
}
