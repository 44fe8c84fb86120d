use crate::config::BotConfig;
use crate::modules::{Module as _, for_each_module};
use crate::prelude::*;

/// The result type used throughout the bot.
pub type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;

/// The command context, carrying [`BotData`].
pub type SContext<'a> = steward_cmd::Context<'a, BotData>;

/// A command that has access to [`BotData`].
pub type SCommand = steward_cmd::model::Command<BotData>;

/// A simple error that can return any error message.
///
/// The message is shown to the invoking user as-is.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{msg}")]
#[must_use]
pub struct ArgError {
    /// The error message
    pub msg: Cow<'static, str>,
}

impl ArgError {
    pub const fn new_const(msg: &'static str) -> Self {
        Self {
            msg: Cow::Borrowed(msg),
        }
    }
}

/// The global bot data. Only one instance exists per bot.
///
/// Holds nothing mutable: every invocation only reads from it.
#[derive(Debug)]
pub struct BotData {
    /// The bot configuration.
    config: BotConfig,
}

impl BotData {
    /// Creates a new instance.
    #[must_use]
    pub fn new(config: BotConfig) -> Self {
        Self { config }
    }

    /// Gets the bot configuration.
    #[must_use]
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Gets the init data needed based on the enabled modules.
    pub fn init(&self) -> Result<Init> {
        let config = self.config();
        let mut init = Init::default();

        for_each_module!(config, |m| {
            m.validate(config)?;
            init.intents |= m.intents(config);
            init.commands.extend(m.commands(config));
        });

        Ok(init)
    }
}

/// Data needed for bot startup.
pub struct Init {
    /// Intents used by this app.
    pub intents: GatewayIntents,
    /// Commands to register.
    pub commands: Vec<SCommand>,
}

impl Default for Init {
    fn default() -> Self {
        Self {
            // default isn't empty but non_privileged and we need empty
            intents: GatewayIntents::empty(),
            commands: Vec::new(),
        }
    }
}
