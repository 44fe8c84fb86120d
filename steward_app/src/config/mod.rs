use serde::Deserialize;

pub mod setup;
mod token_parse;

pub use token_parse::Token;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub discord: DiscordConfig,
    pub bot: BotConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
pub struct DiscordConfig {
    #[serde(with = "token_parse")]
    pub token: Token,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BotConfig {
    pub recruit: crate::modules::recruit::Config,
}

const fn default_panic() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    /// Whether to install the panic hook that routes panics to the logger.
    #[serde(default = "default_panic")]
    pub panic: bool,
    #[serde(default)]
    pub log4rs: log4rs::config::RawConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            panic: default_panic(),
            log4rs: log4rs::config::RawConfig::default(),
        }
    }
}
