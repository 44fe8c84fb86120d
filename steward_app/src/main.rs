mod build;
mod config;
mod data;
mod logging;
mod modules;
mod prelude;
mod slashies;

fn main() -> anyhow::Result<()> {
    use std::panic;

    use serenity::gateway::ActivityData;
    use serenity::prelude::*;
    use steward_cmd::Framework;

    use crate::build::{GIT_HASH, VERSION};
    use crate::config::Config;
    use crate::prelude::*;

    return inner();

    #[tokio::main]
    async fn inner() -> anyhow::Result<()> {
        let res = run().await;
        if let Err(why) = &res {
            log::error!("Exiting due to error: {why:?}");
        }

        log::logger().flush();
        res
    }

    async fn run() -> Result {
        let config = build_config()?;
        init_logging(config.log.log4rs)?;

        if config.log.panic {
            panic::set_hook(Box::new(on_panic));
        }

        log::info!(target: "steward_app::version", "Steward v{VERSION} - {GIT_HASH}");

        let bot_data = Arc::new(BotData::new(config.bot));
        let init = bot_data.init()?;

        let framework = Framework::new(bot_data)
            .commands(init.commands)
            .pre_command(slashies::pre_command)
            .on_error(slashies::error_handler)
            .auto_register();

        let status = config
            .discord
            .status
            .unwrap_or_else(|| VERSION.to_owned());

        let mut client = Client::builder(config.discord.token.expose_secret(), init.intents)
            .activity(ActivityData::watching(status))
            .event_handler(framework)
            .await
            .context("failed to init discord client")?;

        client
            .start()
            .await
            .context("discord client shut down unexpectedly")
    }

    /// Writes panics to the logger, always with a backtrace, and flushes it.
    fn on_panic(info: &panic::PanicHookInfo<'_>) {
        use std::backtrace::Backtrace;
        use std::io::{Write as _, stdout};

        let backtrace = Backtrace::force_capture();
        let thread = std::thread::current();
        let name = thread.name().unwrap_or("<unnamed>");

        // the logger may itself be broken
        _ = writeln!(stdout(), "thread '{name}' {info}");
        log::error!("thread '{name}' {info}\n{backtrace}");
        log::logger().flush();
    }

    fn profile() -> Result<Cow<'static, str>> {
        use std::env::VarError::NotPresent;
        use std::env::var;

        match var("STEWARD_PROFILE") {
            Ok(value) => Ok(value.into()),
            Err(NotPresent) => Ok("release".into()),
            Err(err) => Err(err).context("cannot load STEWARD_PROFILE env variable"),
        }
    }

    fn build_config() -> Result<Config> {
        use crate::config::setup::{Builder, Env, File, TomlText};

        let profile = profile()?;
        let profile_config = format!("steward_app.{profile}.toml");
        let default_config = include_str!("../assets/default_config.toml");

        Builder::new()
            .add_layer(TomlText::new(default_config))
            .add_layer(File::new("steward_app.toml").required(false))
            .add_layer(File::new(&profile_config).required(false))
            .add_layer(Env::new().alias("DISCORD_TOKEN", "discord.token"))
            .build()
    }

    fn init_logging(config: log4rs::config::RawConfig) -> Result {
        let deserializers = crate::logging::deserializers();
        let (appenders, errors) = config.appenders_lossy(&deserializers);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let config = log4rs::Config::builder()
            .appenders(appenders)
            .loggers(config.loggers())
            .build(config.root())?;

        log4rs::init_config(config)?;
        Ok(())
    }
}
