use serenity::prelude::*;

use crate::prelude::*;

pub mod recruit;

/// Run an expression against every enabled module.
///
/// Syntax is:
///
/// ```ignore
/// for_each_module!(&config, |m| do_stuff(m));
/// ```
macro_rules! for_each_module {
    (@inner $module:expr, $config:expr, |$var:ident| $body:expr) => {{
        let $var = $module;
        if $crate::modules::Module::enabled(&$var, $config) {
            $body
        }
    }};
    ($config:expr, |$var:ident| $body:expr) => {{
        $crate::modules::for_each_module!(@inner $crate::modules::recruit::Module, $config, |$var| $body);
    }};
}

pub(crate) use for_each_module;

pub trait Module: Sized {
    /// Whether the module is enabled.
    fn enabled(&self, config: &config::BotConfig) -> bool;

    /// The intents needed.
    fn intents(&self, config: &config::BotConfig) -> GatewayIntents {
        _ = config;
        GatewayIntents::empty()
    }

    /// Commands for this module.
    fn commands(&self, config: &config::BotConfig) -> impl IntoIterator<Item = SCommand> {
        _ = config;
        []
    }

    /// Validates that the config is good.
    fn validate(&self, config: &config::BotConfig) -> Result {
        _ = config;
        Ok(())
    }
}
