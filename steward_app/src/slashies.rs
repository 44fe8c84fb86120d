use std::fmt::{self, Display, Formatter};

use steward_cmd::{BoxFuture, CreateReply, Error, ReplyState};

use crate::prelude::*;

/// The reply for any failure that isn't the user's fault.
pub const INTERNAL_ERROR: &str = "There was an error executing this command!";

/// Pre-command execution hook.
pub fn pre_command(ctx: SContext<'_>) -> BoxFuture<'_, ()> {
    log::info!(
        "{}: /{} {}",
        ctx.user().name,
        ctx.command_name(),
        DisplayOptions(ctx.options())
    );

    Box::pin(std::future::ready(()))
}

/// Command execution error handler.
#[cold]
pub fn error_handler(ctx: SContext<'_>, error: Error) -> BoxFuture<'_, ()> {
    Box::pin(async move {
        let message = match &error {
            Error::Command(err) => {
                if let Some(err) = err.downcast_ref::<ArgError>() {
                    format!("Command error: {err}")
                } else {
                    if let Some(ser_err) = err.downcast_ref::<serenity::Error>() {
                        log::warn!("Discord error in command: {ser_err:?} / {err:?}");
                    } else {
                        log::error!("Error in command: {err:?}");
                    }

                    INTERNAL_ERROR.to_owned()
                }
            },
            _ => {
                log::error!("Framework error in /{}: {error}", ctx.command_name());
                INTERNAL_ERROR.to_owned()
            },
        };

        // the command already told the user something, don't pile on
        if ctx.reply_state() == ReplyState::Sent {
            return;
        }

        let reply = CreateReply::new().content(message).ephemeral(true);
        if let Err(err) = ctx.send(reply).await {
            log::error!("Error in error handler: {err:?}");
        }
    })
}

/// Formats resolved options as `name: value` pairs for the command log.
struct DisplayOptions<'a>(&'a [ResolvedOption<'a>]);

impl Display for DisplayOptions<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for option in self.0 {
            f.write_str(option.name)?;
            f.write_str(": ")?;

            match &option.value {
                ResolvedValue::String(v) => write!(f, "\"{v}\"")?,
                ResolvedValue::User(v, _) => f.write_str(&v.name)?,
                ResolvedValue::Channel(v) => match &v.name {
                    Some(name) => write!(f, "#{name}")?,
                    None => v.id.fmt(f)?,
                },
                _ => f.write_str("<other>")?,
            }

            f.write_str(" ")?;
        }

        Ok(())
    }
}
