//! A small slash-command framework built on serenity's [`EventHandler`].
//!
//! Commands are plain data ([`model::Command`]) pointing at an invoke
//! function. The [`Framework`] registers them with Discord once the gateway
//! is ready and routes incoming command interactions to them, handing each
//! invocation a [`Context`] that tracks whether the interaction has been
//! answered yet.
//!
//! [`EventHandler`]: serenity::client::EventHandler

use std::pin::Pin;

use serenity::builder::CreateCommand;

pub mod args;
mod context;
mod error;
mod framework;
pub mod model;
mod reply;

pub use args::SlashArg;
pub use context::{Context, ReplyState};
pub use error::Error;
pub use framework::Framework;
pub use reply::CreateReply;

/// A boxed, sendable future, as returned by command functions.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Builds the [`CreateCommand`] payloads for a list of commands.
pub fn to_create_command<'a, D: 'a, I>(commands: I) -> Vec<CreateCommand>
where
    I: IntoIterator<Item = &'a model::Command<D>>,
{
    commands
        .into_iter()
        .map(model::Command::to_create_command)
        .collect()
}
