use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use serenity::builder::{CreateInteractionResponse, CreateInteractionResponseMessage};
use serenity::client::Context as SerenityContext;
use serenity::http::Http;
use serenity::model::application::{CommandInteraction, ResolvedOption, ResolvedValue};
use serenity::model::guild::Member;
use serenity::model::id::{ChannelId, GuildId};
use serenity::model::user::User;

use crate::args::SlashArg;
use crate::error::Error;
use crate::reply::CreateReply;

/// How far the response to an interaction has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReplyState {
    /// Nothing has been sent yet.
    Unsent = 0,
    /// The response was deferred. The next reply replaces the placeholder.
    Deferred = 1,
    /// A real response has been sent.
    Sent = 2,
}

impl ReplyState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Unsent,
            1 => Self::Deferred,
            _ => Self::Sent,
        }
    }
}

/// The context for a command invocation.
pub struct Context<'a, D> {
    /// The serenity context that triggered this command.
    pub serenity: &'a SerenityContext,
    /// The command interaction that this context corresponds to.
    pub interaction: &'a CommandInteraction,
    pub(crate) data: &'a D,
    pub(crate) inner: &'a ContextInner<'a>,
}

// manual impls so `D` doesn't need to be `Clone`
impl<D> Clone for Context<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Context<'_, D> {}

impl<D> fmt::Debug for Context<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("interaction", self.interaction)
            .field("inner", self.inner)
            .finish_non_exhaustive()
    }
}

/// Crate internal state for the context.
#[derive(Debug)]
pub struct ContextInner<'a> {
    pub reply_state: AtomicU8,
    pub options: Vec<ResolvedOption<'a>>,
}

impl<'a> ContextInner<'a> {
    pub fn with_options(options: Vec<ResolvedOption<'a>>) -> Self {
        Self {
            reply_state: AtomicU8::new(ReplyState::Unsent as u8),
            options,
        }
    }

    pub fn empty() -> Self {
        Self::with_options(Vec::new())
    }
}

impl<'a, D> Context<'a, D> {
    pub(crate) fn new(
        serenity: &'a SerenityContext,
        interaction: &'a CommandInteraction,
        data: &'a D,
        inner: &'a ContextInner<'a>,
    ) -> Self {
        Self {
            serenity,
            interaction,
            data,
            inner,
        }
    }

    /// Gets the user data the framework was constructed with.
    pub fn data(self) -> &'a D {
        self.data
    }

    /// Gets the HTTP client.
    pub fn http(self) -> &'a Http {
        &self.serenity.http
    }

    /// Gets the invoking user.
    pub fn user(self) -> &'a User {
        &self.interaction.user
    }

    /// Gets the invoking member.
    ///
    /// This is only present if invoked in guilds.
    pub fn member(self) -> Option<&'a Member> {
        self.interaction.member.as_deref()
    }

    /// Gets the ID of the channel the command was invoked in.
    pub fn channel_id(self) -> ChannelId {
        self.interaction.channel_id
    }

    /// Gets the ID of the guild the command was invoked in.
    pub fn guild_id(self) -> Option<GuildId> {
        self.interaction.guild_id
    }

    /// Gets the name of the invoked command.
    pub fn command_name(self) -> &'a str {
        &self.interaction.data.name
    }

    /// Gets the resolved options.
    pub fn options(self) -> &'a [ResolvedOption<'a>] {
        &self.inner.options
    }

    /// Gets the resolved value for an option by its name.
    ///
    /// If no option with that name was specified, returns [`None`].
    #[inline]
    pub fn option_value(self, name: &str) -> Option<&'a ResolvedValue<'a>> {
        self.inner
            .options
            .iter()
            .find(move |o| o.name == name)
            .map(|o| &o.value)
    }

    /// Extracts a required argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructureMismatch`] if the argument is missing or has
    /// the wrong type.
    pub fn arg<T: SlashArg<'a>>(self, name: &str) -> Result<T, Error> {
        let value = self
            .option_value(name)
            .ok_or_else(|| Error::structure_mismatch("missing required argument"))?;
        T::extract(value)
    }

    /// Extracts an optional argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructureMismatch`] if the argument has the wrong type.
    pub fn opt_arg<T: SlashArg<'a>>(self, name: &str) -> Result<Option<T>, Error> {
        self.option_value(name).map(T::extract).transpose()
    }

    /// Gets how far the response to this interaction has progressed.
    pub fn reply_state(self) -> ReplyState {
        ReplyState::from_u8(self.inner.reply_state.load(Ordering::Acquire))
    }

    #[inline]
    fn set_reply_state(self, to: ReplyState) {
        self.inner.reply_state.store(to as u8, Ordering::Release);
    }

    /// Defers the response, specifying whether it is ephemeral.
    ///
    /// Does nothing if a response was already deferred or sent.
    #[expect(clippy::missing_errors_doc)]
    pub async fn defer(self, ephemeral: bool) -> serenity::Result<()> {
        if self.reply_state() == ReplyState::Unsent {
            let reply = CreateInteractionResponse::Defer(
                CreateInteractionResponseMessage::new().ephemeral(ephemeral),
            );

            self.interaction.create_response(self.http(), reply).await?;
            self.set_reply_state(ReplyState::Deferred);
        }

        Ok(())
    }

    /// Sends a reply.
    ///
    /// This automatically tracks whether this should be the initial response,
    /// the edit finalizing a deferred response, or a follow-up. However, don't
    /// mix use of this function with manual use of the interaction.
    #[expect(clippy::missing_errors_doc)]
    pub async fn send(self, reply: CreateReply) -> serenity::Result<()> {
        match self.reply_state() {
            ReplyState::Unsent => {
                let reply = CreateInteractionResponse::Message(reply.into_interaction_response());
                self.interaction.create_response(self.http(), reply).await?;
                self.set_reply_state(ReplyState::Sent);
            },
            ReplyState::Deferred => {
                let reply = reply.into_interaction_edit();
                self.interaction.edit_response(self.http(), reply).await?;
                self.set_reply_state(ReplyState::Sent);
            },
            ReplyState::Sent => {
                let reply = reply.into_interaction_followup();
                self.interaction.create_followup(self.http(), reply).await?;
            },
        }

        Ok(())
    }
}
