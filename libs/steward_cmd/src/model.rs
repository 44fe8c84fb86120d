use std::borrow::Cow;
use std::fmt;

use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::CommandOptionType;

use crate::BoxFuture;
use crate::context::Context;

/// Function to execute for a chat-input command.
///
/// It is expected that the function extracts its parameters from the
/// [`Context::options`] and validates them itself.
pub type ChatInputFn<D> = for<'i> fn(Context<'i, D>) -> BoxFuture<'i, anyhow::Result<()>>;

// no PartialEq derives because that would involve comparing function pointers
// and that is far from reliable.

/// Represents a top-level chat-input command, as understood by Discord.
#[non_exhaustive]
pub struct Command<D> {
    /// The name of the command.
    pub name: Cow<'static, str>,
    /// The description of the command.
    pub description: Cow<'static, str>,
    /// Whether the command may only be used within guilds.
    pub guild_only: bool,
    /// The command parameters.
    pub parameters: Cow<'static, [Parameter]>,
    /// Logic to run when this command is invoked.
    pub invoke: ChatInputFn<D>,
}

impl<D> fmt::Debug for Command<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("guild_only", &self.guild_only)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// The value kinds a [`Parameter`] may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// A user mention.
    User,
    /// A channel selection.
    Channel,
    /// Free text.
    String,
}

impl ParameterKind {
    /// Gets the Discord option type for this kind.
    pub fn option_type(self) -> CommandOptionType {
        match self {
            Self::User => CommandOptionType::User,
            Self::Channel => CommandOptionType::Channel,
            Self::String => CommandOptionType::String,
        }
    }
}

/// A command parameter.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Parameter {
    /// The name of the parameter.
    pub name: Cow<'static, str>,
    /// The description for the parameter.
    pub description: Cow<'static, str>,
    /// Whether the parameter is required.
    pub required: bool,
    /// The kind of value accepted.
    pub kind: ParameterKind,
}

impl<D> Command<D> {
    /// Creates a new guild-only command without parameters.
    pub const fn new(
        name: &'static str,
        description: &'static str,
        invoke: ChatInputFn<D>,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            description: Cow::Borrowed(description),
            guild_only: true,
            parameters: Cow::Borrowed(&[]),
            invoke,
        }
    }

    /// Sets the parameters.
    #[must_use]
    pub fn parameters(mut self, parameters: &'static [Parameter]) -> Self {
        self.parameters = Cow::Borrowed(parameters);
        self
    }

    /// Builds a [`CreateCommand`] instance from this value.
    pub fn to_create_command(&self) -> CreateCommand {
        let mut command = CreateCommand::new(self.name.clone())
            .description(self.description.clone())
            .dm_permission(!self.guild_only);

        for parameter in &*self.parameters {
            command = command.add_option(parameter.to_create_command_option());
        }

        command
    }
}

impl Parameter {
    /// Creates a new required parameter.
    pub const fn new(name: &'static str, description: &'static str, kind: ParameterKind) -> Self {
        Self {
            name: Cow::Borrowed(name),
            description: Cow::Borrowed(description),
            required: true,
            kind,
        }
    }

    /// Sets whether this parameter is required.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Builds a [`CreateCommandOption`] instance from this value.
    pub fn to_create_command_option(&self) -> CreateCommandOption {
        CreateCommandOption::new(
            self.kind.option_type(),
            self.name.clone(),
            self.description.clone(),
        )
        .required(self.required)
    }
}
