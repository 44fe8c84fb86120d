use serenity::builder::{
    CreateAllowedMentions, CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
    EditInteractionResponse,
};

/// Allows building a reply to an interaction, abstracting away
/// the differences between initial responses, follow-ups, and edits.
#[derive(Debug, Default, Clone)]
#[must_use]
pub struct CreateReply {
    pub(crate) content: String,
    pub(crate) ephemeral: bool,
    pub(crate) allowed_mentions: Option<CreateAllowedMentions>,
}

impl CreateReply {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content of the message.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Sets whether the message is ephemeral.
    ///
    /// This has no effect on edits.
    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    /// Set the allowed mentions for the message.
    pub fn allowed_mentions(mut self, allowed_mentions: CreateAllowedMentions) -> Self {
        self.allowed_mentions = Some(allowed_mentions);
        self
    }

    /// Creates an interaction response message from the builder.
    pub fn into_interaction_response(self) -> CreateInteractionResponseMessage {
        let Self {
            content,
            ephemeral,
            allowed_mentions,
        } = self;

        let mut builder = CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(ephemeral);

        if let Some(allowed_mentions) = allowed_mentions {
            builder = builder.allowed_mentions(allowed_mentions);
        }

        builder
    }

    /// Creates an interaction followup from the builder.
    pub fn into_interaction_followup(self) -> CreateInteractionResponseFollowup {
        let Self {
            content,
            ephemeral,
            allowed_mentions,
        } = self;

        let mut builder = CreateInteractionResponseFollowup::new()
            .content(content)
            .ephemeral(ephemeral);

        if let Some(allowed_mentions) = allowed_mentions {
            builder = builder.allowed_mentions(allowed_mentions);
        }

        builder
    }

    /// Creates an interaction edit from the builder.
    ///
    /// Used to finalize a deferred response.
    pub fn into_interaction_edit(self) -> EditInteractionResponse {
        let Self {
            content,
            ephemeral: _,
            allowed_mentions,
        } = self;

        let mut builder = EditInteractionResponse::new().content(content);

        if let Some(allowed_mentions) = allowed_mentions {
            builder = builder.allowed_mentions(allowed_mentions);
        }

        builder
    }
}
