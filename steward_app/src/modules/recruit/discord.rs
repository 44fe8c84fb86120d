//! The platform capabilities the recruit flow needs, and their serenity
//! implementations.
//!
//! The flow only talks to these traits so it can run against in-memory fakes.

use serenity::builder::{
    CreateAttachment, CreateMessage, CreateWebhook, EditMember, ExecuteWebhook,
};
use serenity::http::Http;
use steward_cmd::CreateReply;

use super::delivery::SenderIdentity;
use crate::prelude::*;

/// Remote operations used by the recruit commands.
pub trait Gateway: Sync {
    /// A transient sender identity bound to a channel.
    type Sender: Send + Sync;

    /// Creates a transient sender in `channel` that looks like `identity`.
    fn create_sender(
        &self,
        channel: ChannelId,
        identity: &SenderIdentity,
    ) -> impl Future<Output = Result<Self::Sender>> + Send;

    /// Posts `body` through a transient sender.
    fn send_via(&self, sender: &Self::Sender, body: &str) -> impl Future<Output = Result> + Send;

    /// Deletes a transient sender.
    fn remove_sender(&self, sender: Self::Sender) -> impl Future<Output = Result> + Send;

    /// Posts `body` into `channel` as the bot itself.
    fn send_as_bot(&self, channel: ChannelId, body: &str) -> impl Future<Output = Result> + Send;

    /// Fetches the current roles of a guild member.
    fn member_roles(
        &self,
        guild: GuildId,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<RoleId>>> + Send;

    /// Replaces the full role list of a member in one request.
    fn set_roles(
        &self,
        guild: GuildId,
        user: UserId,
        roles: &[RoleId],
    ) -> impl Future<Output = Result> + Send;
}

/// The private reply to the invoking user.
pub trait ReplyChannel: Sync {
    /// Acknowledges the invocation with a placeholder to be finalized later.
    fn defer(&self) -> impl Future<Output = Result> + Send;

    /// Sends the reply, finalizing the placeholder if deferred.
    fn send(&self, content: String) -> impl Future<Output = Result> + Send;
}

/// Pixel size of the avatar uploaded for a transient sender.
const AVATAR_SIZE: u16 = 256;

/// Builds a static PNG avatar URL at [`AVATAR_SIZE`].
///
/// Users without a custom avatar get their default one.
pub fn sender_avatar_url(user: &User) -> String {
    match &user.avatar {
        Some(hash) => format!(
            "https://cdn.discordapp.com/avatars/{}/{hash}.png?size={AVATAR_SIZE}",
            user.id
        ),
        None => user.default_avatar_url(),
    }
}

/// [`Gateway`] over serenity's HTTP client, using webhooks as senders.
pub struct DiscordGateway {
    http: Arc<Http>,
}

impl DiscordGateway {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

impl Gateway for DiscordGateway {
    type Sender = Webhook;

    async fn create_sender(&self, channel: ChannelId, identity: &SenderIdentity) -> Result<Webhook> {
        let mut builder = CreateWebhook::new(identity.name.as_str());
        if let Some(avatar_url) = &identity.avatar_url {
            let avatar = CreateAttachment::url(&*self.http, avatar_url)
                .await
                .context("cannot download caller avatar")?;
            builder = builder.avatar(&avatar);
        }

        let webhook = channel.create_webhook(&*self.http, builder).await?;
        Ok(webhook)
    }

    async fn send_via(&self, sender: &Webhook, body: &str) -> Result {
        let message = ExecuteWebhook::new().content(body);
        sender.execute(&*self.http, false, message).await?;
        Ok(())
    }

    async fn remove_sender(&self, sender: Webhook) -> Result {
        sender.delete(&*self.http).await?;
        Ok(())
    }

    async fn send_as_bot(&self, channel: ChannelId, body: &str) -> Result {
        channel
            .send_message(&*self.http, CreateMessage::new().content(body))
            .await?;
        Ok(())
    }

    async fn member_roles(&self, guild: GuildId, user: UserId) -> Result<Vec<RoleId>> {
        let member = guild.member(&*self.http, user).await?;
        Ok(member.roles)
    }

    async fn set_roles(&self, guild: GuildId, user: UserId, roles: &[RoleId]) -> Result {
        let edit = EditMember::new()
            .roles(roles.iter().copied())
            .audit_log_reason("welcome");

        guild.edit_member(&*self.http, user, edit).await?;
        Ok(())
    }
}

impl ReplyChannel for SContext<'_> {
    async fn defer(&self) -> Result {
        steward_cmd::Context::defer(*self, true).await?;
        Ok(())
    }

    async fn send(&self, content: String) -> Result {
        let reply = CreateReply::new().content(content).ephemeral(true);
        steward_cmd::Context::send(*self, reply).await?;
        Ok(())
    }
}
