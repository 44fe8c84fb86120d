//! Posting a message under the invoking moderator's name.

use super::discord::Gateway;
use crate::prelude::*;

/// How a transient sender should present itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderIdentity {
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Picks the display name for a transient sender.
///
/// The first non-empty of server nickname, global display name and username.
pub fn sender_name<'a>(
    nick: Option<&'a str>,
    display_name: Option<&'a str>,
    username: &'a str,
) -> &'a str {
    [nick, display_name]
        .into_iter()
        .flatten()
        .find(|n| !n.is_empty())
        .unwrap_or(username)
}

/// How a message ended up being posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Posted through a transient sender matching the caller.
    Impersonated,
    /// Posted by the bot itself after impersonation failed.
    BotFallback,
}

/// Both the impersonated and the fallback send failed.
#[derive(Debug, thiserror::Error)]
#[error("message could not be delivered, impersonation failed with: {impersonation:#}")]
pub struct DeliveryFailed {
    pub impersonation: anyhow::Error,
    #[source]
    pub fallback: anyhow::Error,
}

/// Posts `body` into `channel`, impersonating `identity` if possible.
///
/// Any failure while impersonating falls back to a single plain send as the
/// bot. If that fails too, returns [`DeliveryFailed`].
pub async fn deliver<G: Gateway>(
    gateway: &G,
    channel: ChannelId,
    body: &str,
    identity: &SenderIdentity,
) -> Result<DeliveryOutcome> {
    let impersonation = match impersonate(gateway, channel, body, identity).await {
        Ok(()) => return Ok(DeliveryOutcome::Impersonated),
        Err(why) => why,
    };

    log::warn!("Impersonated send to {channel} failed, posting as bot: {impersonation:#}");

    match gateway.send_as_bot(channel, body).await {
        Ok(()) => Ok(DeliveryOutcome::BotFallback),
        Err(fallback) => Err(DeliveryFailed {
            impersonation,
            fallback,
        }
        .into()),
    }
}

/// Create, send, then always remove the transient sender.
async fn impersonate<G: Gateway>(
    gateway: &G,
    channel: ChannelId,
    body: &str,
    identity: &SenderIdentity,
) -> Result {
    let sender = gateway
        .create_sender(channel, identity)
        .await
        .context("cannot create transient sender")?;

    let sent = gateway
        .send_via(&sender, body)
        .await
        .context("cannot send through transient sender");

    // the message is already posted if `sent` is ok, so a leftover sender
    // must not turn this into a fallback and a duplicate message
    if let Err(why) = gateway.remove_sender(sender).await {
        log::warn!("Failed to remove transient sender in {channel}: {why:?}");
    }

    sent
}
