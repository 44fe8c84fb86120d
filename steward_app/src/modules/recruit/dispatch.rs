//! Per-invocation flow shared by all recruit commands.

use serenity::model::mention::Mentionable as _;

use super::auth::is_authorized;
use super::delivery::{DeliveryFailed, DeliveryOutcome, SenderIdentity, deliver, sender_name};
use super::discord::{Gateway, ReplyChannel};
use super::roles::{RoleChangeOutcome, apply_welcome_roles};
use super::{Config, template};
use crate::prelude::*;
use crate::slashies::INTERNAL_ERROR;

/// The reply when the caller holds none of the authorized roles.
pub const DENIED: &str = "❌ You need the appropriate role to use this command.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecruitCommand {
    SteamId,
    Accepted,
    NoResponse { hours: String },
    Welcome,
}

impl RecruitCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SteamId => "steamid",
            Self::Accepted => "accepted",
            Self::NoResponse { .. } => "noresponse",
            Self::Welcome => "welcome",
        }
    }
}

/// The invoking moderator.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: UserId,
    pub roles: Vec<RoleId>,
    pub nick: Option<String>,
    pub display_name: Option<String>,
    pub username: String,
    pub avatar_url: Option<String>,
}

impl Caller {
    pub fn sender_identity(&self) -> SenderIdentity {
        let name = sender_name(
            self.nick.as_deref(),
            self.display_name.as_deref(),
            &self.username,
        );

        SenderIdentity {
            name: name.to_owned(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// The user a message is addressed to.
#[derive(Debug, Clone)]
pub struct Target {
    pub id: UserId,
    pub username: String,
}

/// One recruit command invocation, with defaults already applied.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: RecruitCommand,
    pub caller: Caller,
    pub guild_id: GuildId,
    pub target: Target,
    pub channel: ChannelId,
}

/// Runs an invocation to completion.
///
/// The caller always gets exactly one private reply. Errors past the
/// authorization check are logged and answered here, so the returned result
/// only fails if that reply itself couldn't be sent.
pub async fn dispatch<G, R>(gateway: &G, reply: &R, config: &Config, invocation: Invocation) -> Result
where
    G: Gateway,
    R: ReplyChannel,
{
    let name = invocation.command.name();
    if !is_authorized(&invocation.caller.roles, &config.authorized_roles) {
        log::info!("Denied /{name} for {}: missing authorized role", invocation.caller.id);
        return reply.send(DENIED.to_owned()).await;
    }

    let is_welcome = invocation.command == RecruitCommand::Welcome;
    if is_welcome {
        // role changes and delivery may outlast the initial response window
        reply.defer().await?;
    }

    match run(gateway, config, &invocation).await {
        Ok(message) => reply.send(message).await,
        Err(why) => {
            if why.is::<DeliveryFailed>() {
                log::error!("Delivery of /{name} to {} failed: {why:?}", invocation.channel);
            } else {
                log::error!("Error in /{name}: {why:?}");
            }

            let message = if is_welcome {
                format!(
                    "❌ There was an error processing the welcome command for {}. Please check the logs.",
                    invocation.target.username
                )
            } else {
                INTERNAL_ERROR.to_owned()
            };

            reply.send(message).await
        },
    }
}

/// Renders, mutates roles for `/welcome`, delivers, and builds the
/// confirmation text.
async fn run<G: Gateway>(gateway: &G, config: &Config, invocation: &Invocation) -> Result<String> {
    let body = template::render(&invocation.command, invocation.target.id);

    let roles = if invocation.command == RecruitCommand::Welcome {
        let outcome = apply_welcome_roles(
            gateway,
            invocation.guild_id,
            invocation.target.id,
            &config.welcome,
        )
        .await?;
        Some(outcome)
    } else {
        None
    };

    let identity = invocation.caller.sender_identity();
    let delivery = deliver(gateway, invocation.channel, &body, &identity).await?;

    Ok(confirmation(invocation, delivery, roles))
}

fn confirmation(
    invocation: &Invocation,
    delivery: DeliveryOutcome,
    roles: Option<RoleChangeOutcome>,
) -> String {
    let user = &invocation.target.username;
    let channel = invocation.channel.mention();

    let mut message = match &invocation.command {
        RecruitCommand::SteamId => format!("✅ Steam ID correction sent to {user} in {channel}!"),
        RecruitCommand::Accepted => format!("✅ Acceptance message sent to {user} in {channel}!"),
        RecruitCommand::NoResponse { hours } => format!(
            "✅ No response warning sent to {user} with {hours} hour deadline in {channel}!"
        ),
        RecruitCommand::Welcome => format!("✅ Welcome message sent to {user} in {channel}!"),
    };

    let via_bot = delivery == DeliveryOutcome::BotFallback;
    let partial = roles.is_some_and(|r| !r.fully_succeeded());

    match (via_bot, partial) {
        (false, false) => {},
        (true, false) => message.push_str(" (via bot)"),
        (false, true) => message.push_str(" (Note: Some role assignments may have failed)"),
        (true, true) => message.push_str(" (via bot - Note: Some role assignments may have failed)"),
    }

    message
}
