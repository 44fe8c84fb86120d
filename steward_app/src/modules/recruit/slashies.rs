use steward_cmd::BoxFuture;
use steward_cmd::model::{Parameter, ParameterKind};

use super::discord::{DiscordGateway, sender_avatar_url};
use super::dispatch::{Caller, Invocation, RecruitCommand, Target, dispatch};
use crate::prelude::*;

const CHANNEL: Parameter = Parameter::new(
    "channel",
    "The channel to send the message to (optional)",
    ParameterKind::Channel,
)
.required(false);

static STEAMID_PARAMS: &[Parameter] = &[
    Parameter::new("user", "The user who needs to correct their Steam ID", ParameterKind::User),
    CHANNEL,
];

static ACCEPTED_PARAMS: &[Parameter] = &[
    Parameter::new("user", "The user whose application was accepted", ParameterKind::User),
    CHANNEL,
];

static NORESPONSE_PARAMS: &[Parameter] = &[
    Parameter::new("user", "The user who needs to respond", ParameterKind::User),
    Parameter::new("time", "Number of hours until ticket closes", ParameterKind::String),
    CHANNEL,
];

static WELCOME_PARAMS: &[Parameter] = &[
    Parameter::new("user", "The new member to welcome", ParameterKind::User),
    CHANNEL,
];

/// Send Steam ID correction message
pub fn steamid() -> SCommand {
    fn invoke(ctx: SContext<'_>) -> BoxFuture<'_, Result> {
        Box::pin(run(ctx, RecruitCommand::SteamId))
    }

    SCommand::new("steamid", "Send Steam ID correction message", invoke).parameters(STEAMID_PARAMS)
}

/// Send application acceptance message
pub fn accepted() -> SCommand {
    fn invoke(ctx: SContext<'_>) -> BoxFuture<'_, Result> {
        Box::pin(run(ctx, RecruitCommand::Accepted))
    }

    SCommand::new("accepted", "Send application acceptance message", invoke)
        .parameters(ACCEPTED_PARAMS)
}

/// Send no response warning message
pub fn noresponse() -> SCommand {
    fn invoke(ctx: SContext<'_>) -> BoxFuture<'_, Result> {
        Box::pin(async move {
            let hours = ctx.arg::<&str>("time")?.to_owned();
            run(ctx, RecruitCommand::NoResponse { hours }).await
        })
    }

    SCommand::new("noresponse", "Send no response warning message", invoke)
        .parameters(NORESPONSE_PARAMS)
}

/// Send welcome message and assign roles
pub fn welcome() -> SCommand {
    fn invoke(ctx: SContext<'_>) -> BoxFuture<'_, Result> {
        Box::pin(run(ctx, RecruitCommand::Welcome))
    }

    SCommand::new("welcome", "Send welcome message and assign roles", invoke)
        .parameters(WELCOME_PARAMS)
}

async fn run(ctx: SContext<'_>, command: RecruitCommand) -> Result {
    let invocation = invocation(ctx, command)?;
    let gateway = DiscordGateway::new(Arc::clone(&ctx.serenity.http));
    let config = &ctx.data().config().recruit;

    dispatch(&gateway, &ctx, config, invocation).await
}

/// Collects everything the dispatcher needs from the interaction.
fn invocation(ctx: SContext<'_>, command: RecruitCommand) -> Result<Invocation> {
    const GUILD_ONLY: ArgError = ArgError::new_const("This command can only be used in a server.");

    let (Some(guild_id), Some(member)) = (ctx.guild_id(), ctx.member()) else {
        return Err(GUILD_ONLY.into());
    };

    let user = ctx.user();
    let caller = Caller {
        id: user.id,
        roles: member.roles.clone(),
        nick: member.nick.clone(),
        display_name: user.global_name.clone(),
        username: user.name.clone(),
        avatar_url: Some(sender_avatar_url(user)),
    };

    let target = ctx.arg::<&User>("user")?;
    let target = Target {
        id: target.id,
        username: target.name.clone(),
    };

    let channel = ctx
        .opt_arg::<&PartialChannel>("channel")?
        .map_or_else(|| ctx.channel_id(), |c| c.id);

    Ok(Invocation {
        command,
        caller,
        guild_id,
        target,
        channel,
    })
}
