//! Message bodies posted by the recruit commands.
//!
//! The bodies live in `assets/templates` and are whitespace-significant.
//! `{user}` becomes a mention of the target, `{hours}` the raw `time` option.

use serenity::model::mention::Mentionable as _;

use super::dispatch::RecruitCommand;
use crate::prelude::*;

const STEAMID: &str = include_str!("../../../assets/templates/steamid.md");
const ACCEPTED: &str = include_str!("../../../assets/templates/accepted.md");
const NORESPONSE: &str = include_str!("../../../assets/templates/noresponse.md");
const WELCOME: &str = include_str!("../../../assets/templates/welcome.md");

/// Renders the body for `command`, addressed to `target`.
///
/// `hours` is inserted verbatim, without any numeric validation.
pub fn render(command: &RecruitCommand, target: UserId) -> String {
    let mention = target.mention().to_string();
    match command {
        RecruitCommand::SteamId => STEAMID.replace("{user}", &mention),
        RecruitCommand::Accepted => ACCEPTED.replace("{user}", &mention),
        RecruitCommand::NoResponse { hours } => NORESPONSE
            .replace("{user}", &mention)
            .replace("{hours}", hours),
        RecruitCommand::Welcome => WELCOME.replace("{user}", &mention),
    }
}
