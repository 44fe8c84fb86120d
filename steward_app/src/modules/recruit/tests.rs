use std::collections::HashSet;
use std::sync::Mutex;

use super::delivery::{
    DeliveryFailed, DeliveryOutcome, SenderIdentity, deliver, sender_name,
};
use super::discord::{Gateway, ReplyChannel, sender_avatar_url};
use super::dispatch::{Caller, DENIED, Invocation, RecruitCommand, Target, dispatch};
use super::roles::apply_welcome_roles;
use super::*;
use crate::slashies::INTERNAL_ERROR;

const GUILD: GuildId = GuildId::new(565502178253471744);
const CHANNEL: ChannelId = ChannelId::new(1000);
const TARGET: UserId = UserId::new(2000);
const STAFF_ROLE: RoleId = RoleId::new(952440799570825278);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    CreateSender(ChannelId, String),
    SendVia(String),
    RemoveSender,
    SendAsBot(ChannelId, String),
    MemberRoles,
    SetRoles(Vec<RoleId>),
    Defer,
    Reply(String),
}

/// In-memory gateway and reply channel sharing one event log.
#[derive(Default)]
struct Fake {
    events: Mutex<Vec<Event>>,
    fail_create: bool,
    fail_send_via: bool,
    fail_remove_sender: bool,
    fail_bot: bool,
    fail_member: bool,
    /// Fails the first role update.
    fail_add: bool,
    /// Fails the second role update.
    fail_remove_roles: bool,
}

impl Fake {
    fn push(&self, event: Event) {
        self.events.lock().expect("not poisoned").push(event);
    }

    fn events(&self) -> Vec<Event> {
        self.events.lock().expect("not poisoned").clone()
    }

    fn replies(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Reply(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn posted(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::SendVia(body) | Event::SendAsBot(_, body) => Some(body),
                _ => None,
            })
            .collect()
    }
}

fn fail(what: &str) -> anyhow::Error {
    anyhow::anyhow!("{what} failed")
}

impl Gateway for Fake {
    type Sender = ();

    async fn create_sender(&self, channel: ChannelId, identity: &SenderIdentity) -> Result {
        self.push(Event::CreateSender(channel, identity.name.clone()));
        if self.fail_create { Err(fail("create")) } else { Ok(()) }
    }

    async fn send_via(&self, _sender: &(), body: &str) -> Result {
        self.push(Event::SendVia(body.to_owned()));
        if self.fail_send_via { Err(fail("send_via")) } else { Ok(()) }
    }

    async fn remove_sender(&self, _sender: ()) -> Result {
        self.push(Event::RemoveSender);
        if self.fail_remove_sender { Err(fail("remove")) } else { Ok(()) }
    }

    async fn send_as_bot(&self, channel: ChannelId, body: &str) -> Result {
        self.push(Event::SendAsBot(channel, body.to_owned()));
        if self.fail_bot { Err(fail("send_as_bot")) } else { Ok(()) }
    }

    async fn member_roles(&self, _guild: GuildId, _user: UserId) -> Result<Vec<RoleId>> {
        self.push(Event::MemberRoles);
        if self.fail_member {
            Err(fail("member"))
        } else {
            Ok(vec![RoleId::new(794754820950720553)])
        }
    }

    async fn set_roles(&self, _guild: GuildId, _user: UserId, roles: &[RoleId]) -> Result {
        let index = self.events().iter().filter(|e| matches!(e, Event::SetRoles(_))).count();
        self.push(Event::SetRoles(roles.to_vec()));
        match index {
            0 if self.fail_add => Err(fail("set_roles")),
            1 if self.fail_remove_roles => Err(fail("set_roles")),
            _ => Ok(()),
        }
    }
}

impl ReplyChannel for Fake {
    async fn defer(&self) -> Result {
        self.push(Event::Defer);
        Ok(())
    }

    async fn send(&self, content: String) -> Result {
        self.push(Event::Reply(content));
        Ok(())
    }
}

fn config() -> Config {
    Config {
        authorized_roles: HashSet::from([STAFF_ROLE]),
        welcome: WelcomeRoles {
            add: vec![RoleId::new(633051065960628244), RoleId::new(635774784084377601)],
            remove: vec![RoleId::new(794754820950720553)],
        },
    }
}

fn identity() -> SenderIdentity {
    SenderIdentity {
        name: "Mod".to_owned(),
        avatar_url: None,
    }
}

fn invocation(command: RecruitCommand, roles: Vec<RoleId>) -> Invocation {
    Invocation {
        command,
        caller: Caller {
            id: UserId::new(3000),
            roles,
            nick: Some("Mod".to_owned()),
            display_name: Some("Moderator".to_owned()),
            username: "moderator_42".to_owned(),
            avatar_url: None,
        },
        guild_id: GUILD,
        target: Target {
            id: TARGET,
            username: "recruit".to_owned(),
        },
        channel: CHANNEL,
    }
}

#[test]
fn sender_name_priority() {
    assert_eq!(sender_name(Some("nick"), Some("display"), "user"), "nick", "nick first");
    assert_eq!(sender_name(None, Some("display"), "user"), "display", "then display name");
    assert_eq!(sender_name(Some(""), Some(""), "user"), "user", "empty names are skipped");
    assert_eq!(sender_name(None, None, "user"), "user", "username last");
}

#[tokio::test]
async fn deliver_impersonated_removes_sender() {
    let fake = Fake::default();
    let outcome = deliver(&fake, CHANNEL, "hi", &identity()).await.expect("must deliver");

    assert_eq!(outcome, DeliveryOutcome::Impersonated, "no fallback needed");
    assert_eq!(
        fake.events(),
        [
            Event::CreateSender(CHANNEL, "Mod".to_owned()),
            Event::SendVia("hi".to_owned()),
            Event::RemoveSender,
        ],
        "create, send, remove"
    );
}

#[tokio::test]
async fn deliver_falls_back_when_create_fails() {
    let fake = Fake {
        fail_create: true,
        ..Fake::default()
    };

    let outcome = deliver(&fake, CHANNEL, "hi", &identity()).await.expect("must deliver");

    assert_eq!(outcome, DeliveryOutcome::BotFallback, "must fall back");
    assert_eq!(
        fake.events(),
        [
            Event::CreateSender(CHANNEL, "Mod".to_owned()),
            Event::SendAsBot(CHANNEL, "hi".to_owned()),
        ],
        "nothing to remove when creation failed"
    );
}

#[tokio::test]
async fn deliver_removes_sender_before_fallback() {
    let fake = Fake {
        fail_send_via: true,
        ..Fake::default()
    };

    let outcome = deliver(&fake, CHANNEL, "hi", &identity()).await.expect("must deliver");

    assert_eq!(outcome, DeliveryOutcome::BotFallback, "must fall back");
    let events = fake.events();
    assert_eq!(
        events.get(2..),
        Some(&[Event::RemoveSender, Event::SendAsBot(CHANNEL, "hi".to_owned())][..]),
        "sender is removed even though the send failed: {events:?}"
    );
}

#[tokio::test]
async fn deliver_keeps_success_when_removal_fails() {
    let fake = Fake {
        fail_remove_sender: true,
        ..Fake::default()
    };

    let outcome = deliver(&fake, CHANNEL, "hi", &identity()).await.expect("must deliver");

    assert_eq!(outcome, DeliveryOutcome::Impersonated, "message was already posted");
    assert_eq!(fake.posted(), ["hi"], "no duplicate post");
}

#[tokio::test]
async fn deliver_fails_when_fallback_fails() {
    let fake = Fake {
        fail_create: true,
        fail_bot: true,
        ..Fake::default()
    };

    let res = deliver(&fake, CHANNEL, "hi", &identity()).await;
    let err = res.expect_err("both paths failed");
    assert!(err.is::<DeliveryFailed>(), "must be a delivery failure: {err:?}");
}

#[tokio::test]
async fn unauthorized_has_no_side_effects() {
    let commands = [
        RecruitCommand::SteamId,
        RecruitCommand::Accepted,
        RecruitCommand::NoResponse {
            hours: "5".to_owned(),
        },
        RecruitCommand::Welcome,
    ];

    for command in commands {
        let fake = Fake::default();
        let inv = invocation(command.clone(), vec![RoleId::new(1)]);
        dispatch(&fake, &fake, &config(), inv).await.expect("must reply");

        assert_eq!(
            fake.events(),
            [Event::Reply(DENIED.to_owned())],
            "only the rejection for {command:?}"
        );
    }
}

#[tokio::test]
async fn accepted_end_to_end() {
    let fake = Fake::default();
    let inv = invocation(RecruitCommand::Accepted, vec![RoleId::new(1), STAFF_ROLE]);
    dispatch(&fake, &fake, &config(), inv).await.expect("must reply");

    let posted = fake.posted();
    assert_eq!(posted.len(), 1, "exactly one message: {posted:?}");
    assert!(posted[0].contains("<@2000>"), "mentions target: {posted:?}");
    assert!(posted[0].contains("<@&952440799570825278>"), "pings role: {posted:?}");
    assert!(posted[0].contains("https://forms.gle/e5X1FNf2gxCrQweg7"), "has form: {posted:?}");

    assert_eq!(
        fake.replies(),
        ["✅ Acceptance message sent to recruit in <#1000>!"],
        "confirmation names user and channel"
    );
}

#[tokio::test]
async fn steamid_via_bot_suffix() {
    let fake = Fake {
        fail_send_via: true,
        ..Fake::default()
    };

    let inv = invocation(RecruitCommand::SteamId, vec![STAFF_ROLE]);
    dispatch(&fake, &fake, &config(), inv).await.expect("must reply");

    assert_eq!(
        fake.replies(),
        ["✅ Steam ID correction sent to recruit in <#1000>! (via bot)"],
        "fallback must be noted"
    );
}

#[tokio::test]
async fn noresponse_reports_hours() {
    let fake = Fake::default();
    let command = RecruitCommand::NoResponse {
        hours: "abc".to_owned(),
    };

    dispatch(&fake, &fake, &config(), invocation(command, vec![STAFF_ROLE]))
        .await
        .expect("must reply");

    let posted = fake.posted();
    assert!(posted.iter().any(|p| p.contains("abc hours")), "{posted:?}");
    assert_eq!(
        fake.replies(),
        ["✅ No response warning sent to recruit with abc hour deadline in <#1000>!"],
        "hours are echoed verbatim"
    );
}

#[tokio::test]
async fn delivery_failure_replies_generic_error() {
    let fake = Fake {
        fail_create: true,
        fail_bot: true,
        ..Fake::default()
    };

    let inv = invocation(RecruitCommand::SteamId, vec![STAFF_ROLE]);
    dispatch(&fake, &fake, &config(), inv).await.expect("must reply");

    assert_eq!(fake.replies(), [INTERNAL_ERROR], "exactly one error reply");
}

#[tokio::test]
async fn welcome_ordering() {
    let fake = Fake::default();
    let inv = invocation(RecruitCommand::Welcome, vec![STAFF_ROLE]);
    dispatch(&fake, &fake, &config(), inv).await.expect("must reply");

    let events = fake.events();
    let position = |pred: fn(&Event) -> bool| events.iter().position(|e| pred(e));

    let defer = position(|e| matches!(e, Event::Defer)).expect("must defer");
    let add = position(|e| matches!(e, Event::SetRoles(_))).expect("must add roles");
    let remove = events
        .iter()
        .rposition(|e| matches!(e, Event::SetRoles(_)))
        .expect("must remove roles");
    let post = position(|e| matches!(e, Event::SendVia(_))).expect("must post");
    let reply = position(|e| matches!(e, Event::Reply(_))).expect("must reply");

    assert!(defer < add && add < remove, "defer before both role updates: {events:?}");
    assert!(remove < post && post < reply, "roles before post before reply: {events:?}");
    assert_eq!(
        fake.replies(),
        ["✅ Welcome message sent to recruit in <#1000>!"],
        "finalized exactly once without caveat"
    );
}

#[tokio::test]
async fn welcome_partial_role_failure() {
    let fake = Fake {
        fail_remove_roles: true,
        ..Fake::default()
    };

    let inv = invocation(RecruitCommand::Welcome, vec![STAFF_ROLE]);
    dispatch(&fake, &fake, &config(), inv).await.expect("must reply");

    assert_eq!(fake.posted().len(), 1, "message is still posted");
    assert_eq!(
        fake.replies(),
        ["✅ Welcome message sent to recruit in <#1000>! (Note: Some role assignments may have failed)"],
        "caveat must be surfaced"
    );
}

#[tokio::test]
async fn welcome_partial_failure_via_bot() {
    let fake = Fake {
        fail_add: true,
        fail_create: true,
        ..Fake::default()
    };

    let inv = invocation(RecruitCommand::Welcome, vec![STAFF_ROLE]);
    dispatch(&fake, &fake, &config(), inv).await.expect("must reply");

    assert_eq!(
        fake.replies(),
        ["✅ Welcome message sent to recruit in <#1000>! (via bot - Note: Some role assignments may have failed)"],
        "both notes combined"
    );
}

#[tokio::test]
async fn welcome_missing_member_reports_failure() {
    let fake = Fake {
        fail_member: true,
        ..Fake::default()
    };

    let inv = invocation(RecruitCommand::Welcome, vec![STAFF_ROLE]);
    dispatch(&fake, &fake, &config(), inv).await.expect("must reply");

    assert!(fake.posted().is_empty(), "nothing posted");
    assert_eq!(
        fake.replies(),
        ["❌ There was an error processing the welcome command for recruit. Please check the logs."],
        "welcome specific failure"
    );
}

#[tokio::test]
async fn role_outcome_flags() {
    let fake = Fake {
        fail_add: true,
        ..Fake::default()
    };

    let outcome = apply_welcome_roles(&fake, GUILD, TARGET, &config().welcome)
        .await
        .expect("member exists");

    assert!(!outcome.added, "add failed");
    assert!(outcome.removed, "remove still attempted and succeeded");
    assert!(!outcome.fully_succeeded(), "partial");
    assert_eq!(
        fake.events().last(),
        Some(&Event::MemberRoles),
        "roles are looked up again afterwards"
    );
    assert!(
        fake.events().contains(&Event::SetRoles(Vec::new())),
        "remove must run against the roles from before the failed add"
    );
}

#[tokio::test]
async fn welcome_roles_replace_full_list() {
    let fake = Fake::default();

    let outcome = apply_welcome_roles(&fake, GUILD, TARGET, &config().welcome)
        .await
        .expect("member exists");

    assert!(outcome.fully_succeeded(), "both updates succeeded");

    let guest = RoleId::new(794754820950720553);
    let member = RoleId::new(633051065960628244);
    let verified = RoleId::new(635774784084377601);
    assert_eq!(
        fake.events(),
        [
            Event::MemberRoles,
            Event::SetRoles(vec![guest, member, verified]),
            Event::SetRoles(vec![member, verified]),
            Event::MemberRoles,
        ],
        "each update carries the whole role list"
    );
}

#[tokio::test]
async fn empty_role_sets_are_skipped() {
    let fake = Fake {
        fail_add: true,
        fail_remove_roles: true,
        ..Fake::default()
    };

    let outcome = apply_welcome_roles(&fake, GUILD, TARGET, &WelcomeRoles::default())
        .await
        .expect("member exists");

    assert!(outcome.fully_succeeded(), "nothing to change is a success");
    assert_eq!(fake.events(), [Event::MemberRoles, Event::MemberRoles], "only lookups");
}

#[test]
fn registers_four_guild_commands() {
    use crate::modules::Module as _;

    let bot = crate::config::BotConfig { recruit: config() };
    let commands: Vec<SCommand> = Module.commands(&bot).into_iter().collect();

    let names: Vec<&str> = commands.iter().map(|c| &*c.name).collect();
    assert_eq!(names, ["steamid", "accepted", "noresponse", "welcome"], "registration order");
    assert!(commands.iter().all(|c| c.guild_only), "no command may run in DMs");

    let noresponse = &commands[2];
    let params: Vec<(&str, bool)> = noresponse
        .parameters
        .iter()
        .map(|p| (&*p.name, p.required))
        .collect();
    assert_eq!(
        params,
        [("user", true), ("time", true), ("channel", false)],
        "user and hours are required, channel is not"
    );
}

#[test]
fn sender_avatar_is_static_png() {
    let mut user = User::default();
    user.id = UserId::new(3000);
    user.avatar = Some("0123456789abcdef0123456789abcdef".parse().expect("valid hash"));

    let url = sender_avatar_url(&user);
    assert_eq!(
        url,
        "https://cdn.discordapp.com/avatars/3000/0123456789abcdef0123456789abcdef.png?size=256",
        "webhook avatars must be a small static image"
    );

    user.avatar = None;
    assert_eq!(sender_avatar_url(&user), user.default_avatar_url(), "falls back to default");
}
