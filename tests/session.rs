use std::rc::Rc;

use eyre::{Result, eyre};
use irc_membership::{Channel, MembershipEvent, Roster, RosterErr, User};

fn s(value: &str) -> String {
    value.to_string()
}

#[test]
fn session_replay() -> Result<()> {
    let mut roster = Roster::new("bot");
    let events = [
        MembershipEvent::Join {
            channel: s("#Rust"),
            nick: s("bot"),
        },
        MembershipEvent::Names {
            channel: s("#rust"),
            entries: vec![s("@bot"), s("@+Ferris"), s("+Alice"), s("carol")],
        },
        MembershipEvent::Join {
            channel: s("#offtopic"),
            nick: s("bot"),
        },
        MembershipEvent::Names {
            channel: s("#offtopic"),
            entries: vec![s("bot"), s("alice")],
        },
        MembershipEvent::Join {
            channel: s("#rust"),
            nick: s("dave"),
        },
        MembershipEvent::Mode {
            channel: s("#rust"),
            nick: s("carol"),
            adding: true,
            mode: 'o',
        },
        MembershipEvent::Nick {
            old: s("alice"),
            new: s("Alicia"),
        },
        MembershipEvent::Part {
            channel: s("#rust"),
            nick: s("dave"),
        },
        MembershipEvent::Quit { nick: s("ferris") },
    ];
    for event in &events {
        roster.apply(event)?;
    }

    let rust = roster.channel("#RUST").ok_or_else(|| eyre!("#rust missing"))?;
    let mut nicks = rust
        .sorted_users()
        .into_iter()
        .map(|user| user.borrow().nick().to_string())
        .collect::<Vec<_>>();
    nicks.sort();
    assert_eq!(nicks, ["Alicia", "bot", "carol"]);
    assert!(rust.is_op("carol"));
    assert!(rust.has_voice("alicia"));
    assert!(!rust.has_voice("alice"));

    let alicia = roster.user("ALICIA").ok_or_else(|| eyre!("alicia missing"))?;
    let offtopic = roster
        .channel("#offtopic")
        .ok_or_else(|| eyre!("#offtopic missing"))?;
    assert!(
        offtopic
            .user("alicia")
            .is_some_and(|user| Rc::ptr_eq(user, &alicia))
    );

    assert!(roster.user("ferris").is_none());
    assert!(roster.user("dave").is_none());
    assert_eq!(roster.user_count(), 3);
    Ok(())
}

#[test]
fn errors_only_for_unjoined_channels() {
    let mut roster = Roster::new("bot");
    let err = roster.apply(&MembershipEvent::Part {
        channel: s("#nowhere"),
        nick: s("bot"),
    });
    assert_eq!(err, Err(RosterErr::NotJoined(s("#nowhere"))));

    // unknown users are not errors
    assert!(
        roster
            .apply(&MembershipEvent::Quit { nick: s("ghost") })
            .is_ok()
    );
}

#[test]
fn standalone_channel_properties() {
    let mut channel = Channel::new("#rust");
    channel.add_user(User::new("Alice"), "@");

    assert_eq!(channel.user("alice"), channel.user("ALICE"));
    assert_eq!(channel.user_prefix("aLiCe"), "@");

    let users = channel.users();
    assert_eq!(users.len(), 1);
    assert_eq!(*users[0], User::new("alice"));

    channel.set_user_prefix("x", "@");
    assert_eq!(channel.user_prefix("x"), "");

    channel.rename_user("Alice", "Bob");
    assert_eq!(channel.user("bob").map(User::nick), Some("Bob"));
    assert_eq!(channel.user_prefix("bob"), "@");

    let removed = channel.remove_user(&User::new("BOB"));
    assert!(removed.is_some());
    assert!(channel.user("bob").is_none());
    assert_eq!(channel.user_prefix("bob"), "");
}
