use std::{cell::RefCell, collections::HashMap, rc::Rc};

use chrono::{DateTime, Utc};
use log::*;
use thiserror::Error;

use crate::channel::{Channel, Member, User, normalize, prefix};

/// a user handle shared between every channel the user is in
pub type SharedUser = Rc<RefCell<User>>;

/// a membership change, already parsed out of the protocol message that carried it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipEvent {
    Join {
        channel: String,
        nick: String,
    },
    Part {
        channel: String,
        nick: String,
    },
    Kick {
        channel: String,
        nick: String,
    },
    Quit {
        nick: String,
    },
    Nick {
        old: String,
        new: String,
    },
    /// a single membership mode change, e.g. `+o alice` is `adding: true, mode: 'o'`
    Mode {
        channel: String,
        nick: String,
        adding: bool,
        mode: char,
    },
    /// replaces a member's whole prefix string
    Prefix {
        channel: String,
        nick: String,
        prefix: String,
    },
    /// entries of a NAMES reply, with their prefixes still attached (`@alice`)
    Names {
        channel: String,
        entries: Vec<String>,
    },
    Topic {
        channel: String,
        topic: String,
        set_by: Option<String>,
    },
    /// who set the topic, and when, in seconds since the unix epoch
    TopicWhoTime {
        channel: String,
        set_by: String,
        set_at: i64,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterErr {
    #[error("not joined to channel {}", .0)]
    NotJoined(String),
    #[error("already joined channel {}", .0)]
    AlreadyJoined(String),
}

/// every channel the client is in, and the users seen in them.
///
/// each user exists once no matter how many channels they share with the client, and is dropped
/// once they are in none of them.
#[derive(Debug)]
pub struct Roster {
    own_nick: String,
    channels: HashMap<String, Channel<SharedUser>>,
    users: HashMap<String, SharedUser>,
}

impl Roster {
    pub fn new(own_nick: impl Into<String>) -> Self {
        Self {
            own_nick: own_nick.into(),
            channels: HashMap::new(),
            users: HashMap::new(),
        }
    }

    pub fn own_nick(&self) -> &str {
        self.own_nick.as_str()
    }

    pub fn is_own_nick(&self, nick: &str) -> bool {
        normalize(nick) == normalize(&self.own_nick)
    }

    pub fn channel(&self, name: &str) -> Option<&Channel<SharedUser>> {
        self.channels.get(&normalize(name))
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel<SharedUser>> {
        self.channels.values()
    }

    pub fn user(&self, nick: &str) -> Option<SharedUser> {
        self.users.get(&normalize(nick)).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// the names of the channels `nick` is a member of
    pub fn channels_of(&self, nick: &str) -> Vec<&str> {
        self.channels
            .values()
            .filter(|channel| channel.contains(nick))
            .map(Channel::name)
            .collect()
    }

    pub fn apply(&mut self, event: &MembershipEvent) -> Result<(), RosterErr> {
        trace!("applying {:?}", event);
        match event {
            MembershipEvent::Join { channel, nick } => self.join(channel, nick),
            MembershipEvent::Part { channel, nick } | MembershipEvent::Kick { channel, nick } => {
                self.leave(channel, nick)
            }
            MembershipEvent::Quit { nick } => {
                self.quit(nick);
                Ok(())
            }
            MembershipEvent::Nick { old, new } => {
                self.rename(old, new);
                Ok(())
            }
            MembershipEvent::Mode {
                channel,
                nick,
                adding,
                mode,
            } => {
                let target = self.joined_mut(channel)?;
                if !target.apply_mode(nick, *adding, *mode) {
                    debug!(
                        "ignoring mode {}{} for {} in {}",
                        if *adding { '+' } else { '-' },
                        mode,
                        nick,
                        channel
                    );
                }
                Ok(())
            }
            MembershipEvent::Prefix {
                channel,
                nick,
                prefix,
            } => {
                self.joined_mut(channel)?
                    .set_user_prefix(nick, prefix.as_str());
                Ok(())
            }
            MembershipEvent::Names { channel, entries } => self.names(channel, entries),
            MembershipEvent::Topic {
                channel,
                topic,
                set_by,
            } => {
                let target = self.joined_mut(channel)?;
                target.set_topic(topic.as_str());
                if let Some(set_by) = set_by {
                    target.set_topic_meta(set_by.as_str(), Utc::now());
                }
                Ok(())
            }
            MembershipEvent::TopicWhoTime {
                channel,
                set_by,
                set_at,
            } => {
                let target = self.joined_mut(channel)?;
                match DateTime::<Utc>::from_timestamp(*set_at, 0) {
                    Some(set_at) => target.set_topic_meta(set_by.as_str(), set_at),
                    None => warn!("topic time {} for {} is out of range", set_at, channel),
                }
                Ok(())
            }
        }
    }

    fn joined_mut(&mut self, channel: &str) -> Result<&mut Channel<SharedUser>, RosterErr> {
        self.channels
            .get_mut(&normalize(channel))
            .ok_or_else(|| RosterErr::NotJoined(channel.to_string()))
    }

    fn join(&mut self, channel: &str, nick: &str) -> Result<(), RosterErr> {
        let key = normalize(channel);
        if self.is_own_nick(nick) {
            if self.channels.contains_key(&key) {
                return Err(RosterErr::AlreadyJoined(channel.to_string()));
            }
            debug!("joined {}", channel);
            self.channels.insert(key.clone(), Channel::new(channel));
        }

        let Roster {
            channels, users, ..
        } = self;
        let target = channels
            .get_mut(&key)
            .ok_or_else(|| RosterErr::NotJoined(channel.to_string()))?;
        target.add_user(shared_user(users, nick), "");
        Ok(())
    }

    fn leave(&mut self, channel: &str, nick: &str) -> Result<(), RosterErr> {
        let key = normalize(channel);
        if self.is_own_nick(nick) {
            if self.channels.remove(&key).is_none() {
                return Err(RosterErr::NotJoined(channel.to_string()));
            }
            debug!("left {}", channel);
        } else if self.joined_mut(channel)?.remove_nick(nick).is_none() {
            debug!("{} left {} without being a member", nick, channel);
        }

        self.prune_users();
        Ok(())
    }

    fn quit(&mut self, nick: &str) {
        if self.is_own_nick(nick) {
            debug!("quit, forgetting {} channels", self.channels.len());
            self.channels.clear();
            self.users.clear();
            return;
        }

        for channel in self.channels.values_mut() {
            channel.remove_nick(nick);
        }
        if self.users.remove(&normalize(nick)).is_none() {
            debug!("quit from unknown user {}", nick);
        }
    }

    fn rename(&mut self, old: &str, new: &str) {
        if self.is_own_nick(old) {
            self.own_nick = new.to_string();
        }

        let old_key = normalize(old);
        let new_key = normalize(new);
        let Some(mut user) = self.users.remove(&old_key) else {
            debug!("nick change from unknown user {} to {}", old, new);
            return;
        };

        // whoever we still had as `new` is stale. channels holding both are handled by the
        // rename, the rest must drop it so no second handle for `new` survives.
        if new_key != old_key && self.users.remove(&new_key).is_some() {
            debug!("{} took the nick of tracked user {}", old, new);
            for channel in self.channels.values_mut() {
                if !channel.contains(old) {
                    channel.remove_nick(new);
                }
            }
        }

        for channel in self.channels.values_mut() {
            channel.rename_user(old, new);
        }
        // also covers a user that is no longer in any channel
        user.set_nick(new);
        self.users.insert(new_key, user);
    }

    fn names(&mut self, channel: &str, entries: &[String]) -> Result<(), RosterErr> {
        let key = normalize(channel);
        let Roster {
            channels, users, ..
        } = self;
        let target = channels
            .get_mut(&key)
            .ok_or_else(|| RosterErr::NotJoined(channel.to_string()))?;

        for entry in entries {
            match prefix::split_names_entry(entry) {
                Ok((prefix, nick)) => {
                    target.add_user(shared_user(users, nick), prefix);
                }
                Err(e) => warn!("skipping NAMES entry for {}: {}", channel, e),
            }
        }
        Ok(())
    }

    fn prune_users(&mut self) {
        let channels = &self.channels;
        self.users.retain(|key, _| {
            channels
                .values()
                .any(|channel| channel.contains(key.as_str()))
        });
    }
}

fn shared_user(users: &mut HashMap<String, SharedUser>, nick: &str) -> SharedUser {
    let user = users
        .entry(normalize(nick))
        .or_insert_with(|| Rc::new(RefCell::new(User::new(nick))));
    Rc::clone(user)
}
