use std::collections::HashMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::{
    member::{Member, normalize},
    prefix,
    user::User,
};
use crate::constants::names::{OP_PREFIX, VOICE_PREFIX};

/// who set the current topic, and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMeta {
    pub set_by: String,
    pub set_at: DateTime<Utc>,
}

/// the members of one channel and their status prefixes.
///
/// both maps are keyed by the normalized nick, never by the member itself, since a member's
/// identity changes when it is renamed. a member that was renamed outside of
/// [`Channel::rename_user`] is still found under its old nick.
#[derive(Debug)]
pub struct Channel<U = User> {
    name: String,
    topic: String,
    topic_meta: Option<TopicMeta>,
    members: IndexMap<String, U>,
    // keys are always a subset of the keys of `members`
    prefixes: HashMap<String, String>,
    tracks_prefixes: bool,
}

impl<U: Member> Channel<U> {
    /// creates an empty channel that records a prefix for each member
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            topic: String::new(),
            topic_meta: None,
            members: IndexMap::new(),
            prefixes: HashMap::new(),
            tracks_prefixes: true,
        }
    }

    /// creates an empty channel that only tracks membership. prefixes passed to it are dropped,
    /// and every prefix query sees `""`.
    pub fn without_prefixes(name: impl Into<String>) -> Self {
        Self {
            tracks_prefixes: false,
            ..Self::new(name)
        }
    }

    pub fn tracks_prefixes(&self) -> bool {
        self.tracks_prefixes
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn topic(&self) -> &str {
        self.topic.as_str()
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
    }

    pub fn topic_meta(&self) -> Option<&TopicMeta> {
        self.topic_meta.as_ref()
    }

    pub fn set_topic_meta(&mut self, set_by: impl Into<String>, set_at: DateTime<Utc>) {
        self.topic_meta = Some(TopicMeta {
            set_by: set_by.into(),
            set_at,
        });
    }

    /// adds a member, replacing any member with the same nick. returns the replaced member.
    pub fn add_user(&mut self, user: U, prefix: impl Into<String>) -> Option<U> {
        let key = user.normalized_nick().into_owned();
        if self.tracks_prefixes {
            self.prefixes.insert(key.clone(), prefix.into());
        }
        self.members.insert(key, user)
    }

    pub fn user(&self, nick: &str) -> Option<&U> {
        self.members.get(&normalize(nick))
    }

    pub fn contains(&self, nick: &str) -> bool {
        self.members.contains_key(&normalize(nick))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn remove_user(&mut self, user: &U) -> Option<U> {
        self.remove_key(&user.normalized_nick())
    }

    pub fn remove_nick(&mut self, nick: &str) -> Option<U> {
        self.remove_key(&normalize(nick))
    }

    fn remove_key(&mut self, key: &str) -> Option<U> {
        self.prefixes.remove(key);
        self.members.shift_remove(key)
    }

    /// moves the member known as `old` to `new`, renaming it and keeping its prefix and position.
    /// does nothing if `old` is not a member.
    pub fn rename_user(&mut self, old: &str, new: &str) {
        let old_key = normalize(old);
        let Some((mut index, _, mut user)) = self.members.shift_remove_full(&old_key) else {
            return;
        };
        let prefix = self.prefixes.remove(&old_key);

        user.set_nick(new);
        let new_key = user.normalized_nick().into_owned();

        match prefix {
            Some(prefix) => {
                self.prefixes.insert(new_key.clone(), prefix);
            }
            // don't leave a prefix behind from a member that was overwritten by the rename
            None => {
                self.prefixes.remove(&new_key);
            }
        }

        // a member already known as `new` is stale, the renamed member takes over its nick
        if let Some((displaced, _, _)) = self.members.shift_remove_full(&new_key) {
            if displaced < index {
                index -= 1;
            }
        }
        self.members.shift_insert(index, new_key, user);
    }

    /// a snapshot of the members, in the order they were added
    pub fn users(&self) -> Vec<&U> {
        self.members.values().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &U> {
        self.members.values()
    }

    /// the members ordered by normalized nick
    pub fn sorted_users(&self) -> Vec<&U> {
        let mut members = self.members.iter().collect::<Vec<_>>();
        members.sort_by(|(a, _), (b, _)| a.cmp(b));
        members.into_iter().map(|(_, user)| user).collect()
    }

    /// the prefix recorded for `nick`, or `""` if there is none
    pub fn user_prefix(&self, nick: &str) -> &str {
        self.prefix_for_key(&normalize(nick))
    }

    pub fn member_prefix(&self, user: &U) -> &str {
        self.prefix_for_key(&user.normalized_nick())
    }

    fn prefix_for_key(&self, key: &str) -> &str {
        self.prefixes.get(key).map(String::as_str).unwrap_or("")
    }

    /// replaces the prefix of `nick`, but only if a prefix is already recorded for it.
    ///
    /// every member added through [`Channel::add_user`] has an entry, so this only refuses nicks
    /// that are not members. it keeps mode changes for unknown nicks from inventing prefix entries
    /// that no member backs.
    pub fn set_user_prefix(&mut self, nick: &str, prefix: impl Into<String>) {
        if let Some(current) = self.prefixes.get_mut(&normalize(nick)) {
            *current = prefix.into();
        }
    }

    pub fn set_member_prefix(&mut self, user: &U, prefix: impl Into<String>) {
        if let Some(current) = self.prefixes.get_mut(&*user.normalized_nick()) {
            *current = prefix.into();
        }
    }

    /// folds a membership mode change (such as `+o` or `-v`) into the prefix of `nick`. returns
    /// whether the prefix was updated; non-membership modes and nicks without a prefix entry are
    /// ignored.
    pub fn apply_mode(&mut self, nick: &str, adding: bool, mode: char) -> bool {
        let Some(c) = prefix::mode_prefix(mode) else {
            return false;
        };
        let Some(current) = self.prefixes.get_mut(&normalize(nick)) else {
            return false;
        };

        *current = if adding {
            prefix::add_prefix_char(current, c)
        } else {
            prefix::remove_prefix_char(current, c)
        };
        true
    }

    pub fn is_op(&self, nick: &str) -> bool {
        self.user_prefix(nick).contains(OP_PREFIX)
    }

    pub fn is_member_op(&self, user: &U) -> bool {
        self.member_prefix(user).contains(OP_PREFIX)
    }

    pub fn has_voice(&self, nick: &str) -> bool {
        self.user_prefix(nick).contains(VOICE_PREFIX)
    }

    pub fn member_has_voice(&self, user: &U) -> bool {
        self.member_prefix(user).contains(VOICE_PREFIX)
    }

    pub fn ops(&self) -> Vec<&U> {
        self.with_prefix_char(OP_PREFIX)
    }

    pub fn voiced(&self) -> Vec<&U> {
        self.with_prefix_char(VOICE_PREFIX)
    }

    fn with_prefix_char(&self, c: char) -> Vec<&U> {
        self.members
            .iter()
            .filter(|(key, _)| self.prefix_for_key(key).contains(c))
            .map(|(_, user)| user)
            .collect()
    }
}
