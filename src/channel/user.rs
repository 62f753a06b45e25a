use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};
use std::borrow::Cow;

use super::member::{Member, normalize};

/// a participant, identified by their nick modulo case
#[derive(Debug, Clone)]
pub struct User {
    nick: String,
    // always `nick.to_lowercase()`
    normalized: String,
}

impl User {
    pub fn new(nick: impl Into<String>) -> Self {
        let nick: String = nick.into();
        let normalized = normalize(&nick);
        Self { nick, normalized }
    }

    pub fn nick(&self) -> &str {
        self.nick.as_str()
    }

    pub fn normalized_nick(&self) -> &str {
        self.normalized.as_str()
    }

    /// changes the nick in place. a channel holding this user is still keyed by the old nick, use
    /// [`Channel::rename_user`](super::Channel::rename_user) to move it.
    pub fn set_nick(&mut self, nick: impl Into<String>) {
        self.nick = nick.into();
        self.normalized = normalize(&self.nick);
    }
}

impl Member for User {
    fn nick(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.nick.as_str())
    }

    fn set_nick(&mut self, nick: &str) {
        User::set_nick(self, nick);
    }

    fn normalized_nick(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.normalized.as_str())
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for User {}

impl PartialEq<str> for User {
    fn eq(&self, other: &str) -> bool {
        self.normalized == normalize(other)
    }
}

impl PartialEq<&str> for User {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for User {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

// must agree with `PartialEq`, so only the normalized nick is hashed
impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl PartialOrd for User {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for User {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized.cmp(&other.normalized)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nick)
    }
}
