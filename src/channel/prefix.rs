//! helpers for membership prefix strings such as `"@+"`.
//!
//! privilege is never stored as a flag: a prefix string is kept as-is and queried for marker
//! characters, so servers that send several markers at once (`multi-prefix`) or invent new ones
//! need no special handling.

use thiserror::Error;

use crate::constants::names::{CHANNEL_MEMBERSHIP_PREFIXES, MODE_PREFIXES};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamesEntryErr {
    #[error("empty NAMES entry")]
    Empty,
    #[error("NAMES entry {:?} has prefixes but no nick", .0)]
    MissingNick(String),
}

/// splits a NAMES entry into its prefix and nick, e.g. `"@+alice"` becomes `("@+", "alice")`.
/// `userhost-in-names` entries (`nick!user@host`) have the userhost dropped.
pub fn split_names_entry(entry: &str) -> Result<(&str, &str), NamesEntryErr> {
    if entry.is_empty() {
        return Err(NamesEntryErr::Empty);
    }

    let nick_start = entry
        .find(|c: char| !CHANNEL_MEMBERSHIP_PREFIXES.contains(&c))
        .ok_or_else(|| NamesEntryErr::MissingNick(entry.to_string()))?;
    let (prefix, rest) = entry.split_at(nick_start);

    let nick = match rest.split_once('!') {
        Some((nick, _)) => nick,
        None => rest,
    };
    if nick.is_empty() {
        return Err(NamesEntryErr::MissingNick(entry.to_string()));
    }

    Ok((prefix, nick))
}

/// the prefix character granted by a channel mode letter, if it is a membership mode
pub fn mode_prefix(mode: char) -> Option<char> {
    MODE_PREFIXES
        .iter()
        .find(|(m, _)| *m == mode)
        .map(|(_, prefix)| *prefix)
}

// unknown prefix characters sort after the known ones
fn rank(c: char) -> usize {
    CHANNEL_MEMBERSHIP_PREFIXES
        .iter()
        .position(|p| *p == c)
        .unwrap_or(CHANNEL_MEMBERSHIP_PREFIXES.len())
}

/// adds `c` to a prefix string, keeping the highest rank first
pub fn add_prefix_char(prefix: &str, c: char) -> String {
    if prefix.contains(c) {
        return prefix.to_string();
    }

    let mut chars = prefix.chars().chain([c]).collect::<Vec<_>>();
    chars.sort_by_key(|c| rank(*c));
    chars.into_iter().collect()
}

pub fn remove_prefix_char(prefix: &str, c: char) -> String {
    prefix.chars().filter(|p| *p != c).collect()
}
