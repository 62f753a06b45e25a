//! channel membership and user identity for an IRC client.
//!
//! [`Channel`] tracks who is in one channel and with which status prefix, keyed by nick modulo
//! case. [`Roster`] owns every joined channel and keeps one shared [`User`] per participant,
//! applying already-parsed [`MembershipEvent`]s from the protocol layer.

pub mod channel;
pub mod constants;
pub mod logging;
pub mod roster;

pub use channel::{Channel, Member, NamesEntryErr, TopicMeta, User};
pub use roster::{MembershipEvent, Roster, RosterErr, SharedUser};
