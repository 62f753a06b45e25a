mod channel;
mod member;
pub mod prefix;
mod user;

pub use channel::{Channel, TopicMeta};
pub use member::{Member, normalize};
pub use prefix::NamesEntryErr;
pub use user::User;
