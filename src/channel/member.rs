use std::{
    borrow::Cow,
    cell::RefCell,
    rc::Rc,
    sync::{Arc, Mutex, PoisonError},
};

/// the case-folded form of a nick. every map keyed by nick uses this form.
pub fn normalize(nick: &str) -> String {
    nick.to_lowercase()
}

/// something that can sit in a [`Channel`](super::Channel): it has a nick, it can be renamed, and
/// its identity is its nick modulo case.
pub trait Member {
    fn nick(&self) -> Cow<'_, str>;

    /// replaces the nick. collections keyed by the old nick are not updated.
    fn set_nick(&mut self, nick: &str);

    fn normalized_nick(&self) -> Cow<'_, str> {
        Cow::Owned(normalize(&self.nick()))
    }

    fn same_nick(&self, nick: &str) -> bool {
        *self.normalized_nick() == *normalize(nick)
    }
}

// shared handles, so one user can be a member of several channels at once

impl<T: Member> Member for Rc<RefCell<T>> {
    fn nick(&self) -> Cow<'_, str> {
        Cow::Owned(self.borrow().nick().into_owned())
    }

    fn set_nick(&mut self, nick: &str) {
        self.borrow_mut().set_nick(nick);
    }

    fn normalized_nick(&self) -> Cow<'_, str> {
        Cow::Owned(self.borrow().normalized_nick().into_owned())
    }
}

impl<T: Member> Member for Arc<Mutex<T>> {
    fn nick(&self) -> Cow<'_, str> {
        let user = self.lock().unwrap_or_else(PoisonError::into_inner);
        Cow::Owned(user.nick().into_owned())
    }

    fn set_nick(&mut self, nick: &str) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_nick(nick);
    }

    fn normalized_nick(&self) -> Cow<'_, str> {
        let user = self.lock().unwrap_or_else(PoisonError::into_inner);
        Cow::Owned(user.normalized_nick().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::User;

    #[test]
    fn shared_handles_see_renames() {
        let user = Rc::new(RefCell::new(User::new("Alice")));
        let mut handle = Rc::clone(&user);
        handle.set_nick("Bob");

        assert_eq!(user.borrow().nick(), "Bob");
        assert_eq!(user.normalized_nick(), "bob");
        assert!(user.same_nick("BOB"));
    }

    #[test]
    fn locked_handles_see_renames() {
        let user = Arc::new(Mutex::new(User::new("Carol")));
        let mut handle = Arc::clone(&user);
        handle.set_nick("Dave");

        assert_eq!(Member::nick(&user), "Dave");
        assert!(user.same_nick("dave"));
        assert!(!user.same_nick("carol"));
    }
}
