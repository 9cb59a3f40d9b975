//! Message and progress reporting.
//!
//! The engine reports errors and status text through a [`Messenger`]. While
//! the UI is locked, tools run without progress or message output. Locks
//! nest: every `set_locked(true)` needs a matching `set_locked(false)`,
//! which [`UiLock`] takes care of.

use std::cell::{Cell, RefCell};

pub trait Messenger {
    /// Report an error.
    fn error(&self, message: &str);

    /// Report a status or informational message.
    fn message(&self, message: &str);

    /// Increment (`true`) or decrement (`false`) the UI lock count.
    fn set_locked(&self, lock: bool);

    fn is_locked(&self) -> bool;
}

/// Forwards messages to the [`log`] facade.
#[derive(Debug, Default)]
pub struct LogMessenger {
    locks: Cell<usize>,
}

impl LogMessenger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Messenger for LogMessenger {
    fn error(&self, message: &str) {
        log::error!("{message}");
    }

    fn message(&self, message: &str) {
        log::info!("{message}");
    }

    fn set_locked(&self, lock: bool) {
        self.locks.set(next_lock_count(self.locks.get(), lock));
    }

    fn is_locked(&self) -> bool {
        self.locks.get() > 0
    }
}

/// A message captured by [`RecordingMessenger`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    Error(String),
    Info(String),
}

/// Keeps every message for later inspection.
#[derive(Debug, Default)]
pub struct RecordingMessenger {
    messages: RefCell<Vec<Message>>,
    locks: Cell<usize>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.borrow().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter_map(|m| match m {
                Message::Error(text) => Some(text.clone()),
                Message::Info(_) => None,
            })
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter_map(|m| match m {
                Message::Info(text) => Some(text.clone()),
                Message::Error(_) => None,
            })
            .collect()
    }

    pub fn lock_count(&self) -> usize {
        self.locks.get()
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl Messenger for RecordingMessenger {
    fn error(&self, message: &str) {
        log::debug!("recorded error: {message}");
        self.messages
            .borrow_mut()
            .push(Message::Error(message.to_string()));
    }

    fn message(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push(Message::Info(message.to_string()));
    }

    fn set_locked(&self, lock: bool) {
        self.locks.set(next_lock_count(self.locks.get(), lock));
    }

    fn is_locked(&self) -> bool {
        self.locks.get() > 0
    }
}

fn next_lock_count(count: usize, lock: bool) -> usize {
    if lock {
        count + 1
    } else {
        count.saturating_sub(1)
    }
}

/// Scoped UI lock. Locks on creation and unlocks when dropped.
pub struct UiLock<'a> {
    messenger: &'a dyn Messenger,
}

impl<'a> UiLock<'a> {
    pub fn new(messenger: &'a dyn Messenger) -> Self {
        messenger.set_locked(true);
        UiLock { messenger }
    }
}

impl Drop for UiLock<'_> {
    fn drop(&mut self) {
        self.messenger.set_locked(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locks_nest() {
        let messenger = RecordingMessenger::new();
        {
            let _outer = UiLock::new(&messenger);
            {
                let _inner = UiLock::new(&messenger);
                assert_eq!(messenger.lock_count(), 2);
            }
            assert!(messenger.is_locked());
        }
        assert!(!messenger.is_locked());

        messenger.set_locked(false);
        assert_eq!(messenger.lock_count(), 0);
    }

    #[test]
    fn records_messages() {
        let messenger = RecordingMessenger::new();
        messenger.error("boom");
        messenger.message("done");
        assert_eq!(messenger.errors(), ["boom"]);
        assert_eq!(messenger.infos(), ["done"]);
        assert_eq!(messenger.messages().len(), 2);
        messenger.clear();
        assert!(messenger.messages().is_empty());
    }

    #[test]
    fn log_messenger_counts_locks() {
        let messenger = LogMessenger::new();
        let lock = UiLock::new(&messenger);
        assert!(messenger.is_locked());
        drop(lock);
        assert!(!messenger.is_locked());
    }
}
