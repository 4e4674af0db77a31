//! In-memory message queue
//!
//! An unbounded FIFO shared between producers (the API) and the single
//! dispatcher that drains it. The queue lives for the process lifetime and
//! is not persisted.
//!
//! ```text
//! ┌─────────┐
//! │ Enqueue │ → [tail ... head] → pop → [Dispatcher]
//! └─────────┘
//! ```

use crate::message::Message;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// FIFO queue of messages waiting to be sent
#[derive(Debug, Default)]
pub struct MessageQueue {
    items: Mutex<VecDeque<Message>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the tail. Always succeeds.
    pub fn push(&self, message: Message) -> bool {
        self.lock().push_back(message);
        true
    }

    /// Remove and return the head, or `None` when empty
    pub fn pop(&self) -> Option<Message> {
        self.lock().pop_front()
    }

    /// Clone of the head without removing it
    pub fn peek(&self) -> Option<Message> {
        self.lock().front().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Critical sections never panic, so a poisoned lock still holds a
    // consistent deque.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Message>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
