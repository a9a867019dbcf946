//! Toast notifications.
//!
//! A bounded queue shared by editors and the shell. When full, the oldest
//! toast is dropped.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::editors::EditError;

pub const DEFAULT_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Default)]
struct Queue {
    next_id: u64,
    items: VecDeque<Toast>,
}

/// Cloneable handle over one toast queue.
#[derive(Debug, Clone)]
pub struct Toasts {
    queue: Arc<Mutex<Queue>>,
    capacity: usize,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: Arc::new(Mutex::new(Queue::default())),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let message = message.into();
        let mut queue = self.lock();
        queue.next_id += 1;
        let id = queue.next_id;
        while queue.items.len() >= self.capacity {
            queue.items.pop_front();
        }
        tracing::debug!(id, ?kind, %message, "Toast");
        queue.items.push_back(Toast { id, kind, message });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message)
    }

    /// Report an edit that was rolled back.
    pub fn mutation_failed(&self, error: &EditError) -> u64 {
        self.error(format!("Could not save change: {}", error.user_message()))
    }

    pub fn dismiss(&self, id: u64) -> bool {
        let mut queue = self.lock();
        let before = queue.items.len();
        queue.items.retain(|toast| toast.id != id);
        queue.items.len() != before
    }

    /// Toasts currently shown, oldest first.
    pub fn visible(&self) -> Vec<Toast> {
        self.lock().items.iter().cloned().collect()
    }

    pub fn drain(&self) -> Vec<Toast> {
        self.lock().items.drain(..).collect()
    }
}
