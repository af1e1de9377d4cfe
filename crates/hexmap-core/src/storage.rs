//! Persistence port.
//!
//! The engine saves its serialized state after every mutation and reads it
//! back in [`MapEngine::init`](crate::engine::MapEngine::init). Front ends
//! supply the backing store (browser storage, a file, ...).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A single-slot string store
pub trait Storage {
    /// The last saved state, if any
    fn load_string(&self) -> Option<String>;

    /// Replace the saved state
    fn save_string(&mut self, data: &str);
}

/// In-memory store. Clones share the same slot, so a test can keep a handle
/// while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Rc<RefCell<Option<String>>>,
    saves: Rc<Cell<usize>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `data`
    pub fn with_data(data: impl Into<String>) -> Self {
        let storage = Self::new();
        *storage.data.borrow_mut() = Some(data.into());
        storage
    }

    /// Current contents
    pub fn contents(&self) -> Option<String> {
        self.data.borrow().clone()
    }

    /// Number of saves so far
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl Storage for MemoryStorage {
    fn load_string(&self) -> Option<String> {
        self.contents()
    }

    fn save_string(&mut self, data: &str) {
        *self.data.borrow_mut() = Some(data.to_string());
        self.saves.set(self.saves.get() + 1);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStorage;

impl Storage for NullStorage {
    fn load_string(&self) -> Option<String> {
        None
    }

    fn save_string(&mut self, _data: &str) {}
}
