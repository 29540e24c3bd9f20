//! Synchronous change listeners for a curve.
//!
//! Curves are edited on one thread, so listeners need not be `Send` and may
//! capture `Rc` state.

use std::fmt;

use crate::ids::{IdAllocator, ListenerId};

type Callback = Box<dyn FnMut()>;

/// Registered listeners, called in registration order.
#[derive(Default)]
pub struct ChangeListeners {
    ids: IdAllocator,
    entries: Vec<(ListenerId, Callback)>,
}

impl ChangeListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut() + 'static,
    {
        let id = self.ids.alloc_listener();
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Returns false when `id` was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn notify(&mut self) {
        for (_, listener) in self.entries.iter_mut() {
            listener();
        }
    }
}

impl fmt::Debug for ChangeListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeListeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
