//! Identifiers and a simple allocator for change-listener handles.

use serde::{Deserialize, Serialize};

/// Handle returned by `Curve::add_change_listener`; pass it back to unregister.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

/// Monotonic allocator for ListenerId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_listener: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener = self.next_listener.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_listener(), ListenerId(0));
        assert_eq!(alloc.alloc_listener(), ListenerId(1));
        assert_eq!(alloc.alloc_listener(), ListenerId(2));
    }
}
