//! Two-slot cache of the keyframe pair used by the last value query.
//!
//! Render loops query frames in increasing order, so most lookups land in
//! the same segment as the previous one, or in the segment right after it.
//! The cursor remembers indices, not keyframes; structural edits must call
//! [`QueryCursor::invalidate`].

use std::cell::Cell;

use crate::keyframe::{Frame, Keyframe};

#[derive(Debug, Default)]
pub struct QueryCursor {
    previous: Cell<Option<usize>>,
    next: Cell<Option<usize>>,
}

impl QueryCursor {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn invalidate(&self) {
        self.previous.set(None);
        self.next.set(None);
    }

    /// Cached (previous, next) pair, if any.
    #[inline]
    pub fn cached(&self) -> Option<(usize, Option<usize>)> {
        self.previous.get().map(|p| (p, self.next.get()))
    }

    /// Index of the last key with `key.frame <= frame`, or None before the
    /// first key. Serves from the cached pair when possible.
    pub fn floor_index(&self, keys: &[Keyframe], frame: Frame) -> Option<usize> {
        if let Some(idx) = self.lookup_cached(keys, frame) {
            return Some(idx);
        }
        let idx = keys.partition_point(|k| k.frame <= frame).checked_sub(1)?;
        self.remember(keys, idx);
        Some(idx)
    }

    fn lookup_cached(&self, keys: &[Keyframe], frame: Frame) -> Option<usize> {
        let (prev, next) = self.cached()?;
        let prev_key = keys.get(prev)?;
        if frame < prev_key.frame {
            return None;
        }
        match next {
            None => Some(prev),
            Some(next) => {
                let next_key = keys.get(next)?;
                if frame < next_key.frame {
                    return Some(prev);
                }
                // Step forward one pair: the common case when the query crosses a key.
                let after = keys.get(next + 1).map(|k| k.frame);
                if after.map_or(true, |f| frame < f) {
                    self.remember(keys, next);
                    return Some(next);
                }
                None
            }
        }
    }

    #[inline]
    fn remember(&self, keys: &[Keyframe], prev: usize) {
        self.previous.set(Some(prev));
        self.next.set((prev + 1 < keys.len()).then_some(prev + 1));
    }
}
