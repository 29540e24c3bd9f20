//! Curve container: the sorted keyframe set for one animated scalar.
//!
//! Keys live in a single `Vec` sorted by frame. Binary search serves the
//! frame lookups and the same vector serves index-based editing, so there is
//! one owner and nothing to keep in lockstep. Every edit re-samples only the
//! segments it touches and then notifies listeners once.

use std::ops::Range;

use crate::config::CurveConfig;
use crate::cursor::QueryCursor;
use crate::error::CurveError;
use crate::ids::ListenerId;
use crate::keyframe::{clamp_percent, Frame, Keyframe};
use crate::notify::ChangeListeners;
use crate::segment::sample_segment;
use crate::stored_curve::{parse_stored_curve_json, CurveState, KeyframeState};
use crate::tangent;
use crate::Result;

#[derive(Debug, Default)]
pub struct Curve {
    name: String,
    config: CurveConfig,
    keys: Vec<Keyframe>,
    cursor: QueryCursor,
    listeners: ChangeListeners,
}

impl Curve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CurveConfig) -> Self {
        Self {
            config: config.sanitized(),
            ..Self::default()
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a curve from a persisted snapshot; see [`Curve::restore`].
    pub fn from_state(state: CurveState) -> Self {
        let mut curve = Self::default();
        curve.restore(state);
        curve
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    pub fn config(&self) -> &CurveConfig {
        &self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keyframes in frame order.
    #[inline]
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Keyframe> {
        self.keys.iter()
    }

    pub fn key(&self, index: usize) -> Result<&Keyframe> {
        self.check_index(index)?;
        Ok(&self.keys[index])
    }

    /// Index of the key exactly at `frame`.
    pub fn index_of(&self, frame: Frame) -> Option<usize> {
        self.keys.binary_search_by_key(&frame, |k| k.frame).ok()
    }

    /// Index of the last key at or before `frame`.
    pub fn previous_index(&self, frame: Frame) -> Option<usize> {
        self.keys
            .partition_point(|k| k.frame <= frame)
            .checked_sub(1)
    }

    /// Index of the first key strictly after `frame`.
    pub fn next_index(&self, frame: Frame) -> Option<usize> {
        let idx = self.keys.partition_point(|k| k.frame <= frame);
        (idx < self.keys.len()).then_some(idx)
    }

    /// First keyed frame, or 0 when empty.
    pub fn first_frame(&self) -> Frame {
        self.keys.first().map_or(0, |k| k.frame)
    }

    /// Last keyed frame, or 0 when empty.
    pub fn last_frame(&self) -> Frame {
        self.keys.last().map_or(0, |k| k.frame)
    }

    // ----- Value queries -----

    /// Value of the curve at `frame`.
    ///
    /// Flat before the first key and after the last; exactly the authored
    /// value on a key; otherwise the cached segment sample. An empty curve
    /// reads as 0.
    pub fn interpolated_value(&self, frame: Frame) -> f64 {
        let Some(first) = self.keys.first() else {
            return 0.0;
        };
        let Some(idx) = self.cursor.floor_index(&self.keys, frame) else {
            return first.value;
        };
        let key = &self.keys[idx];
        if idx + 1 == self.keys.len() {
            return key.value;
        }
        let offset = (i64::from(frame) - i64::from(key.frame)) as usize;
        key.sample_at(offset)
    }

    /// Largest value across keys, handles and sampled segments (0 when empty).
    pub fn maximum_value(&self) -> f64 {
        self.fold_extreme(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest value across keys, handles and sampled segments (0 when empty).
    pub fn minimum_value(&self) -> f64 {
        self.fold_extreme(f64::INFINITY, f64::min)
    }

    fn fold_extreme(&self, init: f64, pick: fn(f64, f64) -> f64) -> f64 {
        if self.keys.is_empty() {
            return 0.0;
        }
        self.keys.iter().fold(init, |acc, k| {
            let acc = pick(acc, k.value);
            let acc = pick(acc, k.in_handle_value);
            let acc = pick(acc, k.out_handle_value);
            let acc = pick(acc, k.segment_min);
            pick(acc, k.segment_max)
        })
    }

    /// (min, max) of the curve over the inclusive frame window.
    ///
    /// Segments entirely inside the window use their cached bounds; partial
    /// segments scan only the covered samples. None when the curve is empty
    /// or `end < start`.
    pub fn value_range(&self, start: Frame, end: Frame) -> Option<(f64, f64)> {
        if self.keys.is_empty() || end < start {
            return None;
        }
        let mut lo = self.interpolated_value(start);
        let mut hi = lo;
        let end_value = self.interpolated_value(end);
        lo = lo.min(end_value);
        hi = hi.max(end_value);

        let first = self.previous_index(start).unwrap_or(0);
        for (idx, key) in self.keys.iter().enumerate().skip(first) {
            if key.frame > end {
                break;
            }
            let Some(next) = self.keys.get(idx + 1) else {
                if key.frame >= start {
                    lo = lo.min(key.value);
                    hi = hi.max(key.value);
                }
                break;
            };
            if key.frame >= start && next.frame <= end {
                lo = lo.min(key.segment_min);
                hi = hi.max(key.segment_max);
                continue;
            }
            let from = i64::from(start.max(key.frame)) - i64::from(key.frame);
            let to = i64::from(end.min(next.frame - 1)) - i64::from(key.frame);
            for offset in from..=to {
                let v = key.sample_at(offset as usize);
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        Some((lo, hi))
    }

    // ----- Structural edits -----

    /// Insert a key at `frame` whose value is the curve's current value there,
    /// so the curve does not jump at that frame. Returns the key's index.
    pub fn add_key(&mut self, frame: Frame) -> usize {
        let value = self.interpolated_value(frame);
        self.add_key_with_value(frame, value)
    }

    /// Insert a key at `frame`, replacing any key already on that frame.
    /// Locked neighbours are re-mirrored for their new intervals.
    pub fn add_key_with_value(&mut self, frame: Frame, value: f64) -> usize {
        let key = Keyframe::new(
            frame,
            value,
            self.config.default_handle_percent,
            self.config.lock_new_keys,
        );
        let index = match self.keys.binary_search_by_key(&frame, |k| k.frame) {
            Ok(idx) => {
                self.keys[idx] = key;
                idx
            }
            Err(idx) => {
                self.keys.insert(idx, key);
                idx
            }
        };
        self.cursor.invalidate();
        let around = index.saturating_sub(1)..index + 2;
        self.relock(around.clone());
        self.refresh_range(around);
        log::debug!("curve '{}': key added at frame {frame}", self.name);
        self.listeners.notify();
        index
    }

    /// Remove and return the key at `index`.
    pub fn remove_key(&mut self, index: usize) -> Result<Keyframe> {
        self.check_index(index)?;
        let removed = self.keys.remove(index);
        self.cursor.invalidate();
        let around = index.saturating_sub(1)..index + 1;
        self.relock(around.clone());
        self.refresh_range(around);
        log::debug!(
            "curve '{}': key removed at frame {}",
            self.name,
            removed.frame
        );
        self.listeners.notify();
        Ok(removed)
    }

    /// Move a key along the timeline, clamped strictly between its neighbours.
    /// Returns the frame actually applied. The moved key and its locked
    /// neighbours are re-mirrored.
    pub fn set_frame(&mut self, index: usize, frame: Frame) -> Result<Frame> {
        self.check_index(index)?;
        let lower = index
            .checked_sub(1)
            .map_or(Frame::MIN, |prev| self.keys[prev].frame.saturating_add(1));
        let upper = self
            .keys
            .get(index + 1)
            .map_or(Frame::MAX, |next| next.frame.saturating_sub(1));
        let applied = frame.clamp(lower, upper);
        self.keys[index].frame = applied;
        self.cursor.invalidate();
        let around = index.saturating_sub(1)..index + 2;
        self.relock(around.clone());
        self.refresh_range(around);
        self.listeners.notify();
        Ok(applied)
    }

    /// Reassign every key's frame. `frames` is sorted first and then applied
    /// by index, so the key order never changes.
    pub fn set_frames(&mut self, frames: &[Frame]) -> Result<()> {
        if frames.len() != self.keys.len() {
            return Err(CurveError::FrameCountMismatch {
                expected: self.keys.len(),
                actual: frames.len(),
            });
        }
        let mut sorted = frames.to_vec();
        sorted.sort_unstable();
        if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(CurveError::DuplicateFrame { frame: pair[0] });
        }
        for (key, frame) in self.keys.iter_mut().zip(sorted) {
            key.frame = frame;
        }
        self.cursor.invalidate();
        self.relock(0..self.keys.len());
        self.refresh_all();
        self.listeners.notify();
        Ok(())
    }

    /// Remove every key.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.cursor.invalidate();
        self.listeners.notify();
    }

    // ----- Value and handle edits -----

    /// Change a key's value, carrying both handles along by the same delta.
    pub fn set_value(&mut self, index: usize, value: f64) -> Result<()> {
        self.check_index(index)?;
        self.keys[index].shift_value(value);
        self.refresh_around(index);
        self.listeners.notify();
        Ok(())
    }

    /// Set the in handle by absolute frame; the frame is converted to a
    /// percent of the interval back to the previous key.
    pub fn set_in(&mut self, index: usize, frame: Frame, value: f64) -> Result<()> {
        self.check_index(index)?;
        let percent = match index.checked_sub(1) {
            Some(prev) => {
                let key_frame = f64::from(self.keys[index].frame);
                let span = key_frame - f64::from(self.keys[prev].frame);
                (key_frame - f64::from(frame)) / span
            }
            None => self.keys[index].in_handle_percent,
        };
        self.apply_in(index, percent, value);
        Ok(())
    }

    pub fn set_in_percent(&mut self, index: usize, percent: f64, value: f64) -> Result<()> {
        self.check_index(index)?;
        self.apply_in(index, percent, value);
        Ok(())
    }

    /// Set the out handle by absolute frame; the frame is converted to a
    /// percent of the interval forward to the next key.
    pub fn set_out(&mut self, index: usize, frame: Frame, value: f64) -> Result<()> {
        self.check_index(index)?;
        let percent = match self.keys.get(index + 1) {
            Some(next) => {
                let key_frame = f64::from(self.keys[index].frame);
                let span = f64::from(next.frame) - key_frame;
                (f64::from(frame) - key_frame) / span
            }
            None => self.keys[index].out_handle_percent,
        };
        self.apply_out(index, percent, value);
        Ok(())
    }

    pub fn set_out_percent(&mut self, index: usize, percent: f64, value: f64) -> Result<()> {
        self.check_index(index)?;
        self.apply_out(index, percent, value);
        Ok(())
    }

    /// Lock or unlock the handle pair. Locking mirrors the in handle onto the
    /// out handle straight away.
    pub fn set_lock_in_out(&mut self, index: usize, lock: bool) -> Result<()> {
        self.check_index(index)?;
        self.keys[index].lock_in_out = lock;
        if lock && tangent::mirror_in_to_out(&mut self.keys, index) {
            self.refresh_segment(index);
        }
        self.listeners.notify();
        Ok(())
    }

    /// Auto-shape the key's handles from its neighbours. The handles come
    /// out mirrored whether or not the key is locked.
    pub fn smooth(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        tangent::smooth(&mut self.keys, index, self.config.default_handle_percent);
        self.refresh_around(index);
        self.listeners.notify();
        Ok(())
    }

    /// Multiply every value and handle value by `factor`.
    pub fn scale_values(&mut self, factor: f64) {
        for key in self.keys.iter_mut() {
            key.scale(factor);
        }
        self.refresh_all();
        self.listeners.notify();
    }

    fn apply_in(&mut self, index: usize, percent: f64, value: f64) {
        let key = &mut self.keys[index];
        key.in_handle_percent = clamp_percent(percent);
        key.in_handle_value = value;
        let locked = key.lock_in_out;
        if locked && tangent::mirror_in_to_out(&mut self.keys, index) {
            self.refresh_segment(index);
        }
        if index > 0 {
            self.refresh_segment(index - 1);
        }
        self.listeners.notify();
    }

    fn apply_out(&mut self, index: usize, percent: f64, value: f64) {
        let key = &mut self.keys[index];
        key.out_handle_percent = clamp_percent(percent);
        key.out_handle_value = value;
        let locked = key.lock_in_out;
        if locked && tangent::mirror_out_to_in(&mut self.keys, index) && index > 0 {
            self.refresh_segment(index - 1);
        }
        self.refresh_segment(index);
        self.listeners.notify();
    }

    // ----- Change listeners -----

    /// Register a callback invoked once after every completed edit.
    pub fn add_change_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut() + 'static,
    {
        self.listeners.add(listener)
    }

    /// Returns false when `id` was not registered on this curve.
    pub fn remove_change_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // ----- Persistence -----

    /// Snapshot of the keys (no caches).
    pub fn to_state(&self) -> CurveState {
        CurveState {
            name: self.name.clone(),
            config: Some(self.config.clone()),
            keyframes: self.keys.iter().map(KeyframeState::from).collect(),
        }
    }

    /// Replace all keys with `state`.
    ///
    /// Records are inserted verbatim, sorted by frame (a later record on the
    /// same frame wins), and every segment is re-sampled. Handles are not
    /// re-mirrored. A stored config replaces the current one.
    pub fn restore(&mut self, state: CurveState) {
        let total = state.keyframes.len();
        self.name = state.name;
        if let Some(config) = state.config {
            self.config = config.sanitized();
        }
        let mut keys: Vec<Keyframe> = state
            .keyframes
            .into_iter()
            .map(KeyframeState::to_keyframe)
            .collect();
        keys.sort_by_key(|k| k.frame);
        keys.reverse();
        keys.dedup_by_key(|k| k.frame);
        keys.reverse();
        self.keys = keys;
        self.cursor.invalidate();
        self.refresh_all();
        log::debug!(
            "curve '{}': restored {} of {total} keyframes",
            self.name,
            self.keys.len()
        );
        self.listeners.notify();
    }

    /// Restore from a stored JSON document. On a container-level parse
    /// failure the curve is left empty and the error returned.
    pub fn restore_json(&mut self, json: &str) -> Result<()> {
        match parse_stored_curve_json(json) {
            Ok(state) => {
                self.restore(state);
                Ok(())
            }
            Err(err) => {
                log::warn!("curve '{}': discarding unreadable document: {err}", self.name);
                self.clear();
                Err(err)
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_state())?)
    }

    // ----- Segment maintenance -----

    #[inline]
    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.keys.len() {
            Ok(())
        } else {
            Err(CurveError::IndexOutOfRange {
                index,
                len: self.keys.len(),
            })
        }
    }

    /// Re-sample the segment leaving `index` (clears it on the last key).
    fn refresh_segment(&mut self, index: usize) {
        let samples_per_frame = self.config.samples_per_frame;
        let (head, tail) = self.keys.split_at_mut(index + 1);
        let left = &mut head[index];
        match tail.first() {
            Some(right) => {
                let sampled = sample_segment(left, right, samples_per_frame);
                left.samples = sampled.values;
                left.segment_min = sampled.min;
                left.segment_max = sampled.max;
            }
            None => left.clear_samples(),
        }
    }

    /// Re-sample the segments entering and leaving `index`.
    fn refresh_around(&mut self, index: usize) {
        if index > 0 {
            self.refresh_segment(index - 1);
        }
        self.refresh_segment(index);
    }

    fn refresh_range(&mut self, range: Range<usize>) {
        let end = range.end.min(self.keys.len());
        for index in range.start..end {
            self.refresh_segment(index);
        }
    }

    fn refresh_all(&mut self) {
        self.refresh_range(0..self.keys.len());
    }

    /// Re-mirror locked keys in `range` after their neighbour intervals
    /// changed. Callers re-sample the affected segments.
    fn relock(&mut self, range: Range<usize>) {
        let end = range.end.min(self.keys.len());
        for index in range.start..end {
            if self.keys[index].lock_in_out {
                tangent::mirror_in_to_out(&mut self.keys, index);
            }
        }
    }
}
