//! Keyframe record: an authored (frame, value) anchor with two bezier handles.

/// Integer position on the animation timeline.
pub type Frame = i32;

/// A keyframe on a [`Curve`](crate::Curve).
///
/// Handles are stored relative to the neighbouring keys: a percent of the
/// interval toward the previous (in) or next (out) key, plus an absolute
/// value coordinate. Moving a neighbour therefore stretches the handle
/// instead of leaving it behind.
///
/// The sample cache covers the outgoing segment: one value per frame from
/// `frame` up to, but not including, the next key's frame. It is empty on
/// the last key.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    pub(crate) frame: Frame,
    pub(crate) value: f64,
    pub(crate) in_handle_value: f64,
    pub(crate) in_handle_percent: f64,
    pub(crate) out_handle_value: f64,
    pub(crate) out_handle_percent: f64,
    pub(crate) lock_in_out: bool,
    pub(crate) samples: Vec<f64>,
    pub(crate) segment_min: f64,
    pub(crate) segment_max: f64,
}

impl Keyframe {
    /// Key with flat handles (handle value == `value`) at `handle_percent`.
    pub(crate) fn new(frame: Frame, value: f64, handle_percent: f64, lock_in_out: bool) -> Self {
        let percent = clamp_percent(handle_percent);
        Self {
            frame,
            value,
            in_handle_value: value,
            in_handle_percent: percent,
            out_handle_value: value,
            out_handle_percent: percent,
            lock_in_out,
            samples: Vec::new(),
            segment_min: value,
            segment_max: value,
        }
    }

    #[inline]
    pub fn frame(&self) -> Frame {
        self.frame
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn in_handle_value(&self) -> f64 {
        self.in_handle_value
    }

    #[inline]
    pub fn in_handle_percent(&self) -> f64 {
        self.in_handle_percent
    }

    #[inline]
    pub fn out_handle_value(&self) -> f64 {
        self.out_handle_value
    }

    #[inline]
    pub fn out_handle_percent(&self) -> f64 {
        self.out_handle_percent
    }

    #[inline]
    pub fn lock_in_out(&self) -> bool {
        self.lock_in_out
    }

    /// Cached per-frame samples of the outgoing segment (empty on the last key).
    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Lowest sampled value of the outgoing segment.
    #[inline]
    pub fn segment_min(&self) -> f64 {
        self.segment_min
    }

    /// Highest sampled value of the outgoing segment.
    #[inline]
    pub fn segment_max(&self) -> f64 {
        self.segment_max
    }

    /// Shift value and both handles by the same delta, preserving handle shape.
    pub(crate) fn shift_value(&mut self, value: f64) {
        let delta = value - self.value;
        self.value = value;
        self.in_handle_value += delta;
        self.out_handle_value += delta;
    }

    pub(crate) fn scale(&mut self, factor: f64) {
        self.value *= factor;
        self.in_handle_value *= factor;
        self.out_handle_value *= factor;
    }

    pub(crate) fn clear_samples(&mut self) {
        self.samples.clear();
        self.segment_min = self.value;
        self.segment_max = self.value;
    }

    /// Sample cache lookup; falls back to the authored value when the cache
    /// does not reach `offset`.
    #[inline]
    pub(crate) fn sample_at(&self, offset: usize) -> f64 {
        self.samples.get(offset).copied().unwrap_or(self.value)
    }
}

/// Clamp a handle percent into `[0,1]`; NaN collapses to 0.
#[inline]
pub(crate) fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 1.0)
    }
}
