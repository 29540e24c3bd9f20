//! Tangent continuity: slope-locked handle mirroring and auto-smoothing.
//!
//! Both operations work on an index into the sorted key slice so that
//! neighbour intervals come from the container, never from stored links.

use crate::keyframe::{clamp_percent, Keyframe};

/// Frame distances to the previous and next key, when both exist.
#[inline]
fn intervals(keys: &[Keyframe], index: usize) -> Option<(f64, f64)> {
    let prev = keys.get(index.checked_sub(1)?)?;
    let key = keys.get(index)?;
    let next = keys.get(index + 1)?;
    Some((
        f64::from(key.frame) - f64::from(prev.frame),
        f64::from(next.frame) - f64::from(key.frame),
    ))
}

/// Mirror the in handle onto the out handle through the key's point.
///
/// The out handle takes the in handle's percent; its value offset is the in
/// offset reflected and scaled by `next_span / prev_span`, so the slope is
/// continuous across the key even when the two intervals differ.
/// No-op unless both neighbours exist.
pub fn mirror_in_to_out(keys: &mut [Keyframe], index: usize) -> bool {
    let Some((in_span, out_span)) = intervals(keys, index) else {
        return false;
    };
    let key = &mut keys[index];
    let delta = key.in_handle_value - key.value;
    key.out_handle_percent = key.in_handle_percent;
    key.out_handle_value = key.value - delta * out_span / in_span;
    true
}

/// Mirror the out handle onto the in handle; see [`mirror_in_to_out`].
pub fn mirror_out_to_in(keys: &mut [Keyframe], index: usize) -> bool {
    let Some((in_span, out_span)) = intervals(keys, index) else {
        return false;
    };
    let key = &mut keys[index];
    let delta = key.out_handle_value - key.value;
    key.in_handle_percent = key.out_handle_percent;
    key.in_handle_value = key.value - delta * in_span / out_span;
    true
}

/// True when the key sits strictly above or strictly below both neighbours.
pub fn is_local_extremum(prev: f64, value: f64, next: f64) -> bool {
    (value > prev && value > next) || (value < prev && value < next)
}

/// Auto-tangent heuristic for the key at `index`.
///
/// Handles follow the slope of the chord between the two neighbours. Peaks
/// and valleys get handles at half the default percent so the curve does
/// not overshoot the authored extreme; pass-through keys get the full
/// default percent. Keys missing a neighbour get flat handles.
///
/// The out handle is always mirrored from the in handle, so the result is
/// slope-continuous even on an unlocked key; the lock flag is left as is.
pub fn smooth(keys: &mut [Keyframe], index: usize, default_percent: f64) {
    let default_percent = clamp_percent(default_percent);
    let Some((in_span, _)) = intervals(keys, index) else {
        if let Some(key) = keys.get_mut(index) {
            key.in_handle_value = key.value;
            key.out_handle_value = key.value;
            key.in_handle_percent = default_percent;
            key.out_handle_percent = default_percent;
        }
        return;
    };

    let prev = &keys[index - 1];
    let next = &keys[index + 1];
    let slope = (next.value - prev.value) / (f64::from(next.frame) - f64::from(prev.frame));
    let extremum = is_local_extremum(prev.value, keys[index].value, next.value);

    let percent = if extremum {
        default_percent * 0.5
    } else {
        default_percent
    };

    let key = &mut keys[index];
    key.in_handle_percent = percent;
    key.in_handle_value = key.value - slope * percent * in_span;
    mirror_in_to_out(keys, index);
}
