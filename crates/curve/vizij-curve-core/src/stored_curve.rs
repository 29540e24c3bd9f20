//! Persisted curve snapshot and the lenient JSON reader for stored curves.

use serde::{Deserialize, Serialize};

use crate::config::CurveConfig;
use crate::error::CurveError;
use crate::keyframe::{clamp_percent, Frame, Keyframe};

/// Plain snapshot of a curve: its name and every keyframe in index order.
///
/// This is the hand-off format for document persistence and for exporting on
/// another thread; it carries no caches. `config` is written so sampling
/// density survives a round trip; documents without it leave the restoring
/// curve's config unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveState {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<CurveConfig>,
    pub keyframes: Vec<KeyframeState>,
}

/// Stored fields of one keyframe.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeState {
    pub frame: Frame,
    pub value: f64,
    pub in_handle_value: f64,
    pub in_handle_percent: f64,
    pub out_handle_value: f64,
    pub out_handle_percent: f64,
    #[serde(default)]
    pub lock_in_out: bool,
}

impl From<&Keyframe> for KeyframeState {
    fn from(key: &Keyframe) -> Self {
        Self {
            frame: key.frame,
            value: key.value,
            in_handle_value: key.in_handle_value,
            in_handle_percent: key.in_handle_percent,
            out_handle_value: key.out_handle_value,
            out_handle_percent: key.out_handle_percent,
            lock_in_out: key.lock_in_out,
        }
    }
}

impl KeyframeState {
    /// Rebuild a keyframe verbatim (percents clamped); caches start empty.
    pub(crate) fn to_keyframe(self) -> Keyframe {
        let mut key = Keyframe::new(self.frame, self.value, 0.0, self.lock_in_out);
        key.in_handle_value = self.in_handle_value;
        key.in_handle_percent = clamp_percent(self.in_handle_percent);
        key.out_handle_value = self.out_handle_value;
        key.out_handle_percent = clamp_percent(self.out_handle_percent);
        key
    }
}

/// Public API: parse a stored curve JSON document into a [`CurveState`].
///
/// Notes:
/// - A document without a readable `keyframes` array is an error; callers
///   should not run with half a curve.
/// - Individual keyframe records that fail to parse are skipped with a warning.
/// - Records are kept in document order; `Curve::restore` sorts them.
pub fn parse_stored_curve_json(s: &str) -> Result<CurveState, CurveError> {
    let sc: StoredCurve = serde_json::from_str(s)?;

    let mut keyframes = Vec::with_capacity(sc.keyframes.len());
    for (i, raw) in sc.keyframes.into_iter().enumerate() {
        match serde_json::from_value::<KeyframeState>(raw) {
            Ok(state) => keyframes.push(state),
            Err(err) => log::warn!("skipping keyframe record {i} in curve '{}': {err}", sc.name),
        }
    }

    Ok(CurveState {
        name: sc.name,
        config: sc.config,
        keyframes,
    })
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct StoredCurve {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub config: Option<CurveConfig>,
    pub keyframes: Vec<serde_json::Value>,
}
