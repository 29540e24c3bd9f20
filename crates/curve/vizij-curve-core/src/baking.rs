//! Baking API: produce per-frame samples of a curve over a frame window.

use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::keyframe::Frame;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BakingConfig {
    /// First frame to bake; if None, uses the curve's first key.
    pub start_frame: Option<Frame>,
    /// Last frame to bake (inclusive); if None, uses the curve's last key.
    pub end_frame: Option<Frame>,
    /// Frames between consecutive samples.
    pub step: u32,
}

impl Default for BakingConfig {
    fn default() -> Self {
        Self {
            start_frame: None,
            end_frame: None,
            step: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedCurve {
    pub name: String,
    pub start_frame: Frame,
    pub end_frame: Frame,
    pub step: u32,
    /// Sampled values at `start_frame + i * step`.
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedDerivativeCurve {
    pub name: String,
    pub start_frame: Frame,
    pub end_frame: Frame,
    pub step: u32,
    /// Finite-difference slope (value units per frame) at each baked frame.
    pub values: Vec<f64>,
}

fn resolve_window(curve: &Curve, cfg: &BakingConfig) -> (Frame, Frame, u32) {
    let start = cfg.start_frame.unwrap_or_else(|| curve.first_frame());
    let end = cfg.end_frame.unwrap_or_else(|| curve.last_frame()).max(start);
    (start, end, cfg.step.max(1))
}

fn baked_frames(start: Frame, end: Frame, step: u32) -> impl Iterator<Item = Frame> {
    (i64::from(start)..=i64::from(end))
        .step_by(step as usize)
        .map(|f| f as Frame)
}

/// Bake a curve using the provided config. Frames are visited in increasing
/// order, which keeps every lookup on the curve's sequential cursor.
pub fn bake_curve(curve: &Curve, cfg: &BakingConfig) -> BakedCurve {
    let (start, end, step) = resolve_window(curve, cfg);
    let values = baked_frames(start, end, step)
        .map(|f| curve.interpolated_value(f))
        .collect();
    BakedCurve {
        name: curve.name().to_string(),
        start_frame: start,
        end_frame: end,
        step,
        values,
    }
}

/// Bake values and slopes simultaneously.
///
/// Slopes use a central difference over one frame on each side, falling back
/// to the one-sided difference at the window edges.
pub fn bake_curve_with_derivatives(
    curve: &Curve,
    cfg: &BakingConfig,
) -> (BakedCurve, BakedDerivativeCurve) {
    let baked = bake_curve(curve, cfg);
    let (start, end) = (baked.start_frame, baked.end_frame);
    let slopes = baked_frames(start, end, baked.step)
        .map(|f| {
            let lo = if f > start { f - 1 } else { f };
            let hi = if f < end { f + 1 } else { f };
            if hi == lo {
                return 0.0;
            }
            let dv = curve.interpolated_value(hi) - curve.interpolated_value(lo);
            dv / f64::from(hi - lo)
        })
        .collect();
    let derivatives = BakedDerivativeCurve {
        name: baked.name.clone(),
        start_frame: start,
        end_frame: end,
        step: baked.step,
        values: slopes,
    };
    (baked, derivatives)
}

/// Export baked data as serde_json::Value (stable schema for FFI/serialization).
pub fn export_baked_json(baked: &BakedCurve) -> serde_json::Value {
    serde_json::to_value(baked).unwrap_or(serde_json::Value::Null)
}

/// Export baked values and derivatives as serde_json::Value.
pub fn export_baked_with_derivatives_json(
    baked: &BakedCurve,
    derivatives: &BakedDerivativeCurve,
) -> serde_json::Value {
    serde_json::json!({
        "values": baked,
        "derivatives": derivatives,
    })
}
