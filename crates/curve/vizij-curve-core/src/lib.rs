//! Vizij Curve Core (engine-agnostic)
//!
//! A single-channel keyframe curve: sparse authored keys on an integer frame
//! timeline, joined by cubic-bezier segments whose in/out handles are edited
//! independently or kept slope-locked. Segments are pre-sampled to one value
//! per frame so render loops can query every frame cheaply.
//!
//! Multi-channel animation (camera position, colors, ...) is built by owning
//! one [`Curve`] per scalar channel.

pub mod baking;
pub mod config;
pub mod cursor;
pub mod curve;
pub mod error;
pub mod ids;
pub mod keyframe;
pub mod notify;
pub mod segment;
pub mod stored_curve;
pub mod tangent;

// Re-exports for consumers (adapters)
pub use baking::{bake_curve, bake_curve_with_derivatives, BakedCurve, BakingConfig};
pub use config::CurveConfig;
pub use curve::Curve;
pub use error::CurveError;
pub use ids::ListenerId;
pub use keyframe::{Frame, Keyframe};
pub use stored_curve::{parse_stored_curve_json, CurveState, KeyframeState};

/// Curve result type
pub type Result<T> = core::result::Result<T, CurveError>;
