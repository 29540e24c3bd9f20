//! Segment sampling for the keyframe curve.
//!
//! Model:
//! - Segment [A -> B] is a 2D cubic bezier in the (frame, value) plane:
//!   P0 = (A.frame, A.value)
//!   P1 = (A.frame + A.out_percent * span, A.out_value)
//!   P2 = (B.frame - B.in_percent * span, B.in_value)
//!   P3 = (B.frame, B.value)
//! - x(t) need not be monotonic (handle percent and value are independent),
//!   so the curve is walked as a polyline of `samples_per_frame * span`
//!   uniform t-steps and each integer frame is read off where the polyline
//!   first crosses it.
//! - Output is exactly `span` samples; sample 0 is A.value.

use crate::keyframe::Keyframe;

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Linear interpolation of scalars.
#[inline]
fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Control points of the segment between two adjacent keys.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentBezier {
    pub p0: [f64; 2],
    pub p1: [f64; 2],
    pub p2: [f64; 2],
    pub p3: [f64; 2],
}

impl SegmentBezier {
    pub fn between(left: &Keyframe, right: &Keyframe) -> Self {
        let x0 = f64::from(left.frame);
        let x3 = f64::from(right.frame);
        let span = x3 - x0;
        Self {
            p0: [x0, left.value],
            p1: [x0 + left.out_handle_percent * span, left.out_handle_value],
            p2: [x3 - right.in_handle_percent * span, right.in_handle_value],
            p3: [x3, right.value],
        }
    }

    /// Point on the curve at parameter `t` in [0,1].
    #[inline]
    pub fn point(&self, t: f64) -> [f64; 2] {
        [
            cubic_bezier(self.p0[0], self.p1[0], self.p2[0], self.p3[0], t),
            cubic_bezier(self.p0[1], self.p1[1], self.p2[1], self.p3[1], t),
        ]
    }
}

/// Per-frame samples of one segment with their bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentSamples {
    pub values: Vec<f64>,
    pub min: f64,
    pub max: f64,
}

/// Sample the segment [left -> right] once per integer frame.
///
/// `right.frame` must be greater than `left.frame`.
pub fn sample_segment(left: &Keyframe, right: &Keyframe, samples_per_frame: u32) -> SegmentSamples {
    let span = (i64::from(right.frame) - i64::from(left.frame)).max(1) as usize;
    let bezier = SegmentBezier::between(left, right);
    let steps = span * samples_per_frame.max(1) as usize;

    let mut values = Vec::with_capacity(span);
    values.push(left.value);
    let mut min = left.value;
    let mut max = left.value;

    let mut prev = bezier.p0;
    let mut target = bezier.p0[0] + 1.0;
    for step in 1..=steps {
        if values.len() == span {
            break;
        }
        let t = step as f64 / steps as f64;
        let point = if step == steps {
            bezier.p3
        } else {
            bezier.point(t)
        };
        // A steep stretch of the polyline can cross several frames at once.
        while values.len() < span && prev[0] < target && point[0] >= target {
            let dx = point[0] - prev[0];
            let v = if dx > f64::EPSILON {
                lerp_f64(prev[1], point[1], (target - prev[0]) / dx)
            } else {
                point[1]
            };
            min = min.min(v);
            max = max.max(v);
            values.push(v);
            target += 1.0;
        }
        prev = point;
    }

    // P3.x lies past every target, so this only pads on numeric noise.
    while values.len() < span {
        values.push(right.value);
        min = min.min(right.value);
        max = max.max(right.value);
    }

    SegmentSamples { values, min, max }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    fn key(frame: i32, value: f64, percent: f64) -> Keyframe {
        Keyframe::new(frame, value, percent, false)
    }

    #[test]
    fn sample_count_matches_span_and_starts_at_value() {
        let a = key(3, 1.5, 0.4);
        let b = key(11, -2.0, 0.4);
        let s = sample_segment(&a, &b, 10);
        assert_eq!(s.values.len(), 8);
        assert_eq!(s.values[0], 1.5);
    }

    #[test]
    fn linear_handles_produce_straight_line() {
        // Handles on the chord at 1/3 and 2/3 make x(t) and y(t) both linear.
        let mut a = key(0, 0.0, 1.0 / 3.0);
        let mut b = key(10, 10.0, 1.0 / 3.0);
        a.out_handle_value = 10.0 / 3.0;
        b.in_handle_value = 20.0 / 3.0;
        let s = sample_segment(&a, &b, 10);
        for (i, v) in s.values.iter().enumerate() {
            approx(*v, i as f64, 1e-9);
        }
        approx(s.min, 0.0, 1e-12);
        approx(s.max, 9.0, 1e-9);
    }

    #[test]
    fn flat_handles_ease_in_and_out() {
        let a = key(0, 0.0, 0.4);
        let b = key(10, 10.0, 0.4);
        let s = sample_segment(&a, &b, 10);
        approx(s.values[5], 5.0, 1e-6);
        // Eased start: slower than linear near the left key.
        assert!(s.values[1] < 1.0);
        assert!(s.values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn overshooting_handles_extend_bounds() {
        let mut a = key(0, 0.0, 0.5);
        let b = key(4, 0.0, 0.5);
        a.out_handle_value = 8.0;
        let s = sample_segment(&a, &b, 10);
        assert!(s.max > 0.0);
        assert_eq!(s.min, 0.0);
    }

    #[test]
    fn single_frame_segment() {
        let a = key(7, 2.0, 0.4);
        let b = key(8, 9.0, 0.4);
        let s = sample_segment(&a, &b, 10);
        assert_eq!(s.values, vec![2.0]);
        assert_eq!((s.min, s.max), (2.0, 2.0));
    }

    #[test]
    fn crossed_handles_still_fill_every_frame() {
        // Out handle reaches past the in handle; x(t) loops back on itself.
        let mut a = key(0, 0.0, 1.0);
        let mut b = key(6, 6.0, 1.0);
        a.out_handle_value = 12.0;
        b.in_handle_value = -6.0;
        let s = sample_segment(&a, &b, 10);
        assert_eq!(s.values.len(), 6);
        assert!(s.values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn bezier_endpoints() {
        let a = key(2, 1.0, 0.4);
        let b = key(12, 3.0, 0.4);
        let bez = SegmentBezier::between(&a, &b);
        assert_eq!(bez.point(0.0), [2.0, 1.0]);
        assert_eq!(bez.point(1.0), [12.0, 3.0]);
        assert_eq!(bez.p1, [6.0, 1.0]);
        assert_eq!(bez.p2, [8.0, 3.0]);
    }
}
