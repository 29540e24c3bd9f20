use vizij_curve_core::baking::{export_baked_json, export_baked_with_derivatives_json};
use vizij_curve_core::{bake_curve, bake_curve_with_derivatives, BakingConfig, Curve};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn three_point() -> Curve {
    let mut curve = Curve::named("layer.opacity");
    curve.add_key_with_value(0, 0.0);
    curve.add_key_with_value(10, 10.0);
    curve.add_key_with_value(20, 0.0);
    curve
}

#[test]
fn bake_default_window_covers_keys() {
    let curve = three_point();
    let baked = bake_curve(&curve, &BakingConfig::default());
    assert_eq!(baked.name, "layer.opacity");
    assert_eq!(baked.start_frame, 0);
    assert_eq!(baked.end_frame, 20);
    assert_eq!(baked.values.len(), 21);
    for (i, v) in baked.values.iter().enumerate() {
        assert_eq!(*v, curve.interpolated_value(i as i32));
    }
    assert_eq!(baked.values[10], 10.0);
}

#[test]
fn bake_with_step_and_explicit_window() {
    let curve = three_point();
    let cfg = BakingConfig {
        start_frame: Some(-5),
        end_frame: Some(25),
        step: 5,
    };
    let baked = bake_curve(&curve, &cfg);
    assert_eq!(baked.values.len(), 7);
    assert_eq!(baked.values[0], 0.0);
    assert_eq!(baked.values[3], 10.0);
    assert_eq!(baked.values[6], 0.0);
}

#[test]
fn bake_zero_step_is_treated_as_one() {
    let curve = three_point();
    let cfg = BakingConfig {
        start_frame: Some(0),
        end_frame: Some(4),
        step: 0,
    };
    let baked = bake_curve(&curve, &cfg);
    assert_eq!(baked.step, 1);
    assert_eq!(baked.values.len(), 5);
}

#[test]
fn derivatives_follow_the_shape() {
    let curve = three_point();
    let (baked, deriv) = bake_curve_with_derivatives(&curve, &BakingConfig::default());
    assert_eq!(deriv.values.len(), baked.values.len());
    assert!(deriv.values[5] > 0.0);
    assert!(deriv.values[15] < 0.0);
    // Peak with mirrored flat handles: slopes either side cancel.
    approx(deriv.values[10], 0.0, 1e-9);
    // Window edges fall back to one-sided differences.
    approx(deriv.values[0], curve.interpolated_value(1), 1e-12);
}

#[test]
fn empty_curve_bakes_single_zero() {
    let curve = Curve::new();
    let baked = bake_curve(&curve, &BakingConfig::default());
    assert_eq!(baked.values, vec![0.0]);
}

#[test]
fn export_json_schema() {
    let curve = three_point();
    let (baked, deriv) = bake_curve_with_derivatives(&curve, &BakingConfig::default());

    let json = export_baked_json(&baked);
    assert_eq!(json["name"], "layer.opacity");
    assert_eq!(json["values"].as_array().map(Vec::len), Some(21));

    let both = export_baked_with_derivatives_json(&baked, &deriv);
    assert_eq!(both["values"]["start_frame"], 0);
    assert_eq!(both["derivatives"]["end_frame"], 20);
    assert_eq!(both["derivatives"]["values"].as_array().map(Vec::len), Some(21));
}
