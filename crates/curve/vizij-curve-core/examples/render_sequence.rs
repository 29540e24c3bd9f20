//! Author a small camera fly-in, persist it, reload it, and print the
//! per-frame values a renderer would consume.

use anyhow::Result;
use vizij_curve_core::{bake_curve, BakingConfig, Curve};

fn main() -> Result<()> {
    let mut altitude = Curve::named("camera.eye.altitude");
    altitude.add_change_listener(|| println!("altitude curve changed"));

    altitude.add_key_with_value(0, 250_000.0);
    altitude.add_key_with_value(48, 90_000.0);
    altitude.add_key_with_value(120, 12_000.0);
    altitude.add_key_with_value(150, 15_000.0);
    altitude.smooth(1)?;
    altitude.set_out_percent(2, 0.2, 12_000.0)?;

    let json = altitude.to_json()?;
    let mut reloaded = Curve::new();
    reloaded.restore_json(&json)?;

    let baked = bake_curve(
        &reloaded,
        &BakingConfig {
            step: 12,
            ..BakingConfig::default()
        },
    );
    for (i, value) in baked.values.iter().enumerate() {
        let frame = baked.start_frame + i as i32 * baked.step as i32;
        println!("frame {frame:>4}: {value:>12.1}");
    }
    println!(
        "range over frames 40..=130: {:?}",
        reloaded.value_range(40, 130)
    );
    Ok(())
}
