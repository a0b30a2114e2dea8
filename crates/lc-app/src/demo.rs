//! Synthetic data and scripted gestures for the demo

use std::time::{Duration, Instant};

use lc_core::Time;
use lc_data::{LightCurve, Meta, Quantity, Result};
use lc_views::GestureEvent;

/// Period of the injected transit signal in days
pub const TRUE_PERIOD: f64 = 3.2;

/// Two-hour cadence samples of a box-shaped transit, 1% deep
pub fn transit_light_curve(target: &str, start_btjd: f64, samples: usize) -> Result<LightCurve> {
    let cadence = 2.0 / 24.0;
    let time: Vec<Time> = (0..samples)
        .map(|i| Time::from_btjd(start_btjd + i as f64 * cadence))
        .collect();
    let flux: Vec<f64> = (0..samples)
        .map(|i| {
            let phase = (i as f64 * cadence / TRUE_PERIOD).rem_euclid(1.0);
            if (phase - 0.5).abs() < 0.03 {
                0.99
            } else {
                1.0
            }
        })
        .collect();
    let quality = (0..samples).map(|i| if i % 97 == 0 { 128 } else { 0 }).collect();

    let mut meta = Meta::new();
    meta.insert("OBJECT".to_string(), target.into());
    meta.insert("MISSION".to_string(), "TESS".into());

    LightCurve::new(
        time,
        Quantity::new(flux, ""),
        Quantity::new(vec![0.001; samples], ""),
    )?
    .with_quality(quality)
    .map(|lc| lc.with_meta(meta))
}

/// Gestures a user might perform, with the instant each one happens
pub fn scripted_gestures(start: Instant) -> Vec<(GestureEvent, Instant)> {
    let at = |ms: u64| start + Duration::from_millis(ms);
    let mut script = vec![
        (GestureEvent::click(0.62), at(0)),
        (GestureEvent::click(0.5).with_alt(), at(400)),
        (GestureEvent::drag_start(0.3), at(1000)),
    ];
    for step in 1..=12 {
        script.push((GestureEvent::drag_move(0.3 + step as f64 * 0.02), at(1000 + step * 15)));
    }
    script.push((GestureEvent::drag_end(0.54), at(1200)));
    script
}
