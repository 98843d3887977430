// Host-side tests for pointer, scroll and camera parallax.
// The main crate is wasm-only, so these exercise portal-core directly.

use glam::Vec3;
use portal_core::*;

#[test]
fn charge_stays_in_unit_range() {
    let offsets = [-500.0, 0.0, 1.0, 250.0, 999.0, 1e6, f32::NAN];
    let contents = [0.0, 100.0, 800.0, 2400.0, 1e7];
    let viewports = [0.0, 1.0, 600.0, 800.0];
    for &o in &offsets {
        for &c in &contents {
            for &v in &viewports {
                let charge = compute_charge(o, c, v);
                assert!((0.0..=1.0).contains(&charge), "charge({o}, {c}, {v}) = {charge}");
                if c <= v {
                    assert_eq!(charge, 0.0);
                }
            }
        }
    }
}

#[test]
fn charge_endpoints() {
    let m = ScrollMetrics::new(0.0, 3000.0, 1000.0);
    assert_eq!(m.charge(), 0.0);
    let m = ScrollMetrics::new(m.max_scroll(), 3000.0, 1000.0);
    assert_eq!(m.charge(), 1.0);
    assert_eq!(compute_charge(500.0, 3000.0, 1000.0), 0.25);
}

#[test]
fn pointer_top_left_maps_to_minus_one() {
    assert_eq!(normalize_pointer(0.0, 0.0, 1000.0, 500.0), Some((-1.0, -1.0)));
    assert_eq!(normalize_pointer(1000.0, 500.0, 1000.0, 500.0), Some((1.0, 1.0)));
    assert_eq!(normalize_pointer(500.0, 250.0, 1000.0, 500.0), Some((0.0, 0.0)));
}

#[test]
fn pointer_always_within_range_for_valid_viewport() {
    for &(x, y) in &[(-50.0, 20.0), (2000.0, -3.0), (1e9, 1e9), (333.0, 444.0)] {
        let (nx, ny) = normalize_pointer(x, y, 1280.0, 720.0).unwrap();
        assert!((-1.0..=1.0).contains(&nx));
        assert!((-1.0..=1.0).contains(&ny));
    }
    assert_eq!(normalize_pointer(10.0, 10.0, 0.0, 720.0), None);
}

#[test]
fn sampler_keeps_state_on_degenerate_viewport() {
    let mut s = InputSampler::new(800.0, 600.0);
    s.pointer_moved(800.0, 0.0);
    let before = s.state();
    s.resized(0.0, 0.0, ScrollMetrics::default());
    s.pointer_moved(10.0, 10.0);
    assert_eq!(s.state().pointer_x, before.pointer_x);
    assert_eq!(s.state().pointer_y, before.pointer_y);
}

#[test]
fn parallax_converges_without_overshoot() {
    let p = ParallaxIntegrator::new(ParallaxConfig::default());
    let input = InputState {
        pointer_x: 1.0,
        pointer_y: -1.0,
        charge: 0.5,
    };
    let target = p.target(&input);
    let mut eye = p.config.initial_eye();
    let mut prev_dx = (target.x - eye.x).abs();
    let mut prev_dy = (target.y - eye.y).abs();
    for _ in 0..600 {
        p.step(&mut eye, &input, 1.0 / 60.0);
        let dx = (target.x - eye.x).abs();
        let dy = (target.y - eye.y).abs();
        assert!(dx <= prev_dx && dy <= prev_dy);
        assert!(eye.x <= target.x && eye.y <= target.y);
        assert_eq!(eye.z, 9.0 - 0.5 * 1.2);
        prev_dx = dx;
        prev_dy = dy;
    }
    assert!(prev_dx < 1e-4 && prev_dy < 1e-4);
}

#[test]
fn parallax_targets_follow_gains() {
    let p = ParallaxIntegrator::default();
    let t = p.target(&InputState {
        pointer_x: -1.0,
        pointer_y: 1.0,
        charge: 1.0,
    });
    assert_eq!(t, Vec3::new(-0.9, -0.45, 9.0 - 1.2));
}

#[test]
fn per_second_smoothing_matches_per_tick_at_reference_rate() {
    let mut cfg = ParallaxConfig::default();
    cfg.mode = SmoothingMode::per_second();
    let p = ParallaxIntegrator::new(cfg);
    assert!((p.alpha(1.0 / 60.0) - 0.03).abs() < 1e-5);
    // Two half-length steps equal one full step.
    let half = p.alpha(1.0 / 120.0);
    let two_halves = 1.0 - (1.0 - half) * (1.0 - half);
    assert!((two_halves - 0.03).abs() < 1e-5);
}
