// Host-side tests for the frame scheduler with an in-memory render sink.

use portal_core::*;

#[derive(Default)]
struct RecordingSink {
    uploads: Vec<usize>,
    rendered: Vec<f64>,
    viewports: Vec<Viewport>,
    fail_first: usize,
}

impl RenderSink for RecordingSink {
    fn resize(&mut self, viewport: &Viewport) {
        self.viewports.push(*viewport);
    }

    fn upload_particles(&mut self, positions: &[[f32; 3]]) {
        self.uploads.push(positions.len());
    }

    fn render(&mut self, state: &AnimationState) -> anyhow::Result<()> {
        if self.fail_first > 0 {
            self.fail_first -= 1;
            anyhow::bail!("device lost");
        }
        self.rendered.push(state.elapsed);
        Ok(())
    }
}

fn scheduler(sink: RecordingSink) -> FrameScheduler<RecordingSink> {
    let mut cfg = PortalConfig::default();
    cfg.particles.count = 200;
    FrameScheduler::new(PortalEngine::new(&cfg).unwrap(), sink)
}

#[test]
fn failing_frames_do_not_stop_the_loop() {
    let mut s = scheduler(RecordingSink {
        fail_first: 3,
        ..Default::default()
    });
    for i in 0..10 {
        s.frame_at(i as f64 / 60.0);
    }
    assert_eq!(s.frames(), 10);
    assert_eq!(s.failed_frames(), 3);
    assert_eq!(s.sink().rendered.len(), 7);
    assert_eq!(s.sink().uploads.len(), 10);
}

#[test]
fn degenerate_resize_keeps_previous_viewport() {
    let mut s = scheduler(RecordingSink::default());
    s.resize(1280.0, 720.0, 1.5, ScrollMetrics::default());
    let aspect = s.engine().camera().aspect;
    s.resize(0.0, 0.0, 1.0, ScrollMetrics::default());
    s.resize(f32::NAN, 720.0, 1.0, ScrollMetrics::default());
    assert_eq!(s.sink().viewports.len(), 1);
    assert_eq!(s.engine().camera().aspect, aspect);
    assert_eq!(s.engine().viewport().map(|v| v.width), Some(1280.0));
}

#[test]
fn pixel_ratio_is_capped() {
    let mut s = scheduler(RecordingSink::default());
    for &dpr in &[0.5, 1.0, 2.0, 3.0, 4.5, f32::INFINITY, f32::NAN] {
        s.resize(800.0, 600.0, dpr, ScrollMetrics::default());
    }
    assert!(s.sink().viewports.iter().all(|v| v.pixel_ratio <= 2.0 && v.pixel_ratio > 0.0));
}

#[test]
fn scroll_drives_charge_and_camera_dolly() {
    let mut s = scheduler(RecordingSink::default());
    s.resize(1000.0, 500.0, 1.0, ScrollMetrics::new(0.0, 1500.0, 500.0));
    s.scrolled(ScrollMetrics::new(1000.0, 1500.0, 500.0));
    let state = s.frame_at(0.0);
    assert_eq!(state.input.charge, 1.0);
    assert_eq!(s.engine().input(), state.input);
    assert!((state.camera.eye.z - (9.0 - 1.2)).abs() < 1e-6);
    assert!((state.effects.bloom.strength - 2.4).abs() < 1e-5);
}

#[test]
fn pointer_pulls_camera_towards_it() {
    let mut s = scheduler(RecordingSink::default());
    s.resize(1000.0, 500.0, 1.0, ScrollMetrics::default());
    s.pointer_moved(1000.0, 0.0);
    let mut last = s.frame_at(0.0);
    for i in 1..120 {
        let state = s.frame_at(i as f64 / 60.0);
        assert!(state.camera.eye.x >= last.camera.eye.x);
        last = state;
    }
    assert!(last.camera.eye.x > 0.8 && last.camera.eye.x <= 0.9);
    assert!(last.camera.eye.y > 0.4 && last.camera.eye.y <= 0.45);
}
