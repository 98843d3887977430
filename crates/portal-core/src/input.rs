use crate::charge::ScrollMetrics;

/// Normalized interaction state read by the frame tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    /// Pointer X in \[-1, 1\], -1 at the left edge.
    pub pointer_x: f32,
    /// Pointer Y in \[-1, 1\], -1 at the top edge (screen space, Y down).
    pub pointer_y: f32,
    /// Scroll progress in \[0, 1\].
    pub charge: f32,
}

/// Map client pixel coordinates to \[-1, 1\] on both axes.
///
/// Returns `None` for a degenerate viewport so callers keep their previous
/// state instead of storing `NaN`/`inf`.
#[inline]
pub fn normalize_pointer(cx: f32, cy: f32, width: f32, height: f32) -> Option<(f32, f32)> {
    if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
        return None;
    }
    if !cx.is_finite() || !cy.is_finite() {
        return None;
    }
    let x = ((cx / width) * 2.0 - 1.0).clamp(-1.0, 1.0);
    let y = ((cy / height) * 2.0 - 1.0).clamp(-1.0, 1.0);
    Some((x, y))
}

/// Sole writer of [`InputState`].
#[derive(Clone, Debug, Default)]
pub struct InputSampler {
    state: InputState,
    viewport: (f32, f32),
}

impl InputSampler {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            viewport: (viewport_width, viewport_height),
            ..Default::default()
        }
    }

    #[inline]
    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn pointer_moved(&mut self, client_x: f32, client_y: f32) {
        let (w, h) = self.viewport;
        match normalize_pointer(client_x, client_y, w, h) {
            Some((x, y)) => {
                self.state.pointer_x = x;
                self.state.pointer_y = y;
            }
            None => log::debug!("[input] pointer ignored, viewport {w}x{h}"),
        }
    }

    pub fn scrolled(&mut self, scroll: ScrollMetrics) {
        self.state.charge = scroll.charge();
    }

    /// New CSS viewport size; charge is recomputed since max scroll moved.
    pub fn resized(&mut self, width: f32, height: f32, scroll: ScrollMetrics) {
        self.viewport = (width, height);
        self.scrolled(scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_left_corner_maps_to_minus_one() {
        assert_eq!(normalize_pointer(0.0, 0.0, 1000.0, 500.0), Some((-1.0, -1.0)));
    }

    #[test]
    fn centre_and_far_corner() {
        assert_eq!(normalize_pointer(500.0, 250.0, 1000.0, 500.0), Some((0.0, 0.0)));
        assert_eq!(normalize_pointer(1000.0, 500.0, 1000.0, 500.0), Some((1.0, 1.0)));
    }

    #[test]
    fn outside_viewport_is_clamped() {
        let (x, y) = normalize_pointer(-300.0, 9000.0, 1000.0, 500.0).unwrap();
        assert_eq!((x, y), (-1.0, 1.0));
    }

    #[test]
    fn degenerate_viewport_keeps_previous_pointer() {
        let mut s = InputSampler::new(1000.0, 500.0);
        s.pointer_moved(750.0, 125.0);
        let before = s.state();
        s.resized(0.0, 0.0, ScrollMetrics::default());
        s.pointer_moved(10.0, 10.0);
        assert_eq!(s.state().pointer_x, before.pointer_x);
        assert_eq!(s.state().pointer_y, before.pointer_y);
    }

    #[test]
    fn scroll_updates_charge() {
        let mut s = InputSampler::new(1000.0, 500.0);
        s.scrolled(ScrollMetrics::new(250.0, 1000.0, 500.0));
        assert_eq!(s.state().charge, 0.5);
    }

    #[test]
    fn resize_recomputes_charge() {
        let mut s = InputSampler::new(1000.0, 500.0);
        s.scrolled(ScrollMetrics::new(250.0, 1000.0, 500.0));
        // taller viewport leaves nothing to scroll
        s.resized(1000.0, 1200.0, ScrollMetrics::new(0.0, 1000.0, 1200.0));
        assert_eq!(s.state().charge, 0.0);
    }
}
