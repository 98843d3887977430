/// Scroll position of the host document, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub offset: f32,
    pub content_height: f32,
    pub viewport_height: f32,
}

impl ScrollMetrics {
    pub fn new(offset: f32, content_height: f32, viewport_height: f32) -> Self {
        Self {
            offset,
            content_height,
            viewport_height,
        }
    }

    #[inline]
    pub fn max_scroll(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    #[inline]
    pub fn charge(&self) -> f32 {
        compute_charge(self.offset, self.content_height, self.viewport_height)
    }
}

/// Normalized scroll progress in \[0, 1\].
///
/// Content that fits in the viewport (nothing to scroll) and non-finite
/// inputs both yield 0.
pub fn compute_charge(scroll_offset: f32, content_height: f32, viewport_height: f32) -> f32 {
    let max_scroll = (content_height - viewport_height).max(0.0);
    if !(max_scroll > 0.0) || !max_scroll.is_finite() || !scroll_offset.is_finite() {
        return 0.0;
    }
    (scroll_offset / max_scroll).clamp(0.0, 1.0)
}
