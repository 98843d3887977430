use crate::constants::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub max_pixel_ratio: f32,
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            max_pixel_ratio: MAX_PIXEL_RATIO,
            fov_degrees: CAMERA_FOV_DEG,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

/// Device pixel ratio clamped to `cap` to bound the fill cost on dense displays.
///
/// Non-finite or non-positive reports fall back to 1.
#[inline]
pub fn cap_pixel_ratio(reported: f32, cap: f32) -> f32 {
    if !(reported > 0.0) || !reported.is_finite() {
        return 1.0_f32.min(cap);
    }
    reported.min(cap)
}

/// Render surface dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Logical (CSS) width.
    pub width: f32,
    /// Logical (CSS) height.
    pub height: f32,
    /// Capped device pixel ratio.
    pub pixel_ratio: f32,
}

impl Viewport {
    /// Builds a viewport, or `None` if the logical size is degenerate.
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32, cap: f32) -> Option<Self> {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return None;
        }
        Some(Self {
            width,
            height,
            pixel_ratio: cap_pixel_ratio(device_pixel_ratio, cap),
        })
    }

    /// Backing-store size in physical pixels, at least 1x1.
    pub fn physical_size(&self) -> (u32, u32) {
        let w = (self.width * self.pixel_ratio).round().max(1.0) as u32;
        let h = (self.height * self.pixel_ratio).round().max(1.0) as u32;
        (w, h)
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_never_exceeds_cap() {
        for dpr in [0.5, 1.0, 1.5, 2.0, 2.625, 3.0, 4.0, 1e9] {
            assert!(cap_pixel_ratio(dpr, MAX_PIXEL_RATIO) <= 2.0);
        }
        assert_eq!(cap_pixel_ratio(1.25, MAX_PIXEL_RATIO), 1.25);
        assert_eq!(cap_pixel_ratio(3.0, MAX_PIXEL_RATIO), 2.0);
    }

    #[test]
    fn bogus_pixel_ratio_falls_back_to_one() {
        assert_eq!(cap_pixel_ratio(f32::NAN, 2.0), 1.0);
        assert_eq!(cap_pixel_ratio(0.0, 2.0), 1.0);
        assert_eq!(cap_pixel_ratio(f32::INFINITY, 2.0), 1.0);
    }

    #[test]
    fn physical_size_uses_capped_ratio() {
        let vp = Viewport::new(1280.0, 720.0, 3.0, 2.0).unwrap();
        assert_eq!(vp.physical_size(), (2560, 1440));
        assert!((vp.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_sizes_are_rejected() {
        assert!(Viewport::new(0.0, 720.0, 1.0, 2.0).is_none());
        assert!(Viewport::new(1280.0, 0.0, 1.0, 2.0).is_none());
        assert!(Viewport::new(f32::NAN, 720.0, 1.0, 2.0).is_none());
    }
}
