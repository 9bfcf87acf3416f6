// zoom.rs — 视野缩放（滚轮 / 按钮）

use crate::panorama::{MAX_FOV, MIN_FOV};

/// 每个滚轮像素对应的视野变化（度）
pub const WHEEL_DEGREES_PER_PIXEL: f32 = 0.05;
/// 放大/缩小按钮的步长（度）
pub const ZOOM_STEP: f32 = 5.0;

/// New field of view after applying `delta_deg`, clamped to the viewer limits.
pub fn zoom(current_fov: f32, delta_deg: f32) -> f32 {
    (current_fov + delta_deg).clamp(MIN_FOV, MAX_FOV)
}

/// Browser-style wheel delta (positive scrolls away) to a FOV delta.
pub fn wheel_delta(delta_y: f32) -> f32 {
    delta_y * WHEEL_DEGREES_PER_PIXEL
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomButton {
    In,
    Out,
}

impl ZoomButton {
    pub fn delta(self) -> f32 {
        match self {
            ZoomButton::In => -ZOOM_STEP,
            ZoomButton::Out => ZOOM_STEP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_saturates_at_limits() {
        for start in [30.0, 45.0, 75.0, 90.0] {
            assert_eq!(zoom(start, 1000.0), 90.0);
            assert_eq!(zoom(start, -1000.0), 30.0);
        }
    }

    #[test]
    fn test_wheel_sequence() {
        let d = wheel_delta(300.0);
        assert_eq!(d, 15.0);
        let fov = zoom(75.0, d);
        assert_eq!(fov, 90.0);

        let d = wheel_delta(-2000.0);
        assert_eq!(d, -100.0);
        assert_eq!(zoom(fov, d), 30.0);
    }

    #[test]
    fn test_buttons_step_five_degrees() {
        assert_eq!(zoom(75.0, ZoomButton::In.delta()), 70.0);
        assert_eq!(zoom(75.0, ZoomButton::Out.delta()), 80.0);
        assert_eq!(zoom(88.0, ZoomButton::Out.delta()), 90.0);
    }
}
