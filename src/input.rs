// input.rs — 鼠标 / 触摸拖动与滚轮换算
//
// 拖动在按下时锚定指针位置和当前经纬度，之后每次移动都从锚点重新计算，无惯性。

use winit::event::MouseScrollDelta;

use crate::panorama::OrbitState;

/// Degrees of rotation per pixel of pointer travel.
pub const DEFAULT_DRAG_SENSITIVITY: f32 = 0.1;

/// 滚轮一“行”折算的像素数（与浏览器的 deltaY 对齐）
const PIXELS_PER_WHEEL_LINE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

/// State captured when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub pointer: PointerId,
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub anchor_longitude_deg: f32,
    pub anchor_latitude_deg: f32,
}

impl DragSession {
    fn begin(pointer: PointerId, x: f32, y: f32, orbit: &OrbitState) -> Self {
        Self {
            pointer,
            anchor_x: x,
            anchor_y: y,
            anchor_longitude_deg: orbit.longitude(),
            anchor_latitude_deg: orbit.latitude(),
        }
    }

    /// Dragging right lowers longitude, dragging down raises latitude.
    fn apply(&self, x: f32, y: f32, sensitivity: f32, orbit: &mut OrbitState) {
        let longitude = (self.anchor_x - x) * sensitivity + self.anchor_longitude_deg;
        let latitude = (y - self.anchor_y) * sensitivity + self.anchor_latitude_deg;
        orbit.set_angles(longitude, latitude);
    }
}

/// Tracks at most one drag session plus the set of live touch contacts.
#[derive(Debug)]
pub struct PointerTracker {
    sensitivity: f32,
    session: Option<DragSession>,
    contacts: Vec<u64>,
}

impl PointerTracker {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            sensitivity,
            session: None,
            contacts: Vec::new(),
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session().is_some()
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, orbit: &OrbitState) {
        // 触摸拖动中忽略鼠标按下
        if matches!(
            self.session,
            Some(DragSession {
                pointer: PointerId::Touch(_),
                ..
            })
        ) {
            return;
        }
        self.session = Some(DragSession::begin(PointerId::Mouse, x, y, orbit));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, orbit: &mut OrbitState) {
        if let Some(session) = self.session.filter(|s| s.pointer == PointerId::Mouse) {
            session.apply(x, y, self.sensitivity, orbit);
        }
    }

    pub fn pointer_up(&mut self) {
        if matches!(self.session, Some(s) if s.pointer == PointerId::Mouse) {
            self.session = None;
        }
    }

    pub fn touch_start(&mut self, id: u64, x: f32, y: f32, orbit: &OrbitState) {
        if !self.contacts.contains(&id) {
            self.contacts.push(id);
        }
        // 只有单指才开始拖动；第二根手指不会重置锚点
        if self.contacts.len() == 1 && self.session.is_none() {
            self.session = Some(DragSession::begin(PointerId::Touch(id), x, y, orbit));
        }
    }

    pub fn touch_move(&mut self, id: u64, x: f32, y: f32, orbit: &mut OrbitState) {
        if self.contacts.len() != 1 {
            return;
        }
        if let Some(session) = self.session.filter(|s| s.pointer == PointerId::Touch(id)) {
            session.apply(x, y, self.sensitivity, orbit);
        }
    }

    pub fn touch_end(&mut self, id: u64) {
        self.contacts.retain(|c| *c != id);
        if matches!(self.session, Some(s) if s.pointer == PointerId::Touch(id)) {
            self.session = None;
        }
    }

    /// Drops any session and contacts, e.g. when the panorama is hidden mid-drag.
    pub fn cancel(&mut self) {
        self.session = None;
        self.contacts.clear();
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_SENSITIVITY)
    }
}

/// Normalize a winit wheel event to browser-style `deltaY` in logical pixels.
///
/// winit reports scrolling up as positive, the browser as negative, and
/// trackpad deltas arrive in physical pixels.
pub fn wheel_delta_y(delta: MouseScrollDelta, scale_factor: f64) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_WHEEL_LINE,
        MouseScrollDelta::PixelDelta(pos) => -pos.to_logical::<f32>(scale_factor).y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_drag_without_displacement_keeps_angles() {
        let mut tracker = PointerTracker::default();
        let mut orbit = OrbitState::new();
        orbit.set_angles(12.0, -7.0);

        tracker.pointer_down(200.0, 150.0, &orbit);
        tracker.pointer_move(200.0, 150.0, &mut orbit);

        assert_eq!(orbit.longitude(), 12.0);
        assert_eq!(orbit.latitude(), -7.0);
    }

    #[test]
    fn test_drag_direction() {
        let mut tracker = PointerTracker::default();
        let mut orbit = OrbitState::new();

        tracker.pointer_down(100.0, 100.0, &orbit);
        // 右拖 100px、下拖 50px
        tracker.pointer_move(200.0, 150.0, &mut orbit);

        assert!((orbit.longitude() - -10.0).abs() < 1e-4);
        assert!((orbit.latitude() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_move_without_session_is_ignored() {
        let mut tracker = PointerTracker::default();
        let mut orbit = OrbitState::new();
        tracker.pointer_move(500.0, 500.0, &mut orbit);
        assert_eq!(orbit, OrbitState::new());
    }

    #[test]
    fn test_new_session_anchors_on_current_angles() {
        let mut tracker = PointerTracker::default();
        let mut orbit = OrbitState::new();

        tracker.pointer_down(0.0, 0.0, &orbit);
        tracker.pointer_move(-100.0, 0.0, &mut orbit);
        tracker.pointer_up();
        assert!(!tracker.is_dragging());
        assert!((orbit.longitude() - 10.0).abs() < 1e-4);

        tracker.pointer_down(500.0, 500.0, &orbit);
        let session = tracker.session().copied().unwrap();
        assert!((session.anchor_longitude_deg - 10.0).abs() < 1e-4);

        tracker.pointer_move(400.0, 500.0, &mut orbit);
        assert!((orbit.longitude() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_latitude_is_clamped_while_dragging() {
        let mut tracker = PointerTracker::default();
        let mut orbit = OrbitState::new();
        tracker.pointer_down(0.0, 0.0, &orbit);
        tracker.pointer_move(0.0, 5000.0, &mut orbit);
        assert_eq!(orbit.latitude(), 85.0);
    }

    #[test]
    fn test_single_touch_drags() {
        let mut tracker = PointerTracker::default();
        let mut orbit = OrbitState::new();

        tracker.touch_start(1, 50.0, 50.0, &orbit);
        tracker.touch_move(1, 0.0, 50.0, &mut orbit);
        assert!((orbit.longitude() - 5.0).abs() < 1e-4);

        tracker.touch_end(1);
        assert!(!tracker.is_dragging());
    }

    #[test]
    fn test_second_finger_does_not_reanchor() {
        let mut tracker = PointerTracker::default();
        let mut orbit = OrbitState::new();

        tracker.touch_start(1, 50.0, 50.0, &orbit);
        tracker.touch_move(1, 0.0, 50.0, &mut orbit);
        let anchor = tracker.session().copied().unwrap();

        tracker.touch_start(2, 300.0, 300.0, &orbit);
        assert_eq!(tracker.session().copied().unwrap(), anchor);

        // 双指期间移动被忽略
        let before = orbit;
        tracker.touch_move(1, -500.0, 50.0, &mut orbit);
        tracker.touch_move(2, 0.0, 0.0, &mut orbit);
        assert_eq!(orbit, before);

        // 抬起第二根手指后，原会话继续
        tracker.touch_end(2);
        tracker.touch_move(1, -50.0, 50.0, &mut orbit);
        assert!((orbit.longitude() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_multi_touch_start_does_not_begin_session() {
        let mut tracker = PointerTracker::default();
        let orbit = OrbitState::new();

        tracker.touch_start(1, 0.0, 0.0, &orbit);
        tracker.touch_end(1);
        tracker.touch_start(2, 0.0, 0.0, &orbit);
        tracker.touch_start(3, 10.0, 10.0, &orbit);
        tracker.touch_end(2);
        // 3 仍按着，但它落下时已有两根手指
        assert!(!tracker.is_dragging());
    }

    #[test]
    fn test_mouse_ignored_during_touch_drag() {
        let mut tracker = PointerTracker::default();
        let mut orbit = OrbitState::new();

        tracker.touch_start(7, 0.0, 0.0, &orbit);
        tracker.pointer_down(100.0, 100.0, &orbit);
        assert_eq!(tracker.session().unwrap().pointer, PointerId::Touch(7));

        tracker.pointer_move(0.0, 0.0, &mut orbit);
        tracker.pointer_up();
        assert!(tracker.is_dragging());
        assert_eq!(orbit, OrbitState::new());
    }

    #[test]
    fn test_wheel_delta_normalization() {
        assert_eq!(wheel_delta_y(MouseScrollDelta::LineDelta(0.0, 1.0), 1.0), -100.0);
        assert_eq!(wheel_delta_y(MouseScrollDelta::LineDelta(0.0, -3.0), 2.0), 300.0);
        assert_eq!(
            wheel_delta_y(
                MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -40.0)),
                1.0
            ),
            40.0
        );
    }

    #[test]
    fn test_trackpad_delta_uses_logical_pixels() {
        let physical = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -80.0));
        assert_eq!(wheel_delta_y(physical, 2.0), 40.0);

        // 40 逻辑像素 → +2°
        let fov = crate::zoom::zoom(75.0, crate::zoom::wheel_delta(wheel_delta_y(physical, 2.0)));
        assert!((fov - 77.0).abs() < 1e-4);
    }
}
