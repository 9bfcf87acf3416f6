// render_loop.rs — 全景视图的逐帧驱动

use crate::engine::RenderEngine;
use crate::panorama::OrbitState;
use crate::view::ViewController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// One frame was drawn and the loop stays scheduled.
    Rendered,
    /// The loop is not running (or just noticed the panorama is hidden).
    Stopped,
}

/// Cooperative frame loop: it stops itself on the first tick after the
/// panorama is left, there is no explicit stop call.
#[derive(Debug, Default)]
pub struct RenderLoop {
    running: bool,
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        if !self.running {
            log::debug!("render loop started");
            self.running = true;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn tick<E: RenderEngine>(
        &mut self,
        view: &ViewController,
        orbit: &OrbitState,
        engine: &mut E,
    ) -> Tick {
        if !self.running {
            return Tick::Stopped;
        }

        let Some(resources) = view.active_resources() else {
            log::debug!("render loop stopped after {} frames", self.frames());
            self.running = false;
            return Tick::Stopped;
        };

        engine.camera_look_at(resources.camera, orbit.look_at());
        engine.render(resources.renderer, resources.scene, resources.camera);
        self.frames += 1;

        Tick::Rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fake::FakeEngine;
    use crate::panorama::{compute_look_at, SPHERE_RADIUS};
    use crate::shell::fake::FakeShell;

    #[test]
    fn test_idle_loop_does_nothing() {
        let mut frames = RenderLoop::new();
        let view = ViewController::new("a.jpg");
        let mut engine = FakeEngine::new();
        assert_eq!(
            frames.tick(&view, &OrbitState::new(), &mut engine),
            Tick::Stopped
        );
        assert!(engine.renders.is_empty());
    }

    #[test]
    fn test_tick_points_camera_and_renders() {
        let mut view = ViewController::new("a.jpg");
        let mut engine = FakeEngine::new();
        let mut shell = FakeShell::new();
        let mut orbit = OrbitState::new();
        view.enter_panorama(&mut engine, &mut shell, &orbit);

        let mut frames = RenderLoop::new();
        frames.start();
        orbit.set_angles(45.0, 30.0);

        assert_eq!(frames.tick(&view, &orbit, &mut engine), Tick::Rendered);
        let res = view.resources().unwrap();
        assert_eq!(engine.renders, vec![(res.renderer, res.scene, res.camera)]);
        assert_eq!(
            engine.camera(res.camera).target(),
            compute_look_at(45.0, 30.0, SPHERE_RADIUS)
        );
        assert_eq!(frames.frames(), 1);
    }

    #[test]
    fn test_loop_stops_after_exit() {
        let mut view = ViewController::new("a.jpg");
        let mut engine = FakeEngine::new();
        let mut shell = FakeShell::new();
        let orbit = OrbitState::new();
        view.enter_panorama(&mut engine, &mut shell, &orbit);

        let mut frames = RenderLoop::new();
        frames.start();
        frames.tick(&view, &orbit, &mut engine);
        frames.tick(&view, &orbit, &mut engine);
        assert_eq!(engine.renders.len(), 2);

        view.exit_panorama(&mut shell);
        assert_eq!(frames.tick(&view, &orbit, &mut engine), Tick::Stopped);
        assert!(!frames.is_running());
        assert_eq!(frames.tick(&view, &orbit, &mut engine), Tick::Stopped);
        assert_eq!(engine.renders.len(), 2);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut frames = RenderLoop::new();
        frames.start();
        frames.start();
        assert!(frames.is_running());
    }
}
