// session.rs — 查看器会话：持有视角、拖动、视图状态与帧循环，所有事件处理都经过这里

use crate::config::ViewerConfig;
use crate::engine::RenderEngine;
use crate::input::PointerTracker;
use crate::panorama::OrbitState;
use crate::render_loop::{RenderLoop, Tick};
use crate::shell::{HostShell, ViewState};
use crate::view::ViewController;
use crate::zoom::{self, ZoomButton};

pub struct ViewerSession {
    orbit: OrbitState,
    pointer: PointerTracker,
    view: ViewController,
    frames: RenderLoop,
}

impl ViewerSession {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            orbit: OrbitState::new(),
            pointer: PointerTracker::new(config.drag_sensitivity),
            view: ViewController::new(config.image_path.clone()),
            frames: RenderLoop::new(),
        }
    }

    pub fn orbit(&self) -> &OrbitState {
        &self.orbit
    }

    pub fn view_state(&self) -> ViewState {
        self.view.state()
    }

    #[cfg(test)]
    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub fn is_rendering(&self) -> bool {
        self.frames.is_running()
    }

    /// Whether the next host frame has anything to do.
    pub fn needs_frame(&self) -> bool {
        self.is_rendering() || self.view.is_texture_pending()
    }

    // ---- 视图切换 ----

    pub fn enter_panorama<E, S>(&mut self, engine: &mut E, shell: &mut S)
    where
        E: RenderEngine,
        S: HostShell,
    {
        if self.view.enter_panorama(engine, shell, &self.orbit) {
            self.frames.start();
        }
    }

    pub fn exit_panorama<S: HostShell>(&mut self, shell: &mut S) {
        if self.pointer.is_dragging() {
            log::debug!("drag cancelled by leaving the panorama");
        }
        self.pointer.cancel();
        self.view.exit_panorama(shell);
    }

    // ---- 指针 / 触摸（画布只在全景视图可见）----

    fn accepts_pointer(&self) -> bool {
        self.view.state() == ViewState::Panorama
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if self.accepts_pointer() {
            self.pointer.pointer_down(x, y, &self.orbit);
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer.pointer_move(x, y, &mut self.orbit);
    }

    pub fn pointer_up(&mut self) {
        self.pointer.pointer_up();
    }

    pub fn touch_start(&mut self, id: u64, x: f32, y: f32) {
        if self.accepts_pointer() {
            self.pointer.touch_start(id, x, y, &self.orbit);
        }
    }

    pub fn touch_move(&mut self, id: u64, x: f32, y: f32) {
        self.pointer.touch_move(id, x, y, &mut self.orbit);
    }

    pub fn touch_end(&mut self, id: u64) {
        self.pointer.touch_end(id);
    }

    // ---- 缩放 ----

    /// `delta_y` in browser wheel pixels, positive zooms out.
    pub fn wheel<E: RenderEngine>(&mut self, delta_y: f32, engine: &mut E) {
        if self.accepts_pointer() {
            self.apply_zoom(zoom::wheel_delta(delta_y), engine);
        }
    }

    pub fn zoom_button<E: RenderEngine>(&mut self, button: ZoomButton, engine: &mut E) {
        self.apply_zoom(button.delta(), engine);
    }

    fn apply_zoom<E: RenderEngine>(&mut self, delta_deg: f32, engine: &mut E) {
        let fov = zoom::zoom(self.orbit.fov(), delta_deg);
        self.orbit.set_fov(fov);

        // 不刷新投影矩阵画面不会变
        if let Some(res) = self.view.resources() {
            engine.set_camera_fov(res.camera, fov);
            engine.update_projection_matrix(res.camera);
        }
    }

    // ---- 窗口 ----

    pub fn resize<E: RenderEngine, S: HostShell>(&mut self, engine: &mut E, shell: &S) {
        let Some(res) = self.view.resources() else {
            return;
        };
        let (width, height) = shell.canvas_size();
        engine.set_camera_aspect(res.camera, shell.aspect_ratio());
        engine.update_projection_matrix(res.camera);
        engine.set_size(res.renderer, width, height);
    }

    // ---- 每帧 ----

    /// Called once per host frame: drain texture results, then tick the loop.
    pub fn frame<E, S>(&mut self, engine: &mut E, shell: &mut S) -> Tick
    where
        E: RenderEngine,
        S: HostShell,
    {
        self.view.poll_texture(engine, shell);
        self.frames.tick(&self.view, &self.orbit, engine)
    }
}
