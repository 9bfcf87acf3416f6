// shell.rs — 宿主界面协作接口（面板切换、画布尺寸、视口提示）

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Floorplan,
    Panorama,
}

/// Overlay shown in the middle of the panorama viewport.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportMessage {
    /// `percent` is known only when the loader knows the file size.
    Loading { percent: Option<f32> },
    LoadFailed { path: PathBuf, reason: String },
}

pub trait HostShell {
    /// Show the panel for `view` and hide the other one.
    fn show_view(&mut self, view: ViewState);
    fn canvas_size(&self) -> (u32, u32);
    fn pixel_ratio(&self) -> f32;
    fn set_viewport_message(&mut self, message: Option<ViewportMessage>);

    fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.canvas_size();
        if h == 0 {
            1.0
        } else {
            w as f32 / h as f32
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;

    pub struct FakeShell {
        pub visible: ViewState,
        pub size: (u32, u32),
        pub ratio: f32,
        pub message: Option<ViewportMessage>,
        pub messages: Vec<Option<ViewportMessage>>,
    }

    impl FakeShell {
        pub fn new() -> Self {
            Self {
                visible: ViewState::Floorplan,
                size: (1600, 900),
                ratio: 2.0,
                message: None,
                messages: Vec::new(),
            }
        }
    }

    impl HostShell for FakeShell {
        fn show_view(&mut self, view: ViewState) {
            self.visible = view;
        }

        fn canvas_size(&self) -> (u32, u32) {
            self.size
        }

        fn pixel_ratio(&self) -> f32 {
            self.ratio
        }

        fn set_viewport_message(&mut self, message: Option<ViewportMessage>) {
            self.messages.push(message.clone());
            self.message = message;
        }
    }
}
