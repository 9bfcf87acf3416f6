// main.rs — 程序入口：命令行、配置、窗口与事件循环

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // 在 Release 模式下隐藏控制台窗口

mod config;
mod engine;
mod fonts;
mod i18n;
mod input;
mod mesh;
mod panorama;
mod render_loop;
mod renderer;
mod session;
mod shell;
mod texture;
mod ui;
mod view;
mod zoom;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    dpi::{LogicalPosition, LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowBuilder},
};

use config::ViewerConfig;
use renderer::Renderer;
use session::ViewerSession;
use shell::ViewState;
use ui::{UiAction, UiShell};
use zoom::ZoomButton;

#[derive(Parser, Debug)]
#[command(version, about = "Floorplan and 360° room viewer")]
struct Args {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Equirectangular image to show in the room
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// UI language, e.g. en or zh-Hans
    #[arg(long, env = "PANORAMA_LANG")]
    lang: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    }
    .with_overrides(args.image, args.lang);

    i18n::init(config.lang.clone());
    log::info!(
        "starting viewer (lang {}, image {})",
        i18n::current_lang(),
        config.image_path.display()
    );

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(i18n::tr("app.title"))
            .with_inner_size(LogicalSize::new(config.window_width, config.window_height))
            .build(&event_loop)
            .context("cannot create window")?,
    );

    let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;
    if fonts::needs_cjk(&config.lang) {
        fonts::install_cjk_font(&renderer.egui_ctx);
    }
    let size = window.inner_size();
    let mut shell = UiShell::new((size.width, size.height), window.scale_factor() as f32);
    let mut session = ViewerSession::new(&config);

    // 鼠标按下事件不带坐标，记录最近一次位置
    let mut cursor = LogicalPosition::new(0.0f32, 0.0f32);

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => {
                // 先让 egui 处理事件；松开类事件总是继续传下去，避免拖动卡住
                let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
                let is_release = matches!(
                    event,
                    WindowEvent::MouseInput {
                        state: ElementState::Released,
                        ..
                    } | WindowEvent::Touch(Touch {
                        phase: TouchPhase::Ended | TouchPhase::Cancelled,
                        ..
                    })
                );
                if response.consumed && !is_release {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => {
                        *control_flow = ControlFlow::Exit;
                    }

                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        shell.set_canvas_size(new_size.width, new_size.height);
                        session.resize(&mut renderer, &shell);
                    }

                    WindowEvent::ScaleFactorChanged {
                        scale_factor,
                        new_inner_size,
                    } => {
                        renderer.set_pixels_per_point(scale_factor as f32);
                        renderer.resize(*new_inner_size);
                        shell.set_pixel_ratio(scale_factor as f32);
                        shell.set_canvas_size(new_inner_size.width, new_inner_size.height);
                        session.resize(&mut renderer, &shell);
                    }

                    // 键盘快捷键
                    WindowEvent::KeyboardInput { input, .. } => {
                        if input.state == ElementState::Pressed {
                            match input.virtual_keycode {
                                Some(VirtualKeyCode::Escape) => {
                                    if session.view_state() == ViewState::Panorama {
                                        session.exit_panorama(&mut shell);
                                    }
                                }
                                Some(VirtualKeyCode::F11) => toggle_fullscreen(&window),
                                _ => {}
                            }
                        }
                    }

                    // 鼠标拖动
                    WindowEvent::MouseInput { state, button, .. } => {
                        if button == MouseButton::Left {
                            match state {
                                ElementState::Pressed => session.pointer_down(cursor.x, cursor.y),
                                ElementState::Released => session.pointer_up(),
                            }
                        }
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = logical(position, &window);
                        session.pointer_move(cursor.x, cursor.y);
                    }

                    WindowEvent::MouseWheel { delta, .. } => {
                        let delta_y = input::wheel_delta_y(delta, window.scale_factor());
                        session.wheel(delta_y, &mut renderer);
                    }

                    // 触摸拖动
                    WindowEvent::Touch(touch) => {
                        let pos = logical(touch.location, &window);
                        match touch.phase {
                            TouchPhase::Started => session.touch_start(touch.id, pos.x, pos.y),
                            TouchPhase::Moved => session.touch_move(touch.id, pos.x, pos.y),
                            TouchPhase::Ended | TouchPhase::Cancelled => {
                                session.touch_end(touch.id)
                            }
                        }
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                if session.needs_frame() {
                    session.frame(&mut renderer, &mut shell);
                }

                let mut actions = Vec::new();
                let render_result = renderer.present(&window, |ctx| {
                    actions = shell.draw(ctx, session.orbit());
                });

                for action in actions {
                    match action {
                        UiAction::EnterPanorama => {
                            session.enter_panorama(&mut renderer, &mut shell)
                        }
                        UiAction::ExitPanorama => session.exit_panorama(&mut shell),
                        UiAction::ZoomIn => session.zoom_button(ZoomButton::In, &mut renderer),
                        UiAction::ZoomOut => session.zoom_button(ZoomButton::Out, &mut renderer),
                        UiAction::ToggleFullscreen => toggle_fullscreen(&window),
                    }
                }

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory, exiting");
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(e) => log::error!("render error: {:?}", e),
                }
            }

            Event::MainEventsCleared => {
                window.request_redraw();
            }

            _ => {}
        }
    })
}

/// Drag and wheel constants are in CSS-style logical pixels.
fn logical(position: PhysicalPosition<f64>, window: &Window) -> LogicalPosition<f32> {
    position.to_logical(window.scale_factor())
}

fn toggle_fullscreen(window: &Window) {
    if window.fullscreen().is_some() {
        window.set_fullscreen(None);
    } else {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    }
}
