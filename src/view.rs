// view.rs — 平面图 / 全景 两种视图的状态机与全景资源的延迟初始化

use std::path::PathBuf;

use crate::engine::{
    Axis, BasicMaterial, CameraDesc, CameraId, PointLight, RenderEngine, RendererId, Rgb,
    SceneId, TextureId,
};
use crate::panorama::{
    OrbitState, CAMERA_POSITION, SPHERE_HEIGHT_SEGMENTS, SPHERE_RADIUS, SPHERE_WIDTH_SEGMENTS,
};
use crate::shell::{HostShell, ViewState, ViewportMessage};
use crate::texture::{TextureEvent, TextureRequest};

const SCENE_BACKGROUND: Rgb = Rgb(0x0a0a0a);
const FALLBACK_SPHERE_COLOR: Rgb = Rgb(0x1e293b);
const FALLBACK_LIGHT: PointLight = PointLight {
    color: Rgb(0x6366f1),
    intensity: 1.0,
    distance: 1000.0,
    position: glam::Vec3::ZERO,
};

/// Engine handles created once on the first panorama entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanoramaResources {
    pub scene: SceneId,
    pub camera: CameraId,
    pub renderer: RendererId,
}

struct PendingTexture {
    path: PathBuf,
    request: TextureRequest,
}

pub struct ViewController {
    state: ViewState,
    image_path: PathBuf,
    resources: Option<PanoramaResources>,
    pending: Option<PendingTexture>,
}

impl ViewController {
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self {
            state: ViewState::Floorplan,
            image_path: image_path.into(),
            resources: None,
            pending: None,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn resources(&self) -> Option<PanoramaResources> {
        self.resources
    }

    /// Resources to draw with, only while the panorama is showing.
    pub fn active_resources(&self) -> Option<PanoramaResources> {
        match self.state {
            ViewState::Panorama => self.resources,
            ViewState::Floorplan => None,
        }
    }

    pub fn is_texture_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Switch to the panorama, creating its resources on first use.
    ///
    /// Returns `true` when a renderer exists and the render loop should run.
    pub fn enter_panorama<E, S>(
        &mut self,
        engine: &mut E,
        shell: &mut S,
        orbit: &OrbitState,
    ) -> bool
    where
        E: RenderEngine,
        S: HostShell,
    {
        if self.resources.is_none() {
            self.init_panorama(engine, shell, orbit);
        }

        shell.show_view(ViewState::Panorama);
        self.state = ViewState::Panorama;

        self.resources.is_some()
    }

    pub fn exit_panorama<S: HostShell>(&mut self, shell: &mut S) {
        shell.show_view(ViewState::Floorplan);
        self.state = ViewState::Floorplan;
    }

    fn init_panorama<E, S>(&mut self, engine: &mut E, shell: &mut S, orbit: &OrbitState)
    where
        E: RenderEngine,
        S: HostShell,
    {
        log::info!("initializing panorama view");

        let scene = engine.create_scene(SCENE_BACKGROUND);

        let camera =
            engine.create_perspective_camera(CameraDesc::new(orbit.fov(), shell.aspect_ratio()));
        engine.set_camera_position(camera, CAMERA_POSITION);

        let (width, height) = shell.canvas_size();
        let renderer = engine.create_renderer(true);
        engine.set_size(renderer, width, height);
        engine.set_pixel_ratio(renderer, shell.pixel_ratio());

        shell.set_viewport_message(Some(ViewportMessage::Loading { percent: None }));
        let request = engine.load_texture(&self.image_path);
        self.pending = Some(PendingTexture {
            path: self.image_path.clone(),
            request,
        });

        self.resources = Some(PanoramaResources {
            scene,
            camera,
            renderer,
        });
        log::info!("panorama view initialized");
    }

    /// Apply whatever the texture loader has reported since the last call.
    ///
    /// The first terminal event settles the load; the request is dropped with
    /// it, so nothing that arrives later can touch the scene.
    pub fn poll_texture<E, S>(&mut self, engine: &mut E, shell: &mut S)
    where
        E: RenderEngine,
        S: HostShell,
    {
        let Some(resources) = self.resources else {
            return;
        };
        let Some(mut pending) = self.pending.take() else {
            return;
        };

        for event in pending.request.poll() {
            match event {
                TextureEvent::Progress { loaded, total } => {
                    let percent = total
                        .filter(|t| *t > 0)
                        .map(|t| (loaded as f64 / t as f64 * 100.0) as f32);
                    if let Some(p) = percent {
                        log::debug!("panorama image {:.2}%", p);
                    }
                    shell.set_viewport_message(Some(ViewportMessage::Loading { percent }));
                }
                TextureEvent::Loaded(img) => {
                    log::info!("panorama image ready ({}x{})", img.width(), img.height());
                    let texture = engine.create_texture(img);
                    add_textured_sphere(engine, resources.scene, texture);
                    shell.set_viewport_message(None);
                    return;
                }
                TextureEvent::Failed(err) => {
                    log::error!(
                        "failed to load panorama image {}: {}",
                        pending.path.display(),
                        err
                    );
                    add_fallback_sphere(engine, resources.scene);
                    shell.set_viewport_message(Some(ViewportMessage::LoadFailed {
                        path: pending.path,
                        reason: err.to_string(),
                    }));
                    return;
                }
            }
        }

        self.pending = Some(pending);
    }
}

fn inverted_sphere<E: RenderEngine>(engine: &mut E) -> crate::engine::GeometryId {
    let geometry =
        engine.create_sphere_geometry(SPHERE_RADIUS, SPHERE_WIDTH_SEGMENTS, SPHERE_HEIGHT_SEGMENTS);
    // 翻转 X，让贴图朝向球内
    engine.invert_along_axis(geometry, Axis::X);
    geometry
}

fn add_textured_sphere<E: RenderEngine>(engine: &mut E, scene: SceneId, texture: TextureId) {
    let geometry = inverted_sphere(engine);
    let material = engine.create_basic_material(BasicMaterial {
        map: Some(texture),
        color: None,
    });
    let mesh = engine.create_mesh(geometry, material);
    engine.add_to_scene(scene, mesh);
}

fn add_fallback_sphere<E: RenderEngine>(engine: &mut E, scene: SceneId) {
    log::warn!("using untextured fallback sphere");
    let geometry = inverted_sphere(engine);
    let material = engine.create_basic_material(BasicMaterial {
        map: None,
        color: Some(FALLBACK_SPHERE_COLOR),
    });
    let mesh = engine.create_mesh(geometry, material);
    engine.add_to_scene(scene, mesh);
    engine.add_light(scene, FALLBACK_LIGHT);
}
