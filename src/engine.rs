// engine.rs — 渲染引擎协作接口
//
// 视图控制器只通过这个 trait 创建场景、相机、球体和纹理；
// wgpu 实现在 renderer.rs，测试用的记录实现在本文件末尾。

use std::path::Path;

use glam::{Mat4, Vec3};
use image::RgbaImage;

use crate::texture::{self, TextureRequest};

macro_rules! handle {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $name(pub usize);
        )*
    };
}

handle!(SceneId, CameraId, RendererId, TextureId, GeometryId, MaterialId, MeshId);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u32);

impl Rgb {
    /// sRGB 分量，0..1
    pub fn to_srgb(self) -> [f32; 3] {
        let r = ((self.0 >> 16) & 0xff) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xff) as f32 / 255.0;
        let b = (self.0 & 0xff) as f32 / 255.0;
        [r, g, b]
    }

    /// 线性空间分量，写入 sRGB 表面前使用
    pub fn to_linear(self) -> [f32; 3] {
        self.to_srgb().map(|c| {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    #[cfg(test)]
    Y,
    #[cfg(test)]
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraDesc {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraDesc {
    pub fn new(fov_deg: f32, aspect: f32) -> Self {
        Self {
            fov_deg,
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Unlit material: either a texture map, a flat color, or both (tint).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BasicMaterial {
    pub map: Option<TextureId>,
    pub color: Option<Rgb>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Rgb,
    pub intensity: f32,
    pub distance: f32,
    pub position: Vec3,
}

/// Perspective camera whose projection is only rebuilt on request.
///
/// Changing `fov_deg` or `aspect` has no visible effect until
/// [`PerspectiveCamera::update_projection_matrix`] runs.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    target: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(desc: CameraDesc) -> Self {
        let mut camera = Self {
            fov_deg: desc.fov_deg,
            aspect: desc.aspect,
            near: desc.near,
            far: desc.far,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target(), Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

/// Rendering collaborator used by the view controller and render loop.
pub trait RenderEngine {
    fn create_scene(&mut self, background: Rgb) -> SceneId;

    fn create_perspective_camera(&mut self, desc: CameraDesc) -> CameraId;
    fn set_camera_position(&mut self, camera: CameraId, position: Vec3);
    fn set_camera_fov(&mut self, camera: CameraId, fov_deg: f32);
    fn set_camera_aspect(&mut self, camera: CameraId, aspect: f32);
    fn update_projection_matrix(&mut self, camera: CameraId);
    fn camera_look_at(&mut self, camera: CameraId, target: Vec3);

    fn create_renderer(&mut self, antialias: bool) -> RendererId;
    fn set_size(&mut self, renderer: RendererId, width: u32, height: u32);
    fn set_pixel_ratio(&mut self, renderer: RendererId, ratio: f32);

    /// Start loading an image from disk; results arrive on the returned request.
    fn load_texture(&mut self, path: &Path) -> TextureRequest {
        texture::spawn_load(path)
    }
    fn create_texture(&mut self, image: RgbaImage) -> TextureId;

    fn create_sphere_geometry(
        &mut self,
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    ) -> GeometryId;
    fn invert_along_axis(&mut self, geometry: GeometryId, axis: Axis);
    fn create_basic_material(&mut self, material: BasicMaterial) -> MaterialId;
    fn create_mesh(&mut self, geometry: GeometryId, material: MaterialId) -> MeshId;

    fn add_to_scene(&mut self, scene: SceneId, mesh: MeshId);
    fn add_light(&mut self, scene: SceneId, light: PointLight);

    fn render(&mut self, renderer: RendererId, scene: SceneId, camera: CameraId);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_waits_for_update() {
        let mut camera = PerspectiveCamera::new(CameraDesc::new(75.0, 16.0 / 9.0));
        let before = camera.projection();

        camera.fov_deg = 40.0;
        assert_eq!(camera.projection(), before);

        camera.update_projection_matrix();
        assert_ne!(camera.projection(), before);
    }

    #[test]
    fn test_view_projection_is_invertible() {
        let mut camera = PerspectiveCamera::new(CameraDesc::new(75.0, 1.5));
        camera.position = Vec3::new(0.0, 0.0, 0.1);
        camera.look_at(Vec3::new(500.0, 0.0, 0.0));
        assert!(camera.view_projection().determinant().abs() > 1e-6);
    }

    #[test]
    fn test_rgb_components() {
        assert_eq!(Rgb(0xff0000).to_srgb(), [1.0, 0.0, 0.0]);
        let linear = Rgb(0x808080).to_linear();
        assert!((linear[0] - 0.2158).abs() < 1e-3);
    }
}
