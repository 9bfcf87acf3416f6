// renderer.rs — wgpu 渲染引擎：球体网格 + 基础材质 + egui 叠加

use std::sync::Arc;

use glam::Vec3;
use image::{GenericImage, Rgba, RgbaImage};
use thiserror::Error;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::engine::{
    Axis, BasicMaterial, CameraDesc, CameraId, GeometryId, MaterialId, MeshId, PerspectiveCamera,
    PointLight, RenderEngine, RendererId, Rgb, SceneId, TextureId,
};
use crate::mesh::{build_sphere, SphereMesh, Vertex};

const MSAA_SAMPLES: u32 = 4;
const UI_CLEAR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("cannot create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("cannot open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MaterialUniform {
    color: [f32; 4],
    textured: u32,
    pad: [u32; 3],
}

struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct GpuMaterial {
    _uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    material: MaterialId,
}

struct Scene {
    background: Rgb,
    meshes: Vec<MeshId>,
    lights: Vec<PointLight>,
}

/// 场景渲染目标：管线与 MSAA 缓冲（create_renderer 时创建）
struct SceneTarget {
    pipeline: wgpu::RenderPipeline,
    sample_count: u32,
    msaa_view: Option<wgpu::TextureView>,
}

pub struct Renderer {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    pixels_per_point: f32,
    msaa_supported: bool,

    camera_bind_group_layout: wgpu::BindGroupLayout,
    material_bind_group_layout: wgpu::BindGroupLayout,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    white_texture: GpuTexture,

    target: Option<SceneTarget>,
    scenes: Vec<Scene>,
    cameras: Vec<PerspectiveCamera>,
    geometries: Vec<SphereMesh>,
    textures: Vec<GpuTexture>,
    materials: Vec<GpuMaterial>,
    meshes: Vec<GpuMesh>,
    pending_draw: Option<SceneId>,

    // UI
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> Result<Self, RendererError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = unsafe { instance.create_surface(window.as_ref()) }?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::NoAdapter)?;
        log::info!("using GPU adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: if cfg!(target_arch = "wasm32") {
                        wgpu::Limits::downlevel_webgl2_defaults()
                    } else {
                        wgpu::Limits::default().using_resolution(adapter.limits())
                    },
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let msaa_supported = adapter
            .get_texture_format_features(surface_format)
            .flags
            .sample_count_supported(MSAA_SAMPLES);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo, // VSync on
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        // --- Camera uniform ---
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform {
                view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        // --- Material layout: uniform + texture + sampler ---
        let material_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some("material_bind_group_layout"),
            });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat, // 全景图水平循环
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // 纯色材质绑定一张 1x1 白色纹理
        let white_texture = upload_rgba(
            &device,
            &queue,
            &RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255])),
            "white_texture",
        );

        // --- Egui ---
        let egui_ctx = egui::Context::default();
        let mut egui_state = egui_winit::State::new(window.as_ref());
        let pixels_per_point = window.scale_factor() as f32;
        egui_state.set_pixels_per_point(pixels_per_point);
        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            pixels_per_point,
            msaa_supported,
            camera_bind_group_layout,
            material_bind_group_layout,
            camera_buffer,
            camera_bind_group,
            sampler,
            white_texture,
            target: None,
            scenes: Vec::new(),
            cameras: Vec::new(),
            geometries: Vec::new(),
            textures: Vec::new(),
            materials: Vec::new(),
            meshes: Vec::new(),
            pending_draw: None,
            egui_ctx,
            egui_state,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            if let Some(target) = self.target.as_mut() {
                target.msaa_view =
                    create_msaa_view(&self.device, &self.config, target.sample_count);
            }
        }
    }

    pub fn set_pixels_per_point(&mut self, pixels_per_point: f32) {
        self.pixels_per_point = pixels_per_point;
        self.egui_state.set_pixels_per_point(pixels_per_point);
    }

    fn build_pipeline(&self, sample_count: u32) -> wgpu::RenderPipeline {
        let shader = self
            .device
            .create_shader_module(wgpu::include_wgsl!("shader.wgsl"));
        let layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Sphere Pipeline Layout"),
                bind_group_layouts: &[
                    &self.camera_bind_group_layout,
                    &self.material_bind_group_layout,
                ],
                push_constant_ranges: &[],
            });

        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Sphere Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None, // 相机在球内，两面都画
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None, // 只有一个球，不需要深度
                multisample: wgpu::MultisampleState {
                    count: sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
            })
    }

    /// 提交本帧：先画 render() 请求的场景，再叠加 UI
    pub fn present(
        &mut self,
        window: &Window,
        run_ui: impl FnOnce(&egui::Context),
    ) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // 1. Scene (或仅清屏)
        let draw = self.pending_draw.take();
        {
            let scene = draw.and_then(|id| self.scenes.get(id.0));
            let target = self.target.as_ref();

            let msaa_view = target.and_then(|t| t.msaa_view.as_ref());
            let (attachment_view, resolve_target) = match msaa_view {
                Some(msaa) if scene.is_some() => (msaa, Some(&view)),
                _ => (&view, None),
            };
            let clear = scene.map_or(UI_CLEAR, |s| {
                let [r, g, b] = s.background.to_linear();
                wgpu::Color {
                    r: r as f64,
                    g: g as f64,
                    b: b as f64,
                    a: 1.0,
                }
            });

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            if let (Some(scene), Some(target)) = (scene, target) {
                render_pass.set_pipeline(&target.pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

                for mesh in scene.meshes.iter().filter_map(|id| self.meshes.get(id.0)) {
                    let Some(material) = self.materials.get(mesh.material.0) else {
                        continue;
                    };
                    render_pass.set_bind_group(1, &material.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }
        }

        // 2. UI
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, run_ui);

        self.egui_state
            .handle_platform_output(window, &self.egui_ctx, full_output.platform_output);
        let clipped_primitives = self.egui_ctx.tessellate(full_output.shapes);

        let screen_descriptor = egui_wgpu::renderer::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.pixels_per_point,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
            self.egui_renderer
                .render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// 超出 GPU 限制时缩放；高度不足 2:1 时在顶部补黑
    fn fit_panorama(&self, img: RgbaImage) -> RgbaImage {
        let max_dim = self.device.limits().max_texture_dimension_2d;
        let (src_w, src_h) = img.dimensions();

        let img = if src_w > max_dim || src_h > max_dim {
            let scale = (max_dim as f32 / src_w.max(src_h) as f32).min(1.0);
            let new_w = ((src_w as f32 * scale) as u32).max(1);
            let new_h = ((src_h as f32 * scale) as u32).max(1);
            log::warn!(
                "image {}x{} exceeds GPU limit {}, scaled to {}x{}",
                src_w,
                src_h,
                max_dim,
                new_w,
                new_h
            );
            image::DynamicImage::ImageRgba8(img)
                .resize(new_w, new_h, image::imageops::FilterType::Lanczos3)
                .to_rgba8()
        } else {
            img
        };

        let (src_w, src_h) = img.dimensions();
        let target_h = src_w / 2;
        if target_h > 0 && src_h < target_h {
            let mut canvas = RgbaImage::from_pixel(src_w, target_h, Rgba([0, 0, 0, 255]));
            // y_offset 保证不越界
            let _ = canvas.copy_from(&img, 0, target_h - src_h);
            canvas
        } else {
            img
        }
    }
}

fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    img: &RgbaImage,
    label: &str,
) -> GpuTexture {
    let (width, height) = img.dimensions();
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        label: Some(label),
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        img,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture {
        _texture: texture,
        view,
    }
}

fn create_msaa_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("msaa_color"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}

impl RenderEngine for Renderer {
    fn create_scene(&mut self, background: Rgb) -> SceneId {
        self.scenes.push(Scene {
            background,
            meshes: Vec::new(),
            lights: Vec::new(),
        });
        SceneId(self.scenes.len() - 1)
    }

    fn create_perspective_camera(&mut self, desc: CameraDesc) -> CameraId {
        self.cameras.push(PerspectiveCamera::new(desc));
        CameraId(self.cameras.len() - 1)
    }

    fn set_camera_position(&mut self, camera: CameraId, position: Vec3) {
        if let Some(c) = self.cameras.get_mut(camera.0) {
            c.position = position;
        }
    }

    fn set_camera_fov(&mut self, camera: CameraId, fov_deg: f32) {
        if let Some(c) = self.cameras.get_mut(camera.0) {
            c.fov_deg = fov_deg;
        }
    }

    fn set_camera_aspect(&mut self, camera: CameraId, aspect: f32) {
        if let Some(c) = self.cameras.get_mut(camera.0) {
            c.aspect = aspect;
        }
    }

    fn update_projection_matrix(&mut self, camera: CameraId) {
        if let Some(c) = self.cameras.get_mut(camera.0) {
            c.update_projection_matrix();
        }
    }

    fn camera_look_at(&mut self, camera: CameraId, target: Vec3) {
        if let Some(c) = self.cameras.get_mut(camera.0) {
            c.look_at(target);
        }
    }

    fn create_renderer(&mut self, antialias: bool) -> RendererId {
        let sample_count = if antialias && self.msaa_supported {
            MSAA_SAMPLES
        } else {
            1
        };
        log::info!("scene renderer created ({}x MSAA)", sample_count);

        let pipeline = self.build_pipeline(sample_count);
        self.target = Some(SceneTarget {
            pipeline,
            sample_count,
            msaa_view: create_msaa_view(&self.device, &self.config, sample_count),
        });
        // 窗口只有一个表面，渲染目标也只有一个
        RendererId(0)
    }

    fn set_size(&mut self, _renderer: RendererId, width: u32, height: u32) {
        if (width, height) != (self.config.width, self.config.height) {
            self.resize(PhysicalSize::new(width, height));
        }
    }

    fn set_pixel_ratio(&mut self, _renderer: RendererId, ratio: f32) {
        self.set_pixels_per_point(ratio);
    }

    fn create_texture(&mut self, image: RgbaImage) -> TextureId {
        let img = self.fit_panorama(image);
        let texture = upload_rgba(&self.device, &self.queue, &img, "panorama_texture");
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    fn create_sphere_geometry(
        &mut self,
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    ) -> GeometryId {
        self.geometries
            .push(build_sphere(radius, width_segments, height_segments));
        GeometryId(self.geometries.len() - 1)
    }

    fn invert_along_axis(&mut self, geometry: GeometryId, axis: Axis) {
        if let Some(g) = self.geometries.get_mut(geometry.0) {
            g.invert_along(axis);
        }
    }

    fn create_basic_material(&mut self, material: BasicMaterial) -> MaterialId {
        let texture = material
            .map
            .and_then(|id| self.textures.get(id.0))
            .unwrap_or(&self.white_texture);
        let [r, g, b] = material.color.unwrap_or(Rgb(0xffffff)).to_linear();

        let uniform = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Material Buffer"),
                contents: bytemuck::cast_slice(&[MaterialUniform {
                    color: [r, g, b, 1.0],
                    textured: material.map.is_some() as u32,
                    pad: [0; 3],
                }]),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.material_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
            label: Some("material_bind_group"),
        });

        self.materials.push(GpuMaterial {
            _uniform: uniform,
            bind_group,
        });
        MaterialId(self.materials.len() - 1)
    }

    fn create_mesh(&mut self, geometry: GeometryId, material: MaterialId) -> MeshId {
        let (vertices, indices) = match self.geometries.get(geometry.0) {
            Some(g) => (g.vertices(), g.indices.clone()),
            None => {
                log::warn!("mesh created from unknown geometry {:?}", geometry);
                (Vec::new(), Vec::new())
            }
        };

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sphere Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sphere Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        self.meshes.push(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            material,
        });
        MeshId(self.meshes.len() - 1)
    }

    fn add_to_scene(&mut self, scene: SceneId, mesh: MeshId) {
        if let Some(s) = self.scenes.get_mut(scene.0) {
            s.meshes.push(mesh);
        }
    }

    fn add_light(&mut self, scene: SceneId, light: PointLight) {
        // 基础材质不受光照影响，灯光只随场景保存
        if let Some(s) = self.scenes.get_mut(scene.0) {
            log::debug!(
                "scene {}: point light #{:06x} x{} range {} at {}",
                scene.0,
                light.color.0,
                light.intensity,
                light.distance,
                light.position
            );
            s.lights.push(light);
        }
    }

    fn render(&mut self, _renderer: RendererId, scene: SceneId, camera: CameraId) {
        let Some(c) = self.cameras.get(camera.0) else {
            return;
        };
        let uniform = CameraUniform {
            view_proj: c.view_projection().to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
        self.pending_draw = Some(scene);
    }
}
