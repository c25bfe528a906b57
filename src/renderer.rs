use std::sync::Arc;

use anyhow::Context as _;
use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::Camera;
use crate::frame::FrameInfo;
use crate::mesh::{MeshData, Vertex};
use crate::scene::{Scene, SceneObject, TextureKind};
use crate::texture;
use crate::types::{FrameUniform, LightsUniform, MirrorUniform, ModelUniform};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;
const REFLECTION_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const REFLECTION_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.07,
    g: 0.13,
    b: 0.17,
    a: 1.0,
};

/// Vertex/index buffers for one mesh
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    draw_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, mesh: &MeshData, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = mesh.indices.as_ref().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        Self {
            vertex_buffer,
            index_buffer,
            draw_count: mesh.draw_count(),
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(indices) => {
                pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.draw_count, 0, 0..1);
            }
            None => pass.draw(0..self.draw_count, 0..1),
        }
    }
}

/// GPU-side counterpart of one scene object
struct RenderObject {
    mesh: GpuMesh,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    texture: TextureKind,
    reflected: bool,
    emissive: bool,
}

pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    size: winit::dpi::PhysicalSize<u32>,

    frame_buffer: wgpu::Buffer,
    reflected_frame_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    reflected_frame_bind_group: wgpu::BindGroup,

    depth_view: wgpu::TextureView,
    reflection_view: wgpu::TextureView,
    reflection_depth_view: wgpu::TextureView,

    scene_pipeline: wgpu::RenderPipeline,
    reflection_pipeline: wgpu::RenderPipeline,
    stencil_mark_pipeline: wgpu::RenderPipeline,
    stencil_scene_pipeline: wgpu::RenderPipeline,
    mirror_pipeline: wgpu::RenderPipeline,

    objects: Vec<RenderObject>,
    texture_bind_groups: [wgpu::BindGroup; 4],
    mirror_mesh: GpuMesh,
    mirror_model_bind_group: wgpu::BindGroup,
    mirror_surface_bind_group: wgpu::BindGroup,
    reflection_matrix: Mat4,

    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
    no_ui: bool,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, scene: &Scene, no_ui: bool) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("requesting adapter")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("requesting device")?;

        let surface_config = Self::create_surface_config(&surface, &adapter, size);
        surface.configure(&device, &surface_config);

        // Uniform buffers and the shared group-0 layout
        let frame_buffer = Self::create_uniform_buffer::<FrameUniform>(&device, "Frame Uniform");
        let reflected_frame_buffer =
            Self::create_uniform_buffer::<FrameUniform>(&device, "Reflected Frame Uniform");
        let lights_buffer = Self::create_uniform_buffer::<LightsUniform>(&device, "Lights Uniform");

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[
                uniform_layout_entry(0),
                uniform_layout_entry(1),
            ],
        });
        let frame_bind_group = Self::create_frame_bind_group(
            &device,
            &frame_layout,
            &frame_buffer,
            &lights_buffer,
            "frame_bind_group",
        );
        let reflected_frame_bind_group = Self::create_frame_bind_group(
            &device,
            &frame_layout,
            &reflected_frame_buffer,
            &lights_buffer,
            "reflected_frame_bind_group",
        );

        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("model_bind_group_layout"),
            entries: &[uniform_layout_entry(0)],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                texture_layout_entry(0),
                sampler_layout_entry(1),
            ],
        });

        // Depth-stencil for the surface, color+depth for the reflection pass
        let depth_view = Self::create_depth_texture(&device, size, DEPTH_FORMAT, "Depth Texture");
        let reflection_depth_view = Self::create_depth_texture(
            &device,
            size,
            REFLECTION_DEPTH_FORMAT,
            "Reflection Depth Texture",
        );
        let reflection_view = Self::create_reflection_texture(&device, size);

        // Shaders and pipelines
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });
        let mirror_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mirror Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("mirror.wgsl").into()),
        });

        let scene_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Scene Pipeline Layout"),
                bind_group_layouts: &[&frame_layout, &model_layout, &texture_layout],
                push_constant_ranges: &[],
            });

        let scene_pipeline = build_pipeline(
            &device,
            &PipelineDesc {
                label: "Scene Pipeline",
                layout: &scene_pipeline_layout,
                shader: &scene_shader,
                color_format: surface_config.format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
                depth_stencil: wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                },
            },
        );

        let reflection_pipeline = build_pipeline(
            &device,
            &PipelineDesc {
                label: "Reflection Pipeline",
                layout: &scene_pipeline_layout,
                shader: &scene_shader,
                color_format: REFLECTION_FORMAT,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
                depth_stencil: wgpu::DepthStencilState {
                    format: REFLECTION_DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                },
            },
        );

        // Mirror quad into the stencil buffer only: color and depth writes off
        let mark_face = wgpu::StencilFaceState {
            compare: wgpu::CompareFunction::Always,
            fail_op: wgpu::StencilOperation::Keep,
            depth_fail_op: wgpu::StencilOperation::Keep,
            pass_op: wgpu::StencilOperation::Replace,
        };
        let stencil_mark_pipeline = build_pipeline(
            &device,
            &PipelineDesc {
                label: "Stencil Mark Pipeline",
                layout: &scene_pipeline_layout,
                shader: &scene_shader,
                color_format: surface_config.format,
                blend: None,
                write_mask: wgpu::ColorWrites::empty(),
                depth_stencil: wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: false,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState {
                        front: mark_face,
                        back: mark_face,
                        read_mask: 0xFF,
                        write_mask: 0xFF,
                    },
                    bias: wgpu::DepthBiasState::default(),
                },
            },
        );

        // Reflected scene drawn only where the mirror marked the stencil
        let gate_face = wgpu::StencilFaceState {
            compare: wgpu::CompareFunction::Equal,
            fail_op: wgpu::StencilOperation::Keep,
            depth_fail_op: wgpu::StencilOperation::Keep,
            pass_op: wgpu::StencilOperation::Keep,
        };
        let stencil_scene_pipeline = build_pipeline(
            &device,
            &PipelineDesc {
                label: "Stencil Scene Pipeline",
                layout: &scene_pipeline_layout,
                shader: &scene_shader,
                color_format: surface_config.format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
                depth_stencil: wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState {
                        front: gate_face,
                        back: gate_face,
                        read_mask: 0xFF,
                        write_mask: 0x00,
                    },
                    bias: wgpu::DepthBiasState::default(),
                },
            },
        );

        let mirror_surface_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("mirror_surface_bind_group_layout"),
                entries: &[
                    texture_layout_entry(0),
                    sampler_layout_entry(1),
                    uniform_layout_entry(2),
                ],
            });
        let mirror_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Mirror Pipeline Layout"),
                bind_group_layouts: &[&frame_layout, &model_layout, &mirror_surface_layout],
                push_constant_ranges: &[],
            });
        let mirror_pipeline = build_pipeline(
            &device,
            &PipelineDesc {
                label: "Mirror Pipeline",
                layout: &mirror_pipeline_layout,
                shader: &mirror_shader,
                color_format: surface_config.format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
                depth_stencil: wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                },
            },
        );

        // Procedural textures, one bind group per kind
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let texture_bind_groups = [
            TextureKind::Brick,
            TextureKind::Planks,
            TextureKind::Checker,
            TextureKind::White,
        ]
        .map(|kind| {
            let (w, h, pixels) = texture::image_for(kind);
            let view = texture::create_texture(&device, &queue, "Scene Texture", w, h, &pixels);
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("texture_bind_group"),
                layout: &texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            })
        });

        // Per-object GPU state
        let objects = scene
            .objects()
            .iter()
            .map(|object| Self::create_render_object(&device, &model_layout, object))
            .collect();

        // Mirror quad GPU state
        let mirror_mesh = GpuMesh::upload(&device, &scene.mirror, "Mirror Mesh");
        let mirror_model_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mirror Model Uniform"),
            contents: bytemuck::bytes_of(&ModelUniform {
                model: Mat4::IDENTITY.to_cols_array_2d(),
                emissive: 0.0,
                _pad: [0.0; 3],
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let mirror_model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mirror_model_bind_group"),
            layout: &model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: mirror_model_buffer.as_entire_binding(),
            }],
        });
        let mirror_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mirror Uniform"),
            contents: bytemuck::bytes_of(&MirrorUniform {
                color: [1.0, 1.0, 1.0, 0.3],
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let mirror_surface_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mirror_surface_bind_group"),
            layout: &mirror_surface_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&reflection_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: mirror_uniform_buffer.as_entire_binding(),
                },
            ],
        });

        // Mirror plane z = -3: reflect across it
        let reflection_matrix = Mat4::from_translation(glam::Vec3::new(0.0, 0.0, -6.0))
            * Mat4::from_scale(glam::Vec3::new(1.0, 1.0, -1.0));

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            surface_config.format,
            egui_wgpu::RendererOptions::default(),
        );

        log::info!(
            "renderer initialized: {} objects, {}x{} surface",
            scene.objects().len(),
            size.width,
            size.height
        );

        Ok(Self {
            device,
            queue,
            surface,
            size,
            frame_buffer,
            reflected_frame_buffer,
            lights_buffer,
            frame_bind_group,
            reflected_frame_bind_group,
            depth_view,
            reflection_view,
            reflection_depth_view,
            scene_pipeline,
            reflection_pipeline,
            stencil_mark_pipeline,
            stencil_scene_pipeline,
            mirror_pipeline,
            objects,
            texture_bind_groups,
            mirror_mesh,
            mirror_model_bind_group,
            mirror_surface_bind_group,
            reflection_matrix,
            egui_renderer,
            egui_state,
            egui_ctx,
            no_ui,
        })
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> wgpu::SurfaceConfiguration {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    fn create_uniform_buffer<T: bytemuck::Pod + bytemuck::Zeroable>(
        device: &wgpu::Device,
        label: &str,
    ) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&T::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    fn create_frame_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        frame_buffer: &wgpu::Buffer,
        lights_buffer: &wgpu::Buffer,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        size: winit::dpi::PhysicalSize<u32>,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_reflection_texture(
        device: &wgpu::Device,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Reflection Texture"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: REFLECTION_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_render_object(
        device: &wgpu::Device,
        model_layout: &wgpu::BindGroupLayout,
        object: &SceneObject,
    ) -> RenderObject {
        let mesh = GpuMesh::upload(device, &object.mesh, object.name);
        let model_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(object.name),
            contents: bytemuck::bytes_of(&ModelUniform {
                model: object.model_matrix().to_cols_array_2d(),
                emissive: if object.emissive { 1.0 } else { 0.0 },
                _pad: [0.0; 3],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(object.name),
            layout: model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
        });
        RenderObject {
            mesh,
            model_buffer,
            model_bind_group,
            texture: object.texture,
            reflected: object.reflected,
            emissive: object.emissive,
        }
    }

    fn texture_bind_group(&self, kind: TextureKind) -> &wgpu::BindGroup {
        let index = match kind {
            TextureKind::Brick => 0,
            TextureKind::Planks => 1,
            TextureKind::Checker => 2,
            TextureKind::White => 3,
        };
        &self.texture_bind_groups[index]
    }

    /// Let egui see the event; returns true if it was consumed
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        if self.no_ui {
            return false;
        }
        self.egui_state.on_window_event(window, event).consumed
    }

    pub fn render(
        &mut self,
        camera: &Camera,
        scene: &Scene,
        window: &Window,
        frame: &FrameInfo,
        fps: f32,
        mode_label: &str,
    ) -> Result<(), wgpu::SurfaceError> {
        self.upload_frame_data(camera, scene, frame.time);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder"),
            });

        self.encode_reflection_pass(&mut encoder);
        self.encode_main_pass(&mut encoder, &view);
        if !self.no_ui {
            self.encode_overlay_pass(&mut encoder, &view, window, fps, mode_label);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Write the per-frame uniforms: normal view, reflected view, lights,
    /// per-object model matrices
    fn upload_frame_data(&mut self, camera: &Camera, scene: &Scene, time: f32) {
        let fog_gray = 0.5 + 0.5 * (time / 10.0).cos();
        let fog_color = [fog_gray, fog_gray, fog_gray];
        let fog_start = -4.0;
        let fog_end = 1.0 + 20.0 * time.cos();

        let frame = FrameUniform {
            view: camera.view().to_cols_array_2d(),
            projection: camera.projection().to_cols_array_2d(),
            camera_pos: camera.position.to_array(),
            time,
            fog_color,
            fog_start,
            fog_end,
            _pad: [0.0; 3],
        };
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        let reflected_eye = self.reflection_matrix * camera.position.extend(1.0);
        let reflected = FrameUniform {
            view: (camera.view() * self.reflection_matrix).to_cols_array_2d(),
            camera_pos: [reflected_eye.x, reflected_eye.y, reflected_eye.z],
            ..frame
        };
        self.queue.write_buffer(
            &self.reflected_frame_buffer,
            0,
            bytemuck::bytes_of(&reflected),
        );

        let lights = scene.lights.to_uniform();
        self.queue
            .write_buffer(&self.lights_buffer, 0, bytemuck::bytes_of(&lights));

        for (render_object, scene_object) in self.objects.iter().zip(scene.objects()) {
            let model = ModelUniform {
                model: scene_object.model_matrix().to_cols_array_2d(),
                emissive: if render_object.emissive { 1.0 } else { 0.0 },
                _pad: [0.0; 3],
            };
            self.queue.write_buffer(
                &render_object.model_buffer,
                0,
                bytemuck::bytes_of(&model),
            );
        }
    }

    /// Offscreen render of the reflected scene, used by the mirror surface
    fn encode_reflection_pass(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Reflection Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.reflection_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.reflection_depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        pass.set_pipeline(&self.reflection_pipeline);
        pass.set_bind_group(0, &self.reflected_frame_bind_group, &[]);
        self.draw_objects(&mut pass, true);
    }

    /// Scene, stencil mark, stencil-gated reflection, mirror surface - one
    /// pass, four pipelines
    fn encode_main_pass(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(0),
                    store: wgpu::StoreOp::Store,
                }),
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        // Lit scene
        pass.set_pipeline(&self.scene_pipeline);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        self.draw_objects(&mut pass, false);

        // Mirror quad marks its area in the stencil buffer
        pass.set_pipeline(&self.stencil_mark_pipeline);
        pass.set_stencil_reference(1);
        pass.set_bind_group(1, &self.mirror_model_bind_group, &[]);
        pass.set_bind_group(2, self.texture_bind_group(TextureKind::White), &[]);
        self.mirror_mesh.draw(&mut pass);

        // Reflected scene, only inside the marked region
        pass.set_pipeline(&self.stencil_scene_pipeline);
        pass.set_bind_group(0, &self.reflected_frame_bind_group, &[]);
        self.draw_objects(&mut pass, true);

        // Semi-transparent mirror surface over the top
        pass.set_pipeline(&self.mirror_pipeline);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        pass.set_bind_group(1, &self.mirror_model_bind_group, &[]);
        pass.set_bind_group(2, &self.mirror_surface_bind_group, &[]);
        self.mirror_mesh.draw(&mut pass);
    }

    fn draw_objects(&self, pass: &mut wgpu::RenderPass<'_>, reflected_only: bool) {
        for object in &self.objects {
            if reflected_only && !object.reflected {
                continue;
            }
            pass.set_bind_group(1, &object.model_bind_group, &[]);
            pass.set_bind_group(2, self.texture_bind_group(object.texture), &[]);
            object.mesh.draw(pass);
        }
    }

    fn encode_overlay_pass(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        window: &Window,
        fps: f32,
        mode_label: &str,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::Window::new("HUD")
                .title_bar(false)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 10.0))
                .frame(egui::Frame::NONE)
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(format!("{:.0}", fps))
                            .size(36.0)
                            .color(egui::Color32::from_rgb(74, 158, 255)),
                    );
                    ui.label(
                        egui::RichText::new(format!("FPS | {}", mode_label))
                            .size(12.0)
                            .color(egui::Color32::GRAY),
                    );
                    ui.label(
                        egui::RichText::new("1/2/3 modes  WASD move  LMB orbit  arrows spot")
                            .size(10.0)
                            .color(egui::Color32::DARK_GRAY),
                    );
                });
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.size.width, self.size.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // SAFETY: The render pass lifetime is actually tied to the encoder,
            // but egui-wgpu requires 'static. This is safe because we drop the
            // render pass before using the encoder again.
            let render_pass_static = unsafe {
                std::mem::transmute::<&mut wgpu::RenderPass<'_>, &mut wgpu::RenderPass<'static>>(
                    &mut render_pass,
                )
            };

            self.egui_renderer
                .render(render_pass_static, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn uniform_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// Parameters that vary between the five pipelines
struct PipelineDesc<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    write_mask: wgpu::ColorWrites,
    depth_stencil: wgpu::DepthStencilState,
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Float32x2,
    3 => Float32x3,
];

fn build_pipeline(device: &wgpu::Device, desc: &PipelineDesc) -> wgpu::RenderPipeline {
    let vertex_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.color_format,
                blend: desc.blend,
                write_mask: desc.write_mask,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Reflected draws flip winding, so no face culling
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(desc.depth_stencil.clone()),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}
