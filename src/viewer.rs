//! Windowed viewer: flies the camera over a reference grid.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::camera::{Camera, CAMERA_UNIFORM_NAME};
use crate::config::CameraConfig;
use crate::core::{
    Button, Controller, GpuContext, InputSnapshot, UniformBinder, UniformRegistry, UniformSlot,
    WinitController,
};
use crate::scene::create_grid_scene;
use crate::types::GridVertex;

const PROJECTION_UNIFORM_NAME: &str = "projection_uniform";
const PROJECTION_FOVY: f32 = std::f32::consts::FRAC_PI_3;
const PROJECTION_ZNEAR: f32 = 0.1;
const PROJECTION_ZFAR: f32 = 500.0;
const FPS_UPDATE_INTERVAL: f32 = 1.0;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.05,
    a: 1.0,
};

/// Draws the grid scene with the camera and projection uniforms bound
struct GridRenderer {
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    uniforms: UniformRegistry,
    projection: UniformSlot,
}

impl GridRenderer {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;

        let surface_config =
            Self::create_surface_config(&surface, gpu.adapter(), size.width, size.height);
        surface.configure(gpu.device(), &surface_config);

        // The shader program's uniforms; the camera resolves its own by name
        let mut uniforms = UniformRegistry::new(gpu.clone());
        let camera_slot = uniforms.register(CAMERA_UNIFORM_NAME);
        let projection = uniforms.register(PROJECTION_UNIFORM_NAME);

        let (render_pipeline, bind_group) = Self::create_render_pipeline(
            gpu.device(),
            &uniforms,
            camera_slot,
            projection,
            surface_config.format,
        )?;

        let vertices = create_grid_scene();
        let vertex_buffer = gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Grid Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let renderer = Self {
            gpu,
            surface,
            surface_config,
            render_pipeline,
            bind_group,
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            uniforms,
            projection,
        };
        renderer.upload_projection();

        log::info!("Grid renderer initialized: {}x{}", size.width, size.height);
        Ok(renderer)
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
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
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    fn create_render_pipeline(
        device: &wgpu::Device,
        uniforms: &UniformRegistry,
        camera_slot: UniformSlot,
        projection_slot: UniformSlot,
        format: wgpu::TextureFormat,
    ) -> anyhow::Result<(wgpu::RenderPipeline, wgpu::BindGroup)> {
        let camera_buffer = uniforms
            .buffer(camera_slot)
            .context("Camera uniform buffer missing")?;
        let projection_buffer = uniforms
            .buffer(projection_slot)
            .context("Projection uniform buffer missing")?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Grid Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("grid.wgsl").into()),
        });

        let matrix_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            // Binding 0: camera view, binding 1: projection
            entries: &[matrix_entry(0), matrix_entry(1)],
            label: Some("grid_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: projection_buffer.as_entire_binding(),
                },
            ],
            label: Some("grid_bind_group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Grid Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GridVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32],
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Grid Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        });

        Ok((pipeline, bind_group))
    }

    fn uniforms(&self) -> &UniformRegistry {
        &self.uniforms
    }

    fn upload_projection(&self) {
        let aspect = self.surface_config.width as f32 / self.surface_config.height as f32;
        let projection =
            Mat4::perspective_rh(PROJECTION_FOVY, aspect, PROJECTION_ZNEAR, PROJECTION_ZFAR);
        self.uniforms.upload_matrix(self.projection, &projection);
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.surface_config.width = width;
            self.surface_config.height = height;
            self.surface.configure(self.gpu.device(), &self.surface_config);
            self.upload_projection();
        }
    }

    fn render(&mut self) -> anyhow::Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost, reconfiguring");
                self.surface.configure(self.gpu.device(), &self.surface_config);
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to acquire surface texture"),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Grid Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..self.vertex_count, 0..1);
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Window, renderer and camera for one viewer session
pub struct ViewerApp {
    config: CameraConfig,
    initial_size: (u32, u32),
    window: Option<Arc<Window>>,
    renderer: Option<GridRenderer>,
    camera: Option<Camera<UniformSlot>>,
    controller: WinitController,
    recenter_held: bool,
    last_frame_time: Instant,
    frame_count: u32,
    fps_update_timer: f32,
}

impl ViewerApp {
    pub fn new(config: CameraConfig, width: u32, height: u32) -> Self {
        Self {
            config,
            initial_size: (width, height),
            window: None,
            renderer: None,
            camera: None,
            controller: WinitController::new(width, height),
            recenter_held: false,
            last_frame_time: Instant::now(),
            frame_count: 0,
            fps_update_timer: 0.0,
        }
    }

    fn update_fps(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        self.frame_count += 1;
        self.fps_update_timer += delta;

        if self.fps_update_timer >= FPS_UPDATE_INTERVAL {
            let fps = self.frame_count as f32 / self.fps_update_timer;
            log::debug!("FPS: {fps:.1}");
            self.frame_count = 0;
            self.fps_update_timer = 0.0;
        }
    }

    /// One frame of the render loop: input, camera update, bind, draw
    fn frame(&mut self) -> anyhow::Result<()> {
        self.update_fps();

        let (Some(renderer), Some(camera)) = (&mut self.renderer, &mut self.camera) else {
            return Ok(());
        };

        let recenter = self.controller.is_down(Button::Recenter);
        if recenter && !self.recenter_held {
            camera.reset();
        }
        self.recenter_held = recenter;

        let input = InputSnapshot::capture(&self.controller);
        camera.update(&input);
        camera.bind(renderer.uniforms());

        renderer.render()
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.initial_size;
        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Inertial Camera")
                .with_inner_size(winit::dpi::LogicalSize::new(width, height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let renderer = match pollster::block_on(GridRenderer::new(window.clone())) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to initialize renderer: {e:#}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.controller.resize(size.width, size.height);
        self.camera = Some(Camera::initialize(renderer.uniforms(), &self.config));
        self.renderer = Some(renderer);
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        self.controller.process_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { .. } if self.controller.is_down(Button::Escape) => {
                event_loop.exit()
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.frame() {
                    log::error!("Render error: {e:#}");
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open the viewer window and run until it is closed
pub fn run(config: CameraConfig, width: u32, height: u32) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = ViewerApp::new(config, width, height);

    log::info!("Controls: WASD/arrows move, Shift turbo, mouse look, R recenter, Escape quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
