//! Presents a [`Framebuffer`] in a window.
//!
//! The framebuffer is copied into a texture whenever it changed and drawn with
//! a full-screen triangle strip.

use std::num::NonZeroU32;

use log::{debug, info, warn};
use thiserror::Error;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::screen;
use crate::surface::{Framebuffer, Surface};

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("No GPU adapter found")]
    NoAdapter,

    #[error("Failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// What to do when the next surface texture cannot be acquired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Recovery {
    Reconfigure,
    SkipFrame,
    Fail,
}

impl Recovery {
    fn from_error(error: &wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Recovery::Reconfigure,
            wgpu::SurfaceError::Timeout => Recovery::SkipFrame,
            _ => Recovery::Fail,
        }
    }
}

pub struct Display {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_configuration: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    canvas_format: wgpu::TextureFormat,
    max_dimension: u32,
    canvas_texture: wgpu::Texture,
    screen_size_buffer: wgpu::Buffer,
    render_bind_group: wgpu::BindGroup,
    size: screen::Size,
}

fn create_canvas_texture(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    size: screen::Size,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("canvas-texture"),
        size: wgpu::Extent3d {
            // Zero-sized textures are invalid; a minimised window keeps a 1x1.
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
    })
}

fn create_render_bind_group(
    device: &wgpu::Device,
    render_pipeline: &wgpu::RenderPipeline,
    canvas_texture: &wgpu::Texture,
    screen_size_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    let canvas_texture_view = canvas_texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("render-bind-group"),
        layout: &render_pipeline.get_bind_group_layout(0),
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&canvas_texture_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: screen_size_buffer,
                    offset: 0,
                    size: None,
                }),
            },
        ],
    })
}

impl Display {
    pub fn new(window: &Window) -> Result<Self, DisplayError> {
        let instance = wgpu::Instance::new(wgpu::Backends::all());

        let surface = unsafe { instance.create_surface(window) };

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: Default::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .ok_or(DisplayError::NoAdapter)?;
        info!("GPU adapter: {:?}", adapter.get_info());

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("device"),
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
            },
            None,
        ))?;

        let max_dimension = device.limits().max_texture_dimension_2d;
        let size = screen::Size::from(window.inner_size()).clamped(max_dimension);
        debug!("canvas size {:?}, at most {} per side", size, max_dimension);

        let surface_format = surface
            .get_supported_formats(&adapter)
            .first()
            .copied()
            .ok_or(DisplayError::NoAdapter)?;
        // Match the surface's encoding so palette values reach the screen unchanged.
        let canvas_format = if surface_format.describe().srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };
        debug!("surface format {:?}, canvas format {:?}", surface_format, canvas_format);

        let surface_configuration = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
        };
        if !size.is_empty() {
            surface.configure(&device, &surface_configuration);
        }

        let render_shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("render-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let render_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("render-bind-group-layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: false },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("render-pipeline-layout"),
                bind_group_layouts: &[&render_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render-pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &render_shader_module,
                entry_point: "vertex_main",
                buffers: &[],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &render_shader_module,
                entry_point: "fragment_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_configuration.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
        });

        let canvas_texture = create_canvas_texture(&device, canvas_format, size);

        let screen_size_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("screen-size-buffer"),
            contents: bytemuck::cast_slice(&[size]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let render_bind_group = create_render_bind_group(
            &device,
            &render_pipeline,
            &canvas_texture,
            &screen_size_buffer,
        );

        Ok(Self {
            surface,
            device,
            queue,
            surface_configuration,
            render_pipeline,
            canvas_format,
            max_dimension,
            canvas_texture,
            screen_size_buffer,
            render_bind_group,
            size,
        })
    }

    pub fn size(&self) -> screen::Size {
        self.size
    }

    /// Resizes to the window's new size, limited to the largest texture the
    /// device supports. Returns `false` if the canvas size did not change.
    pub fn resize(&mut self, size: screen::Size) -> bool {
        let size = size.clamped(self.max_dimension);
        if size == self.size {
            return false;
        }
        debug!("resizing display to {:?}", size);
        self.size = size;
        if size.is_empty() {
            return true;
        }

        self.surface_configuration.width = size.width;
        self.surface_configuration.height = size.height;
        self.surface.configure(&self.device, &self.surface_configuration);

        self.canvas_texture.destroy();
        self.canvas_texture = create_canvas_texture(&self.device, self.canvas_format, size);
        self.queue
            .write_buffer(&self.screen_size_buffer, 0, bytemuck::cast_slice(&[size]));
        self.render_bind_group = create_render_bind_group(
            &self.device,
            &self.render_pipeline,
            &self.canvas_texture,
            &self.screen_size_buffer,
        );
        true
    }

    /// Copies `framebuffer` into the canvas texture if it changed since the last
    /// upload. Sizes must agree; a stale framebuffer is skipped.
    pub fn upload(&mut self, framebuffer: &mut Framebuffer) {
        let size = framebuffer.size();
        if size != self.size || size.is_empty() || !framebuffer.take_dirty() {
            return;
        }

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.canvas_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            framebuffer.bytes(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: NonZeroU32::new(4 * size.width),
                rows_per_image: NonZeroU32::new(size.height),
            },
            wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Draws the canvas texture to the window.
    pub fn present(&mut self) -> Result<(), DisplayError> {
        if self.size.is_empty() {
            return Ok(());
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(surface_texture) => surface_texture,
            Err(error) => match Recovery::from_error(&error) {
                Recovery::Reconfigure => {
                    warn!("{}, reconfiguring surface", error);
                    self.surface.configure(&self.device, &self.surface_configuration);
                    return Ok(());
                }
                Recovery::SkipFrame => {
                    warn!("{}, skipping frame", error);
                    return Ok(());
                }
                Recovery::Fail => return Err(error.into()),
            },
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut command_encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        {
            let mut render_pass = command_encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.render_bind_group, &[]);
            render_pass.draw(0..4, 0..1);
        }

        self.queue.submit([command_encoder.finish()]);
        surface_texture.present();
        Ok(())
    }
}
