use crate::batch::{DrawBatch, DrawCall, GpuVertex, ProgramUniforms};
use bolts_common::Color;
use bolts_render::{
    CubemapImages, DepthCompare, ProgramDesc, ProgramHandle, RenderError, Renderer,
    TextureHandle, UniformValue, VertexLayout,
};
use std::collections::HashMap;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Pipelines are built lazily for each depth state a program is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PipelineKey {
    program: ProgramHandle,
    depth_test: bool,
    depth_write: bool,
}

impl From<&DrawCall> for PipelineKey {
    fn from(call: &DrawCall) -> Self {
        Self {
            program: call.program,
            depth_test: call.depth_test,
            depth_write: call.depth_write,
        }
    }
}

struct Program {
    label: String,
    vertex_module: wgpu::ShaderModule,
    /// Only set when the fragment stage has its own source.
    fragment_module: Option<wgpu::ShaderModule>,
    pipeline_layout: wgpu::PipelineLayout,
    depth_compare: wgpu::CompareFunction,
    samples_cubemap: bool,
    uniforms: ProgramUniforms,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    cubemap_bind_group: Option<wgpu::BindGroup>,
}

impl Program {
    fn fragment_module(&self) -> &wgpu::ShaderModule {
        self.fragment_module.as_ref().unwrap_or(&self.vertex_module)
    }
}

/// [`Renderer`] on top of a wgpu surface.
pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    globals_layout: wgpu::BindGroupLayout,
    cubemap_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    programs: Vec<Program>,
    textures: Vec<wgpu::TextureView>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    batch: DrawBatch,
    clear: Color,
    depth_test: bool,
    depth_write: bool,
}

impl WgpuRenderer {
    /// Create a surface for `target`, pick an adapter and open a device.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(target)
            .map_err(|e| RenderError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::Adapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("bolts_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::Device(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Surface("surface reports no formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let cubemap_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cubemap_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cubemap_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let depth_view = create_depth_texture(&device, config.width, config.height);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            ?format,
            "GPU initialized"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            globals_layout,
            cubemap_layout,
            sampler,
            programs: Vec::new(),
            textures: Vec::new(),
            pipelines: HashMap::new(),
            batch: DrawBatch::default(),
            clear: Color::BLACK,
            depth_test: true,
            depth_write: true,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_texture(&self.device, self.config.width, self.config.height);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn program(&self, handle: ProgramHandle) -> Option<&Program> {
        self.programs.get(handle.0 as usize)
    }

    /// Build any pipeline variant the recorded draws need.
    fn prepare_pipelines(&mut self) {
        for call in self.batch.calls() {
            let key = PipelineKey::from(call);
            if self.pipelines.contains_key(&key) {
                continue;
            }
            let Some(program) = self.programs.get(key.program.0 as usize) else {
                continue;
            };
            let pipeline = build_pipeline(&self.device, self.config.format, program, key);
            self.pipelines.insert(key, pipeline);
        }
    }
}

impl Renderer for WgpuRenderer {
    fn compile_program(&mut self, desc: &ProgramDesc) -> Result<ProgramHandle, RenderError> {
        let handle = ProgramHandle(self.programs.len() as u32);

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.vertex_source.as_str().into()),
        });
        let fragment_module = (desc.fragment_source != desc.vertex_source).then(|| {
            self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&desc.label),
                source: wgpu::ShaderSource::Wgsl(desc.fragment_source.as_str().into()),
            })
        });

        let mut bind_group_layouts = vec![&self.globals_layout];
        if desc.samples_cubemap {
            bind_group_layouts.push(&self.cubemap_layout);
        }
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&desc.label),
                bind_group_layouts: &bind_group_layouts,
                push_constant_ranges: &[],
            });

        let uniforms = ProgramUniforms::default();
        let globals_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("globals_buffer"),
                contents: bytemuck::bytes_of(&uniforms.globals),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let globals_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &self.globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let program = Program {
            label: desc.label.clone(),
            vertex_module,
            fragment_module,
            pipeline_layout,
            depth_compare: match desc.depth_compare {
                DepthCompare::Less => wgpu::CompareFunction::Less,
                DepthCompare::LessEqual => wgpu::CompareFunction::LessEqual,
            },
            samples_cubemap: desc.samples_cubemap,
            uniforms,
            globals_buffer,
            globals_bind_group,
            cubemap_bind_group: None,
        };

        // Building the default variant up front surfaces entry point and
        // layout mismatches as compile errors.
        let key = PipelineKey {
            program: handle,
            depth_test: true,
            depth_write: true,
        };
        let pipeline = build_pipeline(&self.device, self.config.format, &program, key);

        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(RenderError::ProgramCompile {
                label: desc.label.clone(),
                reason: err.to_string(),
            });
        }

        tracing::debug!(label = %desc.label, ?handle, "program compiled");
        self.pipelines.insert(key, pipeline);
        self.programs.push(program);
        Ok(handle)
    }

    fn upload_and_draw(
        &mut self,
        vertices: &[f32],
        layout: VertexLayout,
        program: ProgramHandle,
        vertex_count: u32,
    ) {
        let Some(color) = self.program(program).map(|p| p.uniforms.color) else {
            tracing::warn!(?program, "draw with unknown program ignored");
            return;
        };
        self.batch.push(
            program,
            vertices,
            layout,
            vertex_count,
            color,
            self.depth_test,
            self.depth_write,
        );
    }

    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: UniformValue) {
        let Some(state) = self.programs.get_mut(program.0 as usize) else {
            tracing::warn!(?program, name, "uniform for unknown program ignored");
            return;
        };
        if !state.uniforms.set(name, value) {
            tracing::debug!(program = %state.label, name, "uniform not used by this backend");
        }
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    fn set_depth_write(&mut self, enabled: bool) {
        self.depth_write = enabled;
    }

    fn begin_frame(&mut self, clear: Color) {
        self.clear = clear;
        self.batch.clear();
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                self.batch.clear();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface timed out, frame skipped");
                self.batch.clear();
                return Ok(());
            }
            Err(e) => return Err(RenderError::Surface(e.to_string())),
        };

        for program in &self.programs {
            self.queue.write_buffer(
                &program.globals_buffer,
                0,
                bytemuck::bytes_of(&program.uniforms.globals),
            );
        }
        self.prepare_pipelines();

        let vertex_buffer = (!self.batch.vertices().is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("frame_vertices"),
                    contents: bytemuck::cast_slice::<GpuVertex, u8>(self.batch.vertices()),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: self.clear.r as f64,
                            g: self.clear.g as f64,
                            b: self.clear.b as f64,
                            a: self.clear.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if let Some(buffer) = &vertex_buffer {
                pass.set_vertex_buffer(0, buffer.slice(..));
                for call in self.batch.calls() {
                    let (Some(pipeline), Some(program)) = (
                        self.pipelines.get(&PipelineKey::from(call)),
                        self.programs.get(call.program.0 as usize),
                    ) else {
                        continue;
                    };
                    pass.set_pipeline(pipeline);
                    pass.set_bind_group(0, &program.globals_bind_group, &[]);
                    if program.samples_cubemap {
                        let Some(group) = &program.cubemap_bind_group else {
                            continue;
                        };
                        pass.set_bind_group(1, group, &[]);
                    }
                    pass.draw(call.first..call.first + call.count, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        self.batch.clear();
        Ok(())
    }

    fn upload_cubemap(&mut self, images: &CubemapImages) -> Result<TextureHandle, RenderError> {
        let size = validate_faces(images)?;
        let extent = wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 6,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("skybox_cubemap"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (layer, face) in images.faces.iter().enumerate() {
            self.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: layer as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                &face.rgba,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * size),
                    rows_per_image: Some(size),
                },
                wgpu::Extent3d {
                    width: size,
                    height: size,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("skybox_cubemap_view"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(view);
        tracing::debug!(size, loaded = images.loaded, ?handle, "cubemap uploaded");
        Ok(handle)
    }

    fn bind_cubemap(&mut self, program: ProgramHandle, texture: TextureHandle) {
        let Some(view) = self.textures.get(texture.0 as usize) else {
            tracing::warn!(?texture, "bind of unknown cubemap ignored");
            return;
        };
        let Some(state) = self.programs.get_mut(program.0 as usize) else {
            tracing::warn!(?program, "cubemap bind to unknown program ignored");
            return;
        };
        if !state.samples_cubemap {
            tracing::warn!(program = %state.label, "program does not sample a cubemap");
            return;
        }
        state.cubemap_bind_group = Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cubemap_bind_group"),
            layout: &self.cubemap_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        }));
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    program: &Program,
    key: PipelineKey,
) -> wgpu::RenderPipeline {
    // With depth testing off nothing is written either.
    let (depth_compare, depth_write_enabled) = if key.depth_test {
        (program.depth_compare, key.depth_write)
    } else {
        (wgpu::CompareFunction::Always, false)
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&program.label),
        layout: Some(&program.pipeline_layout),
        vertex: wgpu::VertexState {
            module: &program.vertex_module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[GpuVertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: program.fragment_module(),
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

/// All six faces must be square RGBA8 images of one size.
fn validate_faces(images: &CubemapImages) -> Result<u32, RenderError> {
    let size = images.face_size();
    if size == 0 {
        return Err(RenderError::CubemapSize("empty faces".into()));
    }
    for (i, face) in images.faces.iter().enumerate() {
        if face.width != size || face.height != size {
            return Err(RenderError::CubemapSize(format!(
                "face {i} is {}x{}, expected {size}x{size}",
                face.width, face.height
            )));
        }
        let expected = (size as usize) * (size as usize) * 4;
        if face.rgba.len() != expected {
            return Err(RenderError::CubemapSize(format!(
                "face {i} has {} bytes, expected {expected}",
                face.rgba.len()
            )));
        }
    }
    Ok(size)
}
