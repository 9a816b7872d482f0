//! wgpu backend for the orbit view.
//!
//! [`SceneRenderer`] owns the GPU context and every buffer, and receives
//! finished frames through [`FrameSink`]. Stars are uploaded once; orbit
//! lines only when the scene's revision changes; bodies, the planet and the
//! atmosphere every frame.

use std::sync::Arc;

use neo_orbit::{Frame, FrameError, FrameSink};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::batch::{
    ShapeSet, atmosphere_vertices, body_vertices, orbit_line_vertices, planet_vertices,
    star_vertices,
};
use crate::buffer::{DynamicVertexBuffer, VertexPositionColor};
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
use crate::pass::RenderPassBuilder;
use crate::pipeline::{
    COLOR_SHADER_SOURCE, CameraUniform, ColorPipeline, PipelineKind, camera_bind_group_layout,
};

/// Draws [`Frame`]s to a window surface.
pub struct SceneRenderer {
    context: RenderContext,
    depth: DepthBuffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    opaque: ColorPipeline,
    translucent: ColorPipeline,
    lines: ColorPipeline,
    points: ColorPipeline,
    stars: DynamicVertexBuffer,
    /// The star cloud never changes once uploaded.
    stars_ready: bool,
    orbits: DynamicVertexBuffer,
    /// Scene revision the orbit buffer was built from.
    orbit_revision: Option<u64>,
    solids: DynamicVertexBuffer,
    atmosphere: DynamicVertexBuffer,
    shapes: ShapeSet,
    scratch: Vec<VertexPositionColor>,
    pass: RenderPassBuilder,
}

impl SceneRenderer {
    /// Create the GPU context for `window` and every pipeline.
    pub fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderContextError> {
        let context = init_render_context_blocking(window, vsync)?;
        Ok(Self::with_context(context))
    }

    pub fn with_context(context: RenderContext) -> Self {
        let device = &context.device;
        let (width, height) = context.size();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("color-shader"),
            source: wgpu::ShaderSource::Wgsl(COLOR_SHADER_SOURCE.into()),
        });
        let layout = camera_bind_group_layout(device);
        let pipeline = |kind| {
            ColorPipeline::new(device, &shader, &layout, context.surface_format, kind)
        };
        let opaque = pipeline(PipelineKind::Opaque);
        let translucent = pipeline(PipelineKind::Translucent);
        let lines = pipeline(PipelineKind::Lines);
        let points = pipeline(PipelineKind::Points);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera-uniform"),
            contents: bytemuck::bytes_of(&CameraUniform::new(glam::Mat4::IDENTITY)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera-bind-group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let shapes = ShapeSet::default();
        let solids_capacity = shapes.planet.vertices.len() + 10 * shapes.sphere.vertices.len();
        let atmosphere_capacity = shapes.planet.vertices.len();

        log::info!("Scene renderer ready at {}x{}", width, height);

        Self {
            depth: DepthBuffer::new(device, width, height),
            stars: DynamicVertexBuffer::new(device, "star-vertices", 0),
            stars_ready: false,
            orbits: DynamicVertexBuffer::new(device, "orbit-vertices", 0),
            orbit_revision: None,
            solids: DynamicVertexBuffer::new(device, "solid-vertices", solids_capacity),
            atmosphere: DynamicVertexBuffer::new(
                device,
                "atmosphere-vertices",
                atmosphere_capacity,
            ),
            camera_buffer,
            camera_bind_group,
            opaque,
            translucent,
            lines,
            points,
            shapes,
            scratch: Vec::new(),
            pass: RenderPassBuilder::new()
                .depth(DepthBuffer::CLEAR_VALUE)
                .label("scene-pass"),
            context,
        }
    }

    /// Resize the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring zero-sized resize {}x{}", width, height);
            return;
        }
        self.context.resize(width, height);
        self.depth.resize(&self.context.device, width, height);
    }

    /// Forget uploaded static data so the next frame re-uploads stars and
    /// orbit lines. Needed when a new scene replaces the old one.
    pub fn invalidate_scene(&mut self) {
        self.stars_ready = false;
        self.orbit_revision = None;
    }

    pub fn size(&self) -> (u32, u32) {
        self.context.size()
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    fn upload(&mut self, frame: &Frame<'_>) {
        let device = &self.context.device;
        let queue = &self.context.queue;
        let world = frame.scene.world();

        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::new(frame.view_proj)),
        );

        if !self.stars_ready {
            self.stars.upload(device, queue, &star_vertices(&world.stars));
            self.stars_ready = true;
        }

        let revision = frame.scene.revision();
        if self.orbit_revision != Some(revision) {
            self.orbits
                .upload(device, queue, &orbit_line_vertices(frame.scene));
            self.orbit_revision = Some(revision);
            log::debug!(
                "Uploaded {} orbit line vertices for revision {}",
                self.orbits.len(),
                revision
            );
        }

        self.scratch.clear();
        planet_vertices(&world.central, &world.lights, &self.shapes.planet, &mut self.scratch);
        body_vertices(frame.scene, &self.shapes, &mut self.scratch);
        self.solids.upload(device, queue, &self.scratch);

        self.scratch.clear();
        atmosphere_vertices(
            &world.central,
            frame.camera.position,
            &self.shapes.planet,
            &mut self.scratch,
        );
        self.atmosphere.upload(device, queue, &self.scratch);
    }
}

impl FrameSink for SceneRenderer {
    fn submit(&mut self, frame: &Frame<'_>) -> Result<(), FrameError> {
        let surface_texture = self.context.get_current_texture().map_err(|err| match err {
            SurfaceError::Timeout => FrameError::Skipped(err.to_string()),
            SurfaceError::Lost | SurfaceError::OutOfMemory => {
                FrameError::ContextLost(err.to_string())
            }
        })?;

        self.upload(frame);

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame-encoder"),
                });

        {
            let mut pass = self.pass.begin(&mut encoder, &view, Some(&self.depth.view));
            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            pass.set_pipeline(&self.points.pipeline);
            self.stars.draw(&mut pass);

            pass.set_pipeline(&self.opaque.pipeline);
            self.solids.draw(&mut pass);

            pass.set_pipeline(&self.lines.pipeline);
            self.orbits.draw(&mut pass);

            pass.set_pipeline(&self.translucent.pipeline);
            self.atmosphere.draw(&mut pass);
        }

        self.context.queue.submit([encoder.finish()]);
        surface_texture.present();
        Ok(())
    }
}
