//! Color pipelines for the scene: shaded bodies, the atmosphere shell, orbit
//! lines and stars.

use bytemuck::{Pod, Zeroable};
use std::num::NonZeroU64;

use crate::buffer::VertexPositionColor;
use crate::depth::DepthBuffer;

/// Uniform buffer for the camera view-projection matrix.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4], // 64 bytes, mat4x4
}

impl CameraUniform {
    pub fn new(view_proj: glam::Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}

/// Raster state variants sharing one shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineKind {
    /// Depth-tested, depth-writing triangles.
    Opaque,
    /// Alpha-blended triangles that test but do not write depth.
    Translucent,
    /// Alpha-blended line list.
    Lines,
    /// Point list.
    Points,
}

impl PipelineKind {
    fn label(self) -> &'static str {
        match self {
            PipelineKind::Opaque => "opaque-pipeline",
            PipelineKind::Translucent => "translucent-pipeline",
            PipelineKind::Lines => "line-pipeline",
            PipelineKind::Points => "point-pipeline",
        }
    }

    pub fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            PipelineKind::Opaque | PipelineKind::Translucent => {
                wgpu::PrimitiveTopology::TriangleList
            }
            PipelineKind::Lines => wgpu::PrimitiveTopology::LineList,
            PipelineKind::Points => wgpu::PrimitiveTopology::PointList,
        }
    }

    pub fn writes_depth(self) -> bool {
        matches!(self, PipelineKind::Opaque | PipelineKind::Points)
    }

    pub fn blend(self) -> Option<wgpu::BlendState> {
        match self {
            PipelineKind::Opaque | PipelineKind::Points => None,
            PipelineKind::Translucent | PipelineKind::Lines => {
                Some(wgpu::BlendState::ALPHA_BLENDING)
            }
        }
    }

    fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            PipelineKind::Opaque => Some(wgpu::Face::Back),
            _ => None,
        }
    }
}

/// Colored-geometry pipeline for one [`PipelineKind`].
pub struct ColorPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub kind: PipelineKind,
}

impl ColorPipeline {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        kind: PipelineKind,
    ) -> Self {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("color-pipeline-layout"),
            bind_group_layouts: &[camera_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(kind.label()),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPositionColor::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: kind.topology(),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: kind.cull_mode(),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: kind.writes_depth(),
                depth_compare: DepthBuffer::COMPARE_FUNCTION,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: kind.blend(),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self { pipeline, kind }
    }
}

/// Layout for the camera uniform at group 0, binding 0.
pub fn camera_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("camera-bind-group-layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(64), // mat4x4<f32>
            },
            count: None,
        }],
    })
}

/// Vertex colors are pre-shaded on the CPU; the shader only transforms.
pub const COLOR_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(in.position, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_uniform_size() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
    }

    #[test]
    fn test_camera_uniform_column_major() {
        let m = glam::Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let uniform = CameraUniform::new(m);
        assert_eq!(uniform.view_proj[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_translucent_kinds_blend_without_depth_write() {
        for kind in [PipelineKind::Translucent, PipelineKind::Lines] {
            assert!(kind.blend().is_some());
            assert!(!kind.writes_depth());
        }
        assert!(PipelineKind::Opaque.blend().is_none());
        assert!(PipelineKind::Opaque.writes_depth());
    }

    #[test]
    fn test_topologies() {
        assert_eq!(
            PipelineKind::Lines.topology(),
            wgpu::PrimitiveTopology::LineList
        );
        assert_eq!(
            PipelineKind::Points.topology(),
            wgpu::PrimitiveTopology::PointList
        );
        assert_eq!(
            PipelineKind::Translucent.topology(),
            wgpu::PrimitiveTopology::TriangleList
        );
    }

    #[test]
    fn test_shader_entry_points_present() {
        assert!(COLOR_SHADER_SOURCE.contains("fn vs_main"));
        assert!(COLOR_SHADER_SOURCE.contains("fn fs_main"));
        assert!(COLOR_SHADER_SOURCE.contains("view_proj: mat4x4<f32>"));
    }
}
