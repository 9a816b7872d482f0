//! Vertex format and a growable vertex buffer for per-frame geometry.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Position and RGBA color.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPositionColor {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl VertexPositionColor {
    pub fn new(position: glam::Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        use wgpu::{VertexAttribute, VertexFormat};

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPositionColor>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: VertexFormat::Float32x3,
                },
                VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Vertex buffer that is rewritten in place and reallocated only to grow.
pub struct DynamicVertexBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    /// Capacity in vertices.
    capacity: usize,
    /// Vertices written by the last upload.
    len: u32,
}

impl DynamicVertexBuffer {
    const MIN_CAPACITY: usize = 64;

    pub fn new(device: &wgpu::Device, label: &'static str, capacity: usize) -> Self {
        let capacity = capacity.max(Self::MIN_CAPACITY);
        Self {
            label,
            buffer: Self::allocate(device, label, capacity),
            capacity,
            len: 0,
        }
    }

    /// Buffer pre-filled with `vertices`.
    pub fn with_contents(
        device: &wgpu::Device,
        label: &'static str,
        vertices: &[VertexPositionColor],
    ) -> Self {
        if vertices.is_empty() {
            return Self::new(device, label, 0);
        }
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            label,
            buffer,
            capacity: vertices.len(),
            len: vertices.len() as u32,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<VertexPositionColor>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Replace the contents, growing to the next power of two when needed.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        vertices: &[VertexPositionColor],
    ) {
        let needed = grown_capacity(self.capacity, vertices.len());
        if needed != self.capacity {
            log::debug!(
                "Growing {} from {} to {} vertices",
                self.label,
                self.capacity,
                needed
            );
            self.buffer = Self::allocate(device, self.label, needed);
            self.capacity = needed;
        }
        if !vertices.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(vertices));
        }
        self.len = vertices.len() as u32;
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bind and draw everything from the last upload.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.len == 0 {
            return;
        }
        render_pass.set_vertex_buffer(0, self.buffer.slice(..));
        render_pass.draw(0..self.len, 0..1);
    }
}

/// Capacity able to hold `needed` vertices, never shrinking.
fn grown_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two()
    }
}
