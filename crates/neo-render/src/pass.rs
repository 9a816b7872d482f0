//! Render pass configuration for the scene pass.

/// Deep-space background, `#000510`.
pub const SPACE_CLEAR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0196,
    b: 0.0627,
    a: 1.0,
};

/// Builder for the color + depth pass descriptor.
#[derive(Debug, Clone)]
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    depth_clear: Option<f32>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    /// Clears to [`SPACE_CLEAR`] with no depth attachment.
    pub fn new() -> Self {
        Self {
            clear_color: SPACE_CLEAR,
            depth_clear: None,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Attach depth, cleared to `clear_value` every pass.
    pub fn depth(mut self, clear_value: f32) -> Self {
        self.depth_clear = Some(clear_value);
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn has_depth(&self) -> bool {
        self.depth_clear.is_some()
    }

    /// Begin the pass. `depth_view` is ignored unless [`Self::depth`] was set.
    pub fn begin<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
        depth_view: Option<&'encoder wgpu::TextureView>,
    ) -> wgpu::RenderPass<'encoder> {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        let depth_stencil_attachment = self.depth_clear.zip(depth_view).map(|(clear, view)| {
            wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }
        });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}
