//! wgpu backend for the NEO orbit view: surface management, color pipelines
//! and the [`SceneRenderer`] frame sink.

pub mod batch;
pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod renderer;
pub mod shapes;

pub use batch::ShapeSet;
pub use buffer::{DynamicVertexBuffer, VertexPositionColor};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{RenderPassBuilder, SPACE_CLEAR};
pub use pipeline::{COLOR_SHADER_SOURCE, CameraUniform, ColorPipeline, PipelineKind};
pub use renderer::SceneRenderer;
pub use shapes::{ShapeVertex, UnitMesh};
