//! Frame Graph - a per-frame render graph
//!
//! Render passes declare which resources they read and write. The graph turns
//! those declarations into an execution order, runs the passes and discards
//! itself, so every frame is built from scratch.
//!
//! # Features
//! - Single-writer validation and read/write conflict detection
//! - Stable topological ordering with cycle detection
//! - Explicit pass id registry keyed by type or tag
//! - Token-checked access to externally owned resources

pub mod render_graph;
pub mod resources;

pub use render_graph::{
    FramePass, GraphError, GraphErrorKind, GraphResult, GraphState, PassIdRegistry, RenderGraph,
    RenderGraphConfig, RenderPass, RenderPassBuilder, RenderPassContext, RenderPassId,
    ResourceAccessToken, ResourceHandle, SharedPassIdRegistry, TieBreak,
};
pub use resources::{ResourceContainer, ResourceError, ResourceManager};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the crate version. Call once after installing a logger.
pub fn init() {
    log::info!("Frame Graph v{} initialized", VERSION);
}
