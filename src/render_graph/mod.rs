//! Render Graph System
//!
//! A per-frame scheduler for render passes. Each pass declares which resources it
//! reads and writes; the graph derives the execution order from those
//! declarations, runs the passes and then discards itself so the next frame
//! starts from scratch.
//!
//! # Example
//!
//! ```ignore
//! use frame_graph::render_graph::{PassIdRegistry, RenderGraph, RenderPassContext};
//!
//! let mut ids = PassIdRegistry::new();
//! let mut graph = RenderGraph::new();
//!
//! graph.add_pass(
//!     ids.id_for("gbuffer"),
//!     |builder| {
//!         builder.write(gbuffer);
//!         true
//!     },
//!     |pass, ctx: &mut RenderPassContext<CommandList>| record_gbuffer(pass, ctx),
//! )?;
//! graph.add_pass(
//!     ids.id_for("lighting"),
//!     |builder| {
//!         builder.read(gbuffer).write(hdr);
//!         true
//!     },
//!     |pass, ctx| record_lighting(pass, ctx),
//! )?;
//!
//! graph.compile()?;
//! graph.execute(&mut context)?;
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod graph;
pub mod pass;
pub mod registry;
pub mod resource;

pub use compiler::*;
pub use config::*;
pub use error::*;
pub use graph::*;
pub use pass::*;
pub use registry::*;
pub use resource::*;
