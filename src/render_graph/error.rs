//! Render graph error types

use crate::render_graph::pass::RenderPassId;
use crate::render_graph::resource::ResourceHandle;
use thiserror::Error;

/// Errors raised while building, compiling or executing a render graph.
///
/// All of them are fatal for the current frame's graph. The graph never
/// retries; the caller decides whether to skip the frame or give up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Render pass {id} is already registered")]
    DuplicatePass { id: RenderPassId },
    #[error("Failed to setup render pass {id}")]
    SetupFailed { id: RenderPassId },
    #[error("Multiple writers for {resource}: {first} and {second}")]
    MultipleWriters {
        resource: ResourceHandle,
        first: RenderPassId,
        second: RenderPassId,
    },
    #[error("Render pass {pass} both reads and writes {resource}")]
    ReadWriteConflict {
        pass: RenderPassId,
        resource: ResourceHandle,
    },
    #[error("Cyclic dependency between render passes: {}", join_ids(.involved))]
    CyclicDependency { involved: Vec<RenderPassId> },
    #[error("Failed to execute render pass {id}")]
    ExecutionFailed { id: RenderPassId },
    #[error("Render graph must be compiled before execution")]
    NotCompiled,
    #[error("Render pass {id} is in the compiled order but not registered")]
    MissingPass { id: RenderPassId },
}

/// Coarse classification of [`GraphError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphErrorKind {
    /// The graph was used out of order or a pass id was reused
    Construction,
    /// A setup step rejected its pass
    Setup,
    /// Declared accesses violate the single-writer rules
    ResourceConflict,
    /// Dependencies cannot be ordered
    Cycle,
    /// An execute step reported failure
    Execution,
}

impl GraphError {
    pub fn kind(&self) -> GraphErrorKind {
        match self {
            Self::DuplicatePass { .. } | Self::NotCompiled | Self::MissingPass { .. } => {
                GraphErrorKind::Construction
            }
            Self::SetupFailed { .. } => GraphErrorKind::Setup,
            Self::MultipleWriters { .. } | Self::ReadWriteConflict { .. } => {
                GraphErrorKind::ResourceConflict
            }
            Self::CyclicDependency { .. } => GraphErrorKind::Cycle,
            Self::ExecutionFailed { .. } => GraphErrorKind::Execution,
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

fn join_ids(ids: &[RenderPassId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
