//! Render graph configuration

/// How the compiler picks among passes that are ready at the same time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Smallest [`RenderPassId`](crate::render_graph::RenderPassId) first
    #[default]
    AscendingId,
    /// The pass that was added first runs first
    InsertionOrder,
}

/// Configuration for a [`RenderGraph`](crate::render_graph::RenderGraph)
#[derive(Debug, Clone)]
pub struct RenderGraphConfig {
    /// Ordering among independent passes
    pub tie_break: TieBreak,
    /// Expected number of passes per frame
    pub pass_capacity: usize,
    /// Log the compiled pass order at debug level
    pub log_compiled_order: bool,
}

impl Default for RenderGraphConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::AscendingId,
            pass_capacity: 16,
            log_compiled_order: false,
        }
    }
}

impl RenderGraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_pass_capacity(mut self, pass_capacity: usize) -> Self {
        self.pass_capacity = pass_capacity;
        self
    }

    pub fn with_compiled_order_logging(mut self, enabled: bool) -> Self {
        self.log_compiled_order = enabled;
        self
    }
}
