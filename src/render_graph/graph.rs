//! Render graph definition, compilation and execution

use std::collections::HashMap;
use std::fmt;

use crate::render_graph::compiler::{create_nodes, stable_topological_sort};
use crate::render_graph::config::RenderGraphConfig;
use crate::render_graph::error::{GraphError, GraphResult};
use crate::render_graph::pass::*;

/// Lifecycle of a [`RenderGraph`] within one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphState {
    /// No passes registered
    Empty,
    /// Passes registered since the last successful compile
    Building,
    /// Execution order is up to date
    Compiled,
}

/// The per-frame render graph.
///
/// Every frame goes through the same cycle:
///
/// 1. [`add_pass`](Self::add_pass) for each pass; its setup step runs immediately
/// 2. [`compile`](Self::compile) derives dependencies from the declared accesses
/// 3. [`execute`](Self::execute) runs the passes and discards them
///
/// Nothing survives a successful `execute`: the next frame registers its passes
/// again from scratch. `C` is the context handed to every execute step, usually
/// a [`RenderPassContext`].
pub struct RenderGraph<C> {
    config: RenderGraphConfig,
    pass_map: HashMap<RenderPassId, RegisteredPass<C>>,
    added_pass_order: Vec<RenderPassId>,
    sorted_passes: Vec<RenderPassId>,
    state: GraphState,
}

impl<C> RenderGraph<C> {
    pub fn new() -> Self {
        Self::with_config(RenderGraphConfig::default())
    }

    pub fn with_config(config: RenderGraphConfig) -> Self {
        let capacity = config.pass_capacity;
        Self {
            config,
            pass_map: HashMap::with_capacity(capacity),
            added_pass_order: Vec::with_capacity(capacity),
            sorted_passes: Vec::with_capacity(capacity),
            state: GraphState::Empty,
        }
    }

    /// Register a pass and run its setup step.
    ///
    /// The setup step declares resource accesses through the builder and
    /// returns `false` to reject the pass, in which case nothing is registered.
    ///
    /// # Errors
    ///
    /// * [`GraphError::DuplicatePass`] - `id` is already registered; setup is not run
    /// * [`GraphError::SetupFailed`] - the setup step returned `false`
    pub fn add_pass<S, E>(&mut self, id: RenderPassId, setup: S, execute: E) -> GraphResult<()>
    where
        S: FnOnce(&mut RenderPassBuilder<'_>) -> bool,
        E: FnMut(&RenderPass, &mut C) -> bool + 'static,
    {
        let mut pass = self.new_pass(id)?;
        let accepted = pass.setup(setup);
        self.register(pass, accepted, Box::new(execute))
    }

    /// Register a [`FramePass`] implementor, exactly like [`add_pass`](Self::add_pass)
    pub fn add_frame_pass<P>(&mut self, mut frame_pass: P) -> GraphResult<()>
    where
        P: FramePass<C>,
    {
        let mut pass = self.new_pass(frame_pass.id())?;
        let accepted = pass.setup(|builder| frame_pass.setup(builder));
        self.register(
            pass,
            accepted,
            Box::new(move |pass: &RenderPass, context: &mut C| frame_pass.execute(pass, context)),
        )
    }

    fn new_pass(&self, id: RenderPassId) -> GraphResult<RenderPass> {
        if self.pass_map.contains_key(&id) {
            log::error!("Render pass {} is already registered", id);
            return Err(GraphError::DuplicatePass { id });
        }
        Ok(RenderPass::new(id))
    }

    fn register(
        &mut self,
        pass: RenderPass,
        accepted: bool,
        execute: Box<ExecuteFn<C>>,
    ) -> GraphResult<()> {
        let id = pass.id();
        if !accepted {
            log::error!("Failed to setup render pass {}", id);
            return Err(GraphError::SetupFailed { id });
        }

        log::trace!(
            "Added render pass {} ({} reads, {} writes)",
            id,
            pass.read_token().len(),
            pass.write_token().len()
        );

        self.pass_map.insert(id, RegisteredPass::new(pass, execute));
        self.added_pass_order.push(id);

        // Any previously compiled order no longer covers every pass
        self.sorted_passes.clear();
        self.state = GraphState::Building;
        Ok(())
    }

    /// Compute the execution order from the declared resource accesses.
    ///
    /// Every call recomputes the order from scratch. On failure the order is
    /// left empty and the graph cannot be executed this frame.
    ///
    /// # Errors
    ///
    /// * [`GraphError::MultipleWriters`] / [`GraphError::ReadWriteConflict`] - invalid accesses
    /// * [`GraphError::CyclicDependency`] - the passes cannot be ordered
    pub fn compile(&mut self) -> GraphResult<()> {
        self.sorted_passes.clear();
        if self.pass_map.is_empty() {
            return Ok(());
        }

        let passes: Vec<&RenderPass> = self
            .added_pass_order
            .iter()
            .map(|id| &self.pass_map[id].pass)
            .collect();

        let result = create_nodes(&passes).and_then(|nodes| {
            stable_topological_sort(&nodes, self.config.tie_break, &mut self.sorted_passes)
        });

        if let Err(e) = result {
            log::error!("Failed to compile render graph: {}", e);
            self.sorted_passes.clear();
            self.state = GraphState::Building;
            return Err(e);
        }

        log::debug!("Compiled render graph with {} passes", self.sorted_passes.len());
        if self.config.log_compiled_order {
            log::debug!("Render pass order: {:?}", self.sorted_passes);
        }

        self.state = GraphState::Compiled;
        Ok(())
    }

    /// Run every pass in compiled order, then discard the graph.
    ///
    /// The first pass that reports failure aborts the call. In that case the
    /// graph keeps its passes so the caller can inspect it, but must
    /// [`clear`](Self::clear) it before building the next frame. Executing it
    /// again without a new compile fails with [`GraphError::NotCompiled`].
    ///
    /// # Errors
    ///
    /// * [`GraphError::NotCompiled`] - passes were added since the last successful compile,
    ///   or the previous execute failed
    /// * [`GraphError::ExecutionFailed`] - an execute step returned `false`
    /// * [`GraphError::MissingPass`] - the compiled order names a pass that is not registered
    pub fn execute(&mut self, context: &mut C) -> GraphResult<()> {
        if self.pass_map.is_empty() {
            self.clear();
            return Ok(());
        }

        if self.state != GraphState::Compiled {
            log::error!("Render graph must be compiled before execution");
            return Err(GraphError::NotCompiled);
        }

        for &id in &self.sorted_passes {
            let Some(registered) = self.pass_map.get_mut(&id) else {
                log::error!("Compiled order references unregistered render pass {}", id);
                self.state = GraphState::Building;
                return Err(GraphError::MissingPass { id });
            };

            log::trace!("Executing render pass {}", id);
            if !registered.execute(context) {
                log::error!("Failed to execute render pass {}", id);
                // Passes before `id` already ran; only clear() starts a new frame
                self.state = GraphState::Building;
                return Err(GraphError::ExecutionFailed { id });
            }
        }

        self.clear();
        Ok(())
    }

    /// Drop every pass and the compiled order
    pub fn clear(&mut self) {
        self.pass_map.clear();
        self.added_pass_order.clear();
        self.sorted_passes.clear();
        self.state = GraphState::Empty;
    }

    pub fn state(&self) -> GraphState {
        self.state
    }

    pub fn config(&self) -> &RenderGraphConfig {
        &self.config
    }

    pub fn pass_count(&self) -> usize {
        self.pass_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pass_map.is_empty()
    }

    pub fn contains_pass(&self, id: RenderPassId) -> bool {
        self.pass_map.contains_key(&id)
    }

    /// Get a registered pass by id
    pub fn pass(&self, id: RenderPassId) -> Option<&RenderPass> {
        self.pass_map.get(&id).map(|registered| &registered.pass)
    }

    /// Pass ids in the order they were added
    pub fn added_pass_order(&self) -> &[RenderPassId] {
        &self.added_pass_order
    }

    /// Execution order produced by the last successful compile
    pub fn sorted_passes(&self) -> &[RenderPassId] {
        &self.sorted_passes
    }
}

impl<C> Default for RenderGraph<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for RenderGraph<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderGraph")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("added_pass_order", &self.added_pass_order)
            .field("sorted_passes", &self.sorted_passes)
            .finish()
    }
}
