//! Render pass definitions for the render graph

use crate::render_graph::resource::*;
use std::fmt;

/// Identifier of a render pass type.
///
/// Ids are handed out by a [`PassIdRegistry`](crate::render_graph::PassIdRegistry)
/// and order the zero-dependency frontier during compilation: among passes that
/// are ready at the same time, the smaller id runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderPassId(u32);

impl RenderPassId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RenderPassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Records the resource accesses of one pass during its setup step.
///
/// A builder only lives for the duration of a single setup call and writes
/// straight into that pass's tokens.
pub struct RenderPassBuilder<'a> {
    id: RenderPassId,
    read_token: &'a mut ResourceAccessToken,
    write_token: &'a mut ResourceAccessToken,
}

impl<'a> RenderPassBuilder<'a> {
    /// Id of the pass being set up
    pub fn id(&self) -> RenderPassId {
        self.id
    }

    /// Declare that this pass reads from a resource
    pub fn read(&mut self, handle: ResourceHandle) -> &mut Self {
        log::trace!("Render pass {} reads {}", self.id, handle);
        self.read_token.permit(handle);
        self
    }

    /// Declare that this pass writes to a resource
    pub fn write(&mut self, handle: ResourceHandle) -> &mut Self {
        log::trace!("Render pass {} writes {}", self.id, handle);
        self.write_token.permit(handle);
        self
    }
}

/// A registered unit of work in the render graph.
///
/// Holds the pass identity and the access it was granted during setup. The
/// execute step receives this by reference so it can look up its resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPass {
    id: RenderPassId,
    read_token: ResourceAccessToken,
    write_token: ResourceAccessToken,
}

impl RenderPass {
    pub(crate) fn new(id: RenderPassId) -> Self {
        Self {
            id,
            read_token: ResourceAccessToken::new(),
            write_token: ResourceAccessToken::new(),
        }
    }

    pub fn id(&self) -> RenderPassId {
        self.id
    }

    /// Run a setup step against this pass's tokens
    pub(crate) fn setup<S>(&mut self, setup: S) -> bool
    where
        S: FnOnce(&mut RenderPassBuilder<'_>) -> bool,
    {
        let mut builder = RenderPassBuilder {
            id: self.id,
            read_token: &mut self.read_token,
            write_token: &mut self.write_token,
        };
        setup(&mut builder)
    }

    /// Resources this pass declared for reading
    pub fn read_token(&self) -> &ResourceAccessToken {
        &self.read_token
    }

    /// Resources this pass declared for writing
    pub fn write_token(&self) -> &ResourceAccessToken {
        &self.write_token
    }
}

/// Execute step of a pass. Returns `false` to abort the rest of the frame.
pub type ExecuteFn<C> = dyn FnMut(&RenderPass, &mut C) -> bool;

/// A pass together with its execute step, as stored by the graph
pub(crate) struct RegisteredPass<C> {
    pub(crate) pass: RenderPass,
    execute: Box<ExecuteFn<C>>,
}

impl<C> RegisteredPass<C> {
    pub(crate) fn new(pass: RenderPass, execute: Box<ExecuteFn<C>>) -> Self {
        Self { pass, execute }
    }

    pub(crate) fn execute(&mut self, context: &mut C) -> bool {
        (self.execute)(&self.pass, context)
    }
}

/// Trait for render passes that carry their own state.
///
/// This is the object form of [`RenderGraph::add_pass`](crate::render_graph::RenderGraph::add_pass):
/// the graph calls [`setup`](FramePass::setup) once while registering the pass and
/// keeps the value alive until the frame is executed or cleared.
pub trait FramePass<C>: 'static {
    /// Pass type id
    fn id(&self) -> RenderPassId;

    /// Declare resource accesses. Return `false` to reject the pass.
    fn setup(&mut self, builder: &mut RenderPassBuilder<'_>) -> bool;

    /// Record the pass. Return `false` to abort the frame.
    fn execute(&mut self, pass: &RenderPass, context: &mut C) -> bool;
}

/// Context handed to every pass during execution.
///
/// Wraps the command-list-like object the frame records into. The graph never
/// inspects it.
#[derive(Debug, Default)]
pub struct RenderPassContext<L> {
    command_list: L,
    frame_index: u64,
}

impl<L> RenderPassContext<L> {
    pub fn new(command_list: L) -> Self {
        Self {
            command_list,
            frame_index: 0,
        }
    }

    pub fn with_frame_index(mut self, frame_index: u64) -> Self {
        self.frame_index = frame_index;
        self
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn command_list(&self) -> &L {
        &self.command_list
    }

    pub fn command_list_mut(&mut self) -> &mut L {
        &mut self.command_list
    }

    pub fn into_command_list(self) -> L {
        self.command_list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_id_ordering() {
        assert!(RenderPassId::new(0) < RenderPassId::new(1));
        assert_eq!(RenderPassId::new(5).index(), 5);
        assert_eq!(RenderPassId::new(5).to_string(), "#5");
    }

    #[test]
    fn test_setup_records_tokens() {
        let a = ResourceHandle::new(0, 0);
        let b = ResourceHandle::new(1, 0);
        let mut pass = RenderPass::new(RenderPassId::new(0));

        let accepted = pass.setup(|builder| {
            builder.read(a).write(b);
            true
        });

        assert!(accepted);
        assert!(pass.read_token().has_access(a));
        assert!(!pass.read_token().has_access(b));
        assert!(pass.write_token().has_access(b));
        assert!(!pass.write_token().has_access(a));
    }

    #[test]
    fn test_builder_reports_pass_id() {
        let mut pass = RenderPass::new(RenderPassId::new(9));
        let mut seen = None;
        pass.setup(|builder| {
            seen = Some(builder.id());
            true
        });
        assert_eq!(seen, Some(RenderPassId::new(9)));
    }

    #[test]
    fn test_registered_pass_sees_its_own_tokens() {
        let handle = ResourceHandle::new(3, 1);
        let mut pass = RenderPass::new(RenderPassId::new(1));
        pass.setup(|builder| {
            builder.write(handle);
            true
        });

        let mut registered = RegisteredPass::new(
            pass,
            Box::new(move |pass: &RenderPass, granted: &mut Vec<bool>| {
                granted.push(pass.write_token().has_access(handle));
                true
            }),
        );

        let mut granted = Vec::new();
        assert!(registered.execute(&mut granted));
        assert_eq!(granted, vec![true]);
    }

    #[test]
    fn test_context_accessors() {
        let mut context = RenderPassContext::new(Vec::<u32>::new()).with_frame_index(42);
        context.command_list_mut().push(7);

        assert_eq!(context.frame_index(), 42);
        assert_eq!(context.command_list(), &vec![7]);
        assert_eq!(context.into_command_list(), vec![7]);
    }
}
