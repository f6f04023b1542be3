//! Resource handles and access tokens for the render graph

use std::fmt;

/// Generation-stamped identifier of a resource slot.
///
/// Handles are allocated by a [`ResourceContainer`](crate::resources::ResourceContainer)
/// (or any other external resource manager). The render graph never looks behind a
/// handle; it only compares and hashes them to track which pass touches which slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle {
    index: u32,
    generation: u32,
}

impl ResourceHandle {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub const fn index(&self) -> u32 {
        self.index
    }

    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceHandle({}v{})", self.index, self.generation)
    }
}

/// The set of resources a single pass declared access to.
///
/// Each pass owns two tokens, one for reads and one for writes. Handles keep
/// the order in which the pass declared them; declaring the same handle twice
/// has no further effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceAccessToken {
    handles: Vec<ResourceHandle>,
}

impl ResourceAccessToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant access to a resource
    pub(crate) fn permit(&mut self, handle: ResourceHandle) {
        // Passes declare a handful of resources, a linear scan beats hashing here
        if !self.handles.contains(&handle) {
            self.handles.push(handle);
        }
    }

    /// Check if this token grants access to `handle`
    pub fn has_access(&self, handle: ResourceHandle) -> bool {
        self.handles.contains(&handle)
    }

    /// Handles granted by this token, in declaration order
    pub fn accessible_resource_handles(&self) -> &[ResourceHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
