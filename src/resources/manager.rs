//! Token-checked resource access

use crate::render_graph::{ResourceAccessToken, ResourceHandle};
use crate::resources::container::ResourceContainer;
use thiserror::Error;

/// Resource access error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Access to {0} was not declared by the pass")]
    AccessDenied(ResourceHandle),
    #[error("{0} does not refer to a live resource")]
    StaleHandle(ResourceHandle),
    #[error("Resource container is full")]
    CapacityExceeded,
}

pub type ResourceResult<T> = Result<T, ResourceError>;

/// Hands resources to a pass only if its token declares them.
///
/// Execute steps use this with the tokens of the [`RenderPass`](crate::render_graph::RenderPass)
/// they receive: reads go through the read token, writes through the write
/// token.
#[derive(Debug)]
pub struct ResourceManager<'a, T> {
    container: &'a mut ResourceContainer<T>,
}

impl<'a, T> ResourceManager<'a, T> {
    pub fn new(container: &'a mut ResourceContainer<T>) -> Self {
        Self { container }
    }

    /// Get a resource for reading
    pub fn read(
        &self,
        handle: ResourceHandle,
        read_token: &ResourceAccessToken,
    ) -> ResourceResult<&T> {
        if !read_token.has_access(handle) {
            log::error!("Read of {} without declared access", handle);
            return Err(ResourceError::AccessDenied(handle));
        }
        self.container
            .get(handle)
            .ok_or(ResourceError::StaleHandle(handle))
    }

    /// Get a resource for writing
    pub fn write(
        &mut self,
        handle: ResourceHandle,
        write_token: &ResourceAccessToken,
    ) -> ResourceResult<&mut T> {
        if !write_token.has_access(handle) {
            log::error!("Write of {} without declared access", handle);
            return Err(ResourceError::AccessDenied(handle));
        }
        self.container
            .get_mut(handle)
            .ok_or(ResourceError::StaleHandle(handle))
    }

    pub fn contains(&self, handle: ResourceHandle) -> bool {
        self.container.contains(handle)
    }
}
