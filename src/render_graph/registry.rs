//! Render pass id registry
//!
//! Pass ids identify a pass *type*, not an instance: every frame the same
//! lighting pass is re-added under the same id. The registry assigns ids
//! sequentially the first time a key is seen. Keys are either a Rust type
//! ([`PassIdRegistry::id_of`]) or a caller-chosen string tag
//! ([`PassIdRegistry::id_for`]); both draw from one counter.

use crate::render_graph::pass::RenderPassId;
use parking_lot::Mutex;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PassKey {
    Type(TypeId),
    Tag(String),
}

/// Assigns sequential [`RenderPassId`]s to pass types.
#[derive(Debug, Default)]
pub struct PassIdRegistry {
    ids: HashMap<PassKey, RenderPassId>,
    next_id: u32,
}

impl PassIdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the pass type `T`, assigned on first use
    pub fn id_of<T: 'static>(&mut self) -> RenderPassId {
        self.id_for_key(PassKey::Type(TypeId::of::<T>()))
    }

    /// Id of the pass tagged `tag`, assigned on first use
    pub fn id_for(&mut self, tag: &str) -> RenderPassId {
        self.id_for_key(PassKey::Tag(tag.to_string()))
    }

    /// Look up a type without assigning an id
    pub fn get_of<T: 'static>(&self) -> Option<RenderPassId> {
        self.ids.get(&PassKey::Type(TypeId::of::<T>())).copied()
    }

    /// Look up a tag without assigning an id
    pub fn get(&self, tag: &str) -> Option<RenderPassId> {
        self.ids.get(&PassKey::Tag(tag.to_string())).copied()
    }

    /// Number of ids handed out so far
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Forget all ids and restart numbering from zero
    pub fn reset(&mut self) {
        self.ids.clear();
        self.next_id = 0;
    }

    fn id_for_key(&mut self, key: PassKey) -> RenderPassId {
        let next_id = &mut self.next_id;
        *self.ids.entry(key).or_insert_with(|| {
            let id = RenderPassId::new(*next_id);
            *next_id += 1;
            log::trace!("Assigned render pass id {}", id);
            id
        })
    }
}

/// Cloneable, thread-safe handle to one [`PassIdRegistry`].
///
/// Create one per process (or per test) and pass it to every system that
/// registers render passes.
#[derive(Debug, Clone, Default)]
pub struct SharedPassIdRegistry {
    inner: Arc<Mutex<PassIdRegistry>>,
}

impl SharedPassIdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_of<T: 'static>(&self) -> RenderPassId {
        self.inner.lock().id_of::<T>()
    }

    pub fn id_for(&self, tag: &str) -> RenderPassId {
        self.inner.lock().id_for(tag)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }
}
