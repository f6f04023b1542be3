//! Generation-stamped slot storage

use crate::render_graph::ResourceHandle;
use crate::resources::manager::{ResourceError, ResourceResult};

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage handing out [`ResourceHandle`]s.
///
/// Removing a value frees its slot; the next insertion reuses it with a bumped
/// generation, so handles to the removed value never resolve again.
#[derive(Debug)]
pub struct ResourceContainer<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> ResourceContainer<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Store a value and return its handle.
    ///
    /// # Errors
    ///
    /// * [`ResourceError::CapacityExceeded`] - every `u32` slot index is taken
    pub fn add(&mut self, value: T) -> ResourceResult<ResourceHandle> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = Some(value);
            self.len += 1;
            return Ok(ResourceHandle::new(index, slot.generation));
        }

        let index = slot_index(self.slots.len())?;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        self.len += 1;
        Ok(ResourceHandle::new(index, 0))
    }

    /// Remove a value, returning it if the handle was still live
    pub fn remove(&mut self, handle: ResourceHandle) -> Option<T> {
        let slot = self.slot_mut(handle)?;
        let value = slot.value.take()?;
        self.free.push(handle.index());
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, handle: ResourceHandle) -> Option<&T> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: ResourceHandle) -> Option<&mut T> {
        self.slot_mut(handle).and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, handle: ResourceHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn slot_mut(&mut self, handle: ResourceHandle) -> Option<&mut Slot<T>> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
    }
}

fn slot_index(slot_count: usize) -> ResourceResult<u32> {
    u32::try_from(slot_count).map_err(|_| {
        log::error!("Resource container is full ({} slots)", slot_count);
        ResourceError::CapacityExceeded
    })
}

impl<T> Default for ResourceContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}
