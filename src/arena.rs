use std::fmt;

/// Stable handle to a node slot in the collector's arena.
///
/// Handles are generation-tagged: when a sweep reclaims a node its slot is
/// recycled under a bumped generation, so a `NodeRef` that outlives its node
/// is detectably stale instead of silently pointing at the slot's next
/// occupant.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeRef {
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl NodeRef {
    /// Slot index within the arena.
    pub fn slot(self) -> u32 {
        self.slot
    }

    /// Generation the slot carried when this handle was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.slot, self.generation)
    }
}

struct Slot<V> {
    generation: u32,
    value: Option<V>,
}

/// Growable slot table with a free list and generation tags.
pub(crate) struct Arena<V> {
    slots: Vec<Slot<V>>,
    free: Vec<u32>,
    len: usize,
}

impl<V> Arena<V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn insert(&mut self, value: V) -> NodeRef {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.value = Some(value);
                NodeRef {
                    slot: index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                NodeRef {
                    slot: index,
                    generation: 0,
                }
            }
        }
    }

    pub fn get(&self, node: NodeRef) -> Option<&V> {
        let slot = self.slots.get(node.slot as usize)?;
        if slot.generation != node.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, node: NodeRef) -> Option<&mut V> {
        let slot = self.slots.get_mut(node.slot as usize)?;
        if slot.generation != node.generation {
            return None;
        }
        slot.value.as_mut()
    }

    pub fn contains(&self, node: NodeRef) -> bool {
        self.get(node).is_some()
    }

    /// Frees the slot and bumps its generation; returns the stored value.
    /// Stale or unknown handles return `None` and leave the arena unchanged.
    pub fn remove(&mut self, node: NodeRef) -> Option<V> {
        let slot = self.slots.get_mut(node.slot as usize)?;
        if slot.generation != node.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(node.slot);
        self.len -= 1;
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.len
    }
}
