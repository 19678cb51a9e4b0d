//! The thinker scheduler. Every object in a level that needs to run logic each
//! tic lives here: movers, map objects, and so on.
//!
//! Thinkers live in a slab of slots linked into a ring by index, so the order
//! they run in is the order they were added. This matters for demo sync.
//! Removal is lazy: a thinker is marked, skipped by the runner and any lookups,
//! then unlinked and its slot freed in `sweep()` at the end of the tic.
//!
//! Doom source name `p_tick`

use std::fmt::{self, Debug};

#[cfg(feature = "hprof")]
use coarse_prof::profile;

use log::{debug, trace};

use crate::{
    env::platforms::Platform,
    level::{Level, LevelError},
    thing::MapObject,
};

/// A stable handle to a thinker. Handles to a slot that has since been freed
/// and re-used do not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThinkerId {
    idx: usize,
    generation: u32,
}

impl ThinkerId {
    pub const fn index(&self) -> usize {
        self.idx
    }
}

/// Every thinking object implements this. The object is taken out of the
/// `ThinkerAlloc` for the duration of the call, so it is free to push new
/// thinkers or mark others (or itself, through `id`) for removal.
pub trait Think {
    fn think(&mut self, id: ThinkerId, level: &mut Level) -> Result<(), LevelError>;
}

/// All thinking objects need to be registered here.
#[allow(clippy::large_enum_variant)]
pub enum ThinkerData {
    Platform(Platform),
    MapObject(MapObject),
    #[cfg(test)]
    TestObject(TestObject),
}

impl ThinkerData {
    pub fn mobj(&self) -> Option<&MapObject> {
        if let ThinkerData::MapObject(obj) = self {
            Some(obj)
        } else {
            None
        }
    }

    pub fn mobj_mut(&mut self) -> Option<&mut MapObject> {
        if let ThinkerData::MapObject(obj) = self {
            Some(obj)
        } else {
            None
        }
    }

    pub fn platform(&self) -> Option<&Platform> {
        if let ThinkerData::Platform(obj) = self {
            Some(obj)
        } else {
            None
        }
    }

    pub fn platform_mut(&mut self) -> Option<&mut Platform> {
        if let ThinkerData::Platform(obj) = self {
            Some(obj)
        } else {
            None
        }
    }

    fn think(&mut self, id: ThinkerId, level: &mut Level) -> Result<(), LevelError> {
        match self {
            ThinkerData::Platform(p) => p.think(id, level),
            ThinkerData::MapObject(m) => m.think(id, level),
            #[cfg(test)]
            ThinkerData::TestObject(t) => t.think(id, level),
        }
    }
}

impl Debug for ThinkerData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Platform(_) => f.debug_tuple("Platform").finish(),
            Self::MapObject(m) => f.debug_tuple("Mobj").field(&m.kind).finish(),
            #[cfg(test)]
            Self::TestObject(t) => f.debug_tuple("Test").field(&t.x).finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Free,
    Active,
    /// Still linked, waiting on the sweep
    Removed,
}

/// One slot of the allocation. `data` is `None` while the slot is free, or
/// while its thinker is running.
struct Thinker {
    prev: usize,
    next: usize,
    state: SlotState,
    generation: u32,
    data: Option<ThinkerData>,
}

impl Debug for Thinker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thinker")
            .field("prev", &self.prev)
            .field("next", &self.next)
            .field("state", &self.state)
            .field("data", &self.data)
            .finish()
    }
}

/// Storage and ordering for all `Thinker`s in a level
#[derive(Default)]
pub struct ThinkerAlloc {
    slots: Vec<Thinker>,
    free: Vec<usize>,
    head: Option<usize>,
    /// Count of active (unmarked) thinkers
    len: usize,
}

impl ThinkerAlloc {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            len: 0,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add a thinker to the end of the ring. It will run in the current tic
    /// if the runner has not yet passed the tail.
    pub fn push(&mut self, data: ThinkerData) -> ThinkerId {
        trace!("Adding Thinker of type {:?}", data);
        let idx = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx];
            slot.state = SlotState::Active;
            slot.data = Some(data);
            idx
        } else {
            self.slots.push(Thinker {
                prev: 0,
                next: 0,
                state: SlotState::Active,
                generation: 0,
                data: Some(data),
            });
            self.slots.len() - 1
        };

        match self.head {
            None => {
                self.head = Some(idx);
                self.slots[idx].prev = idx;
                self.slots[idx].next = idx;
            }
            Some(head) => {
                let tail = self.slots[head].prev;
                self.slots[tail].next = idx;
                self.slots[idx].prev = tail;
                self.slots[idx].next = head;
                self.slots[head].prev = idx;
            }
        }

        self.len += 1;
        ThinkerId {
            idx,
            generation: self.slots[idx].generation,
        }
    }

    fn is_live(&self, id: ThinkerId) -> bool {
        self.slots
            .get(id.idx)
            .is_some_and(|s| s.generation == id.generation && s.state == SlotState::Active)
    }

    /// Flag the thinker for removal. It stops running and resolving at once,
    /// but the slot is not freed until the next `sweep()`. Returns false if
    /// the handle was already stale.
    pub fn mark_remove(&mut self, id: ThinkerId) -> bool {
        if !self.is_live(id) {
            return false;
        }
        debug!("Marking thinker {} for removal", id.idx);
        self.slots[id.idx].state = SlotState::Removed;
        self.len -= 1;
        true
    }

    /// Unlink and free everything marked for removal
    pub fn sweep(&mut self) {
        for idx in 0..self.slots.len() {
            if self.slots[idx].state != SlotState::Removed {
                continue;
            }
            let Thinker { prev, next, .. } = self.slots[idx];
            if self.head == Some(idx) {
                self.head = if next == idx { None } else { Some(next) };
            }
            self.slots[prev].next = next;
            self.slots[next].prev = prev;

            let slot = &mut self.slots[idx];
            slot.state = SlotState::Free;
            slot.data = None;
            slot.generation = slot.generation.wrapping_add(1);
            slot.prev = idx;
            slot.next = idx;
            self.free.push(idx);
        }
    }

    pub fn get(&self, id: ThinkerId) -> Option<&ThinkerData> {
        if !self.is_live(id) {
            return None;
        }
        self.slots[id.idx].data.as_ref()
    }

    pub fn get_mut(&mut self, id: ThinkerId) -> Option<&mut ThinkerData> {
        if !self.is_live(id) {
            return None;
        }
        self.slots[id.idx].data.as_mut()
    }

    /// Live thinkers in run order
    pub fn iter(&self) -> impl Iterator<Item = (ThinkerId, &ThinkerData)> {
        self.ring_order().into_iter().filter_map(|idx| {
            let slot = &self.slots[idx];
            if slot.state != SlotState::Active {
                return None;
            }
            let id = ThinkerId {
                idx,
                generation: slot.generation,
            };
            slot.data.as_ref().map(|d| (id, d))
        })
    }

    /// Live thinkers in slot order. Use `iter()` when the order matters.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ThinkerId, &mut ThinkerData)> {
        self.slots.iter_mut().enumerate().filter_map(|(idx, slot)| {
            if slot.state != SlotState::Active {
                return None;
            }
            let id = ThinkerId {
                idx,
                generation: slot.generation,
            };
            slot.data.as_mut().map(|d| (id, d))
        })
    }

    /// Walk the ring until `finder` returns true
    pub fn find_thinker<F>(&self, finder: F) -> Option<ThinkerId>
    where
        F: Fn(&ThinkerData) -> bool,
    {
        self.iter().find(|(_, d)| finder(d)).map(|(id, _)| id)
    }

    /// Drop every thinker, e.g. when unarchiving a save
    pub fn clear(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.state != SlotState::Free {
                slot.state = SlotState::Free;
                slot.data = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(idx);
            }
        }
        self.head = None;
        self.len = 0;
    }

    fn ring_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.slots.len());
        if let Some(head) = self.head {
            let mut idx = head;
            loop {
                order.push(idx);
                idx = self.slots[idx].next;
                if idx == head {
                    break;
                }
            }
        }
        order
    }

    pub(crate) fn head(&self) -> Option<usize> {
        self.head
    }

    pub(crate) fn next_of(&self, idx: usize) -> usize {
        self.slots[idx].next
    }

    /// Take the data out of an active slot so it can think
    pub(crate) fn take(&mut self, idx: usize) -> Option<(ThinkerId, ThinkerData)> {
        let slot = self.slots.get_mut(idx)?;
        if slot.state != SlotState::Active {
            return None;
        }
        let id = ThinkerId {
            idx,
            generation: slot.generation,
        };
        slot.data.take().map(|d| (id, d))
    }

    /// Put back what `take()` took. If the thinker was marked during the call
    /// the data is dropped on the next sweep with the slot.
    pub(crate) fn restore(&mut self, id: ThinkerId, data: ThinkerData) {
        if let Some(slot) = self.slots.get_mut(id.idx) {
            if slot.generation == id.generation && slot.state != SlotState::Free {
                slot.data = Some(data);
            }
        }
    }
}

impl Level {
    /// Run every thinker once, in ring order, then sweep out any marked for
    /// removal. The ring's `next` is read after each thinker runs so that
    /// anything pushed during the tic also runs this tic.
    ///
    /// Doom function name `P_RunThinkers`
    pub fn run_thinkers(&mut self) -> Result<(), LevelError> {
        #[cfg(feature = "hprof")]
        profile!("run_thinkers");
        let Some(head) = self.thinkers.head() else {
            return Ok(());
        };
        let mut idx = head;
        loop {
            if let Some((id, mut data)) = self.thinkers.take(idx) {
                let res = data.think(id, self);
                self.thinkers.restore(id, data);
                res?;
            }
            idx = self.thinkers.next_of(idx);
            if idx == head {
                break;
            }
        }
        self.thinkers.sweep();
        Ok(())
    }
}

/// A do-nothing thinker for exercising the scheduler
#[cfg(test)]
#[derive(Debug, PartialEq)]
pub struct TestObject {
    pub x: u32,
    /// Spawn another `TestObject` on first think
    pub spawn: bool,
    /// Remove self on think
    pub suicide: bool,
}

#[cfg(test)]
impl Think for TestObject {
    fn think(&mut self, id: ThinkerId, level: &mut Level) -> Result<(), LevelError> {
        self.x += 1;
        if self.spawn {
            self.spawn = false;
            level.thinkers.push(ThinkerData::TestObject(TestObject {
                x: 0,
                spawn: false,
                suicide: false,
            }));
        }
        if self.suicide {
            level.thinkers.mark_remove(id);
        }
        Ok(())
    }
}
