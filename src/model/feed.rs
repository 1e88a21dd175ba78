//! Feed view-recycling controller
//!
//! Maps a mutating playlist onto a few recyclable slots backed by pooled player
//! handles. Exactly one slot (the focused one) plays at a time. Slots farther than
//! `offscreen_limit` pages from the focus are recycled and their handles released.
//!
//! Every handle acquired for a slot is released exactly once: on teardown of the
//! slot, when its item is removed, or when a move carries it out of the window.

use parking_lot::Mutex;

use crate::sdk::PlayerDevice;
use super::error::FeedError;
use super::player_pool::{HandleId, PlayerPool};
use super::playlist::PlaylistObserver;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedSlot {
    pub index: usize,
    pub handle: Option<HandleId>,
}

pub struct FeedController<D> {
    pool: PlayerPool<D>,
    items: Vec<String>,
    slots: Vec<Option<FeedSlot>>,
    active: Option<usize>,
    offscreen_limit: usize,
}

impl<D: PlayerDevice> FeedController<D> {
    pub fn new(pool: PlayerPool<D>, items: Vec<String>, offscreen_limit: usize) -> Self {
        Self {
            pool,
            items,
            slots: Vec::new(),
            active: None,
            offscreen_limit,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn pool(&self) -> &PlayerPool<D> {
        &self.pool
    }

    /// Index of the slot currently allowed to play.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_handle(&self) -> Option<HandleId> {
        self.active.and_then(|index| self.handle_at(index))
    }

    pub fn slots(&self) -> impl Iterator<Item = (SlotId, &FeedSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|slot| (SlotId(i), slot)))
    }

    pub fn slot(&self, id: SlotId) -> Option<&FeedSlot> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn slot_for(&self, index: usize) -> Option<SlotId> {
        self.slots().find(|(_, slot)| slot.index == index).map(|(id, _)| id)
    }

    fn handle_at(&self, index: usize) -> Option<HandleId> {
        self.slot_for(index).and_then(|id| self.slot(id)).and_then(|slot| slot.handle)
    }

    fn check_index(&self, index: usize) -> Result<(), FeedError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(FeedError::OutOfRange { index, len: self.items.len() })
        }
    }

    /// Slot-bind callback: attaches a handle to the row showing `index`.
    pub fn bind_slot(&mut self, index: usize) -> Result<SlotId, FeedError> {
        self.check_index(index)?;

        if let Some(id) = self.slot_for(index) {
            if self.slots[id.0].as_ref().is_some_and(|slot| slot.handle.is_none()) {
                let handle = self.pool.acquire(index, &self.items)?;
                if let Some(slot) = self.slots[id.0].as_mut() {
                    slot.handle = Some(handle);
                }
            }
            return Ok(id);
        }

        let handle = self.pool.acquire(index, &self.items)?;
        let slot = FeedSlot { index, handle: Some(handle) };
        let id = match self.slots.iter().position(Option::is_none) {
            Some(free) => {
                self.slots[free] = Some(slot);
                SlotId(free)
            }
            None => {
                self.slots.push(Some(slot));
                SlotId(self.slots.len() - 1)
            }
        };
        tracing::trace!(slot = id.0, index, "Slot bound");
        Ok(id)
    }

    /// Slot-unbind callback: the row was recycled off-screen.
    pub fn unbind_slot(&mut self, id: SlotId) -> bool {
        // The slot is cleared before its handle goes back to the pool.
        let Some(slot) = self.slots.get_mut(id.0).and_then(Option::take) else {
            return false;
        };
        if self.active == Some(slot.index) {
            self.active = None;
        }
        if let Some(handle) = slot.handle {
            self.pool.release(handle);
        }
        tracing::trace!(slot = id.0, index = slot.index, "Slot unbound");
        true
    }

    /// Page selection: pauses the previous active handle, then plays the focused one.
    pub fn set_focus(&mut self, index: usize) -> Result<(), FeedError> {
        if let Err(e) = self.check_index(index) {
            tracing::error!(index, len = self.items.len(), "Focus outside playlist ignored");
            return Err(e);
        }

        if let Some(previous) = self.active.filter(|p| *p != index) {
            if let Some(handle) = self.handle_at(previous) {
                self.pool.pause(handle);
            }
        }

        self.recycle_around(index);

        let slot = match self.bind_slot(index) {
            Ok(slot) => slot,
            Err(e) => {
                tracing::error!(index, error = %e, "Could not bind focused slot");
                self.active = None;
                return Err(e);
            }
        };
        if let Some(handle) = self.slot(slot).and_then(|s| s.handle) {
            self.pool.play(handle);
        }
        self.active = Some(index);
        tracing::debug!(index, item = ?self.item(index), "Feed focus changed");
        Ok(())
    }

    /// Tap on the active row.
    pub fn toggle_active(&mut self) {
        if let Some(handle) = self.active_handle() {
            self.pool.toggle(handle);
        }
    }

    /// Unbinds every slot, e.g. when the feed view is detached.
    pub fn teardown(&mut self) {
        let ids: Vec<SlotId> = self.slots().map(|(id, _)| id).collect();
        for id in ids {
            self.unbind_slot(id);
        }
        self.active = None;
    }

    fn recycle_around(&mut self, focus: usize) {
        let limit = self.offscreen_limit;
        let stale: Vec<SlotId> = self
            .slots()
            .filter(|(_, slot)| slot.index.abs_diff(focus) > limit)
            .map(|(id, _)| id)
            .collect();
        for id in stale {
            self.unbind_slot(id);
        }
    }

    fn shift_slots(&mut self, shift: impl Fn(usize) -> usize) {
        for slot in self.slots.iter_mut().flatten() {
            let index = shift(slot.index);
            if index != slot.index {
                slot.index = index;
                if let Some(handle) = slot.handle {
                    self.pool.rebind_index(handle, index);
                }
            }
        }
        self.active = self.active.map(&shift);
    }

    pub fn on_videos_inserted(&mut self, index: usize, ids: &[String]) {
        debug_assert!(index <= self.items.len(), "insert at {index} past feed of {}", self.items.len());
        if index > self.items.len() {
            tracing::error!(index, len = self.items.len(), "Insert notification outside playlist");
            return;
        }
        self.items.splice(index..index, ids.iter().cloned());

        let count = ids.len();
        self.shift_slots(|i| if i >= index { i + count } else { i });
        if let Some(focus) = self.active {
            self.recycle_around(focus);
        }
        tracing::debug!(index, count, "Videos inserted");
    }

    pub fn on_videos_removed(&mut self, index: usize, ids: &[String]) {
        let end = index + ids.len();
        debug_assert!(end <= self.items.len(), "remove {index}..{end} past feed of {}", self.items.len());
        if end > self.items.len() {
            tracing::error!(index, count = ids.len(), len = self.items.len(), "Remove notification outside playlist");
            return;
        }
        self.items.drain(index..end);

        let removed: Vec<SlotId> = self
            .slots()
            .filter(|(_, slot)| (index..end).contains(&slot.index))
            .map(|(id, _)| id)
            .collect();
        for id in removed {
            self.unbind_slot(id);
        }
        if self.active.is_some_and(|a| (index..end).contains(&a)) {
            self.active = None;
        }

        let count = ids.len();
        self.shift_slots(|i| if i >= end { i - count } else { i });
        if let Some(focus) = self.active {
            self.recycle_around(focus);
        }
        tracing::debug!(index, count, "Videos removed");
    }

    pub fn on_video_moved(&mut self, from: usize, to: usize, id: &str) {
        let len = self.items.len();
        debug_assert!(
            from < len && to < len && self.items[from] == id,
            "move {id} from {from} to {to} does not match feed of {len}"
        );
        if from >= len || to >= len || self.items[from] != id {
            tracing::error!(from, to, id, len, "Move notification does not match feed");
            return;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);

        let moved = self.slot_for(from);
        self.shift_slots(|i| moved_position(i, from, to));

        if let Some(slot_id) = moved {
            let visible = self
                .active
                .is_none_or(|focus| to.abs_diff(focus) <= self.offscreen_limit);
            if !visible {
                self.unbind_slot(slot_id);
            }
        }
        if let Some(focus) = self.active {
            self.recycle_around(focus);
        }
        tracing::debug!(from, to, id, "Video moved");
    }

    /// Content-only refresh. Never acquires or releases a handle.
    pub fn on_videos_changed(&mut self, index: usize, ids: &[String]) {
        let end = index + ids.len();
        debug_assert!(end <= self.items.len(), "change {index}..{end} past feed of {}", self.items.len());
        if end > self.items.len() {
            tracing::error!(index, count = ids.len(), len = self.items.len(), "Change notification outside playlist");
            return;
        }
        self.items[index..end].clone_from_slice(ids);

        for slot in self.slots.iter().flatten() {
            if let Some(handle) = slot.handle.filter(|_| (index..end).contains(&slot.index)) {
                self.pool.refresh_item(handle, &self.items[slot.index]);
            }
        }
        tracing::trace!(index, count = ids.len(), "Videos changed");
    }
}

fn moved_position(index: usize, from: usize, to: usize) -> usize {
    if index == from {
        to
    } else if from < to && index > from && index <= to {
        index - 1
    } else if to < from && index >= to && index < from {
        index + 1
    } else {
        index
    }
}

/// Lets a shared controller observe a playlist directly.
impl<D: PlayerDevice + Send> PlaylistObserver for Mutex<FeedController<D>> {
    fn on_videos_inserted(&self, index: usize, ids: &[String]) {
        self.lock().on_videos_inserted(index, ids);
    }

    fn on_videos_removed(&self, index: usize, ids: &[String]) {
        self.lock().on_videos_removed(index, ids);
    }

    fn on_video_moved(&self, from: usize, to: usize, id: &str) {
        self.lock().on_video_moved(from, to, id);
    }

    fn on_videos_changed(&self, index: usize, ids: &[String]) {
        self.lock().on_videos_changed(index, ids);
    }
}
