// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Generational handles and insertion-ordered arena storage
//!
//! Every particle, spring, attraction and custom force lives in an [`Arena`]
//! and is named by a typed [`Handle`]. A handle carries the slot index and
//! the slot generation it was issued in, so a handle to a removed element
//! (or to an element dropped by [`Arena::clear`]) resolves to `None` instead
//! of aliasing whatever reuses the slot later.
//!
//! Storage is bounded by the peak number of live elements, not by how many
//! were ever created. Iteration follows insertion order.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Typed generational handle into an [`Arena`]
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Create a handle from raw parts
    ///
    /// Mostly useful in tests; handles are normally issued by an arena.
    pub fn from_raw_parts(index: u32, generation: u32) -> Self {
        Handle {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// Slot index in the arena
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Slot generation this handle was issued in
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

// Manual impls: deriving would put bounds on `T`.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("index", &self.index)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<T> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} (gen: {})", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Insertion-ordered storage issuing generational handles
///
/// Vacated slots are recycled through a free list. Each slot carries its own
/// generation, bumped whenever its value leaves, so a recycled slot never
/// answers to an old handle. Iteration follows a separate insertion-order
/// list of live slot indices, independent of where values physically sit.
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    order: Vec<u32>,
}

impl<T> Arena<T> {
    /// Create an empty arena
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Store a value and return its handle
    pub fn insert(&mut self, value: T) -> Handle<T> {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    value: None,
                });
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.value = Some(value);
        self.order.push(index);
        Handle::from_raw_parts(index, slot.generation)
    }

    /// Remove the value behind `handle`, if it is still present
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let removed = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        if let Some(position) = self.order.iter().position(|&i| i == handle.index) {
            self.order.remove(position);
        }
        Some(removed)
    }

    /// Look up a value
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Look up a value mutably
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Check whether `handle` still names a live value
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live values
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the arena holds no live values
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of slots, including vacated ones awaiting reuse
    ///
    /// Per-slot side buffers (integrator stages) are sized with this. It
    /// never exceeds the peak number of values held at once.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Drop every value and invalidate all outstanding handles
    ///
    /// The slots stay allocated for reuse, lowest index first.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.order.clear();
        self.free.clear();
        self.free.extend((0..self.slots.len() as u32).rev());
    }

    /// Remove every value matching `predicate`, returning how many were removed
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let slots = &mut self.slots;
        let free = &mut self.free;
        let before = self.order.len();
        self.order.retain(|&index| {
            let slot = &mut slots[index as usize];
            if !matches!(&slot.value, Some(value) if predicate(value)) {
                return true;
            }
            slot.value = None;
            slot.generation = slot.generation.wrapping_add(1);
            free.push(index);
            false
        });
        before - self.order.len()
    }

    /// Iterate live values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.order.iter().filter_map(move |&index| {
            let slot = self.slots.get(index as usize)?;
            let value = slot.value.as_ref()?;
            Some((Handle::from_raw_parts(index, slot.generation), value))
        })
    }

    /// Visit live values mutably in insertion order
    pub fn for_each_in_order<F>(&mut self, mut f: F)
    where
        F: FnMut(Handle<T>, &mut T),
    {
        for &index in &self.order {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                if let Some(value) = slot.value.as_mut() {
                    f(Handle::from_raw_parts(index, slot.generation), value);
                }
            }
        }
    }

    /// Handles of all live values in insertion order
    pub fn handles(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        self.iter().map(|(handle, _)| handle)
    }

    /// The `i`-th live value in insertion order
    pub fn nth(&self, i: usize) -> Option<(Handle<T>, &T)> {
        let &index = self.order.get(i)?;
        let slot = self.slots.get(index as usize)?;
        let value = slot.value.as_ref()?;
        Some((Handle::from_raw_parts(index, slot.generation), value))
    }

    /// Visit every live value in slot order, on the rayon pool with the
    /// `parallel` feature
    pub fn for_each_mut<F>(&mut self, f: F)
    where
        T: Send,
        F: Fn(&mut T) + Send + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            self.slots
                .par_iter_mut()
                .filter_map(|slot| slot.value.as_mut())
                .for_each(f);
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.slots
                .iter_mut()
                .filter_map(|slot| slot.value.as_mut())
                .for_each(f);
        }
    }

    /// Visit every live value together with its slot in `buffer`
    ///
    /// `buffer` must hold at least [`slot_count`](Self::slot_count) entries;
    /// extra entries are left untouched. With the `parallel` feature the
    /// visits run on the rayon pool, so `f` must not depend on visit order.
    pub fn zip_mut<U, F>(&mut self, buffer: &mut [U], f: F)
    where
        T: Send,
        U: Send,
        F: Fn(&mut T, &mut U) + Send + Sync,
    {
        debug_assert!(buffer.len() >= self.slots.len());

        #[cfg(feature = "parallel")]
        {
            self.slots
                .par_iter_mut()
                .zip(buffer.par_iter_mut())
                .for_each(|(slot, extra)| {
                    if let Some(value) = slot.value.as_mut() {
                        f(value, extra);
                    }
                });
        }

        #[cfg(not(feature = "parallel"))]
        {
            for (slot, extra) in self.slots.iter_mut().zip(buffer.iter_mut()) {
                if let Some(value) = slot.value.as_mut() {
                    f(value, extra);
                }
            }
        }
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
