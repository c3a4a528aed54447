use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Slot index with generation tracking so removed entries cannot be reached again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct PoolIndex {
    pub index: usize,
    pub generation: u32,
}

impl PoolIndex {
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Generational pool with O(1) insert and remove.
#[derive(Debug)]
pub struct Pool<T> {
    items: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: VecDeque<usize>,
    live: usize,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            generations: Vec::new(),
            free_list: VecDeque::new(),
            live: 0,
        }
    }

    /// Index the next [`insert`](Self::insert) will return.
    pub fn next_index(&self) -> PoolIndex {
        match self.free_list.front() {
            Some(&index) => PoolIndex::new(index, self.generations[index]),
            None => PoolIndex::new(self.items.len(), 0),
        }
    }

    pub fn insert(&mut self, item: T) -> PoolIndex {
        self.live += 1;
        if let Some(index) = self.free_list.pop_front() {
            let generation = self.generations[index];
            self.items[index] = Some(item);
            return PoolIndex::new(index, generation);
        }

        let index = self.items.len();
        self.items.push(Some(item));
        self.generations.push(0);
        PoolIndex::new(index, 0)
    }

    pub fn get(&self, id: PoolIndex) -> Option<&T> {
        if self.is_valid(id) {
            self.items.get(id.index).and_then(|slot| slot.as_ref())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: PoolIndex) -> Option<&mut T> {
        if self.is_valid(id) {
            self.items.get_mut(id.index).and_then(|slot| slot.as_mut())
        } else {
            None
        }
    }

    pub fn contains(&self, id: PoolIndex) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: PoolIndex) -> Option<T> {
        if !self.is_valid(id) {
            return None;
        }
        let item = self.items.get_mut(id.index)?.take()?;
        self.generations[id.index] = self.generations[id.index].wrapping_add(1);
        self.free_list.push_back(id.index);
        self.live -= 1;
        Some(item)
    }

    pub fn ids(&self) -> impl Iterator<Item = PoolIndex> + '_ {
        self.items.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|_| PoolIndex::new(index, self.generations[index]))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter().filter_map(|slot| slot.as_ref())
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn is_valid(&self, id: PoolIndex) -> bool {
        self.generations
            .get(id.index)
            .copied()
            .map(|gen| gen == id.generation)
            .unwrap_or(false)
    }
}
