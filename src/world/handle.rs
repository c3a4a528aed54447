use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::utils::allocator::PoolIndex;

static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a [`CollisionWorld`](super::CollisionWorld).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(u64);

impl WorldId {
    pub(crate) fn next() -> Self {
        Self(NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world#{}", self.0)
    }
}

struct HandleInner<U> {
    world: WorldId,
    primitive: PoolIndex,
    slot: PoolIndex,
    user_data: U,
}

/// Shared reference to a registered primitive. Equality is identity.
pub struct CollisionHandle<U>(Rc<HandleInner<U>>);

impl<U> CollisionHandle<U> {
    pub(crate) fn new(world: WorldId, primitive: PoolIndex, slot: PoolIndex, user_data: U) -> Self {
        Self(Rc::new(HandleInner {
            world,
            primitive,
            slot,
            user_data,
        }))
    }

    pub fn user_data(&self) -> &U {
        &self.0.user_data
    }

    pub fn world_id(&self) -> WorldId {
        self.0.world
    }

    pub(crate) fn primitive(&self) -> PoolIndex {
        self.0.primitive
    }

    pub(crate) fn slot(&self) -> PoolIndex {
        self.0.slot
    }
}

impl<U> Clone for CollisionHandle<U> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<U> PartialEq for CollisionHandle<U> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<U> Eq for CollisionHandle<U> {}

impl<U: fmt::Debug> fmt::Debug for CollisionHandle<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionHandle")
            .field("world", &self.0.world)
            .field("primitive", &self.0.primitive)
            .field("user_data", &self.0.user_data)
            .finish()
    }
}
