use std::any::Any;
use std::cell::{Cell, RefCell};

use crate::{
    collision::registry::ShapeRegistry,
    config::CollisionConfig,
    core::shapes::Shape,
    error::CollisionError,
    utils::{
        allocator::{Pool, PoolIndex},
        profiling::CollisionStats,
    },
};

mod handle;
mod packet;

pub use handle::{CollisionHandle, WorldId};

/// Where a primitive's shape lives.
pub(crate) enum ShapeStorage<'s> {
    Owned(Shape),
    /// Caller-owned; the world only ever reads it.
    Borrowed(&'s RefCell<Shape>),
}

pub(crate) struct Primitive<'s, U> {
    shape: ShapeStorage<'s>,
    handle: CollisionHandle<U>,
}

/// Set of collision primitives that moving shapes are tested against.
///
/// Every operation takes `&self` so response callbacks can add, remove or
/// query again while a query is running.
pub struct CollisionWorld<'s, U> {
    id: WorldId,
    config: CollisionConfig,
    registry: &'static ShapeRegistry,
    primitives: RefCell<Pool<Primitive<'s, U>>>,
    handles: RefCell<Pool<CollisionHandle<U>>>,
    packets_in_flight: Cell<u32>,
    rejected_packets: Cell<u32>,
    stats: CollisionStats,
    user_data: Option<Box<dyn Any>>,
}

impl<'s, U> Default for CollisionWorld<'s, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'s, U> CollisionWorld<'s, U> {
    pub fn new() -> Self {
        Self::with_config(CollisionConfig::default())
    }

    pub fn with_config(config: CollisionConfig) -> Self {
        let id = WorldId::next();
        log::debug!("created collision {id} with {config:?}");
        Self {
            id,
            config,
            registry: ShapeRegistry::global(),
            primitives: RefCell::new(Pool::new()),
            handles: RefCell::new(Pool::new()),
            packets_in_flight: Cell::new(0),
            rejected_packets: Cell::new(0),
            stats: CollisionStats::default(),
            user_data: None,
        }
    }

    /// Attaches a payload owned by the world, readable from any callback.
    pub fn with_user_data<T: Any>(mut self, user_data: T) -> Self {
        self.user_data = Some(Box::new(user_data));
        self
    }

    /// `None` when no payload was attached or it is not a `T`.
    pub fn user_data<T: Any>(&self) -> Option<&T> {
        self.user_data.as_deref()?.downcast_ref()
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    pub fn stats(&self) -> &CollisionStats {
        &self.stats
    }

    pub fn packets_in_flight(&self) -> u32 {
        self.packets_in_flight.get()
    }

    pub fn rejected_packets(&self) -> u32 {
        self.rejected_packets.get()
    }

    /// Copies `shape` into the world.
    pub fn add_shape(
        &self,
        shape: impl Into<Shape>,
        user_data: U,
    ) -> Result<CollisionHandle<U>, CollisionError> {
        self.insert(ShapeStorage::Owned(shape.into()), user_data)
    }

    /// Registers a caller-owned shape. Later changes made through the cell are
    /// seen by every query; removing the primitive never touches the cell.
    pub fn add_shape_ref(
        &self,
        shape: &'s RefCell<Shape>,
        user_data: U,
    ) -> Result<CollisionHandle<U>, CollisionError> {
        self.insert(ShapeStorage::Borrowed(shape), user_data)
    }

    fn insert(
        &self,
        shape: ShapeStorage<'s>,
        user_data: U,
    ) -> Result<CollisionHandle<U>, CollisionError> {
        let mut primitives = self.primitives.borrow_mut();
        if let Some(limit) = self.config.max_primitives {
            if primitives.len() >= limit {
                return Err(CollisionError::CapacityExceeded(limit));
            }
        }

        let mut handles = self.handles.borrow_mut();
        let handle = CollisionHandle::new(
            self.id,
            primitives.next_index(),
            handles.next_index(),
            user_data,
        );
        handles.insert(handle.clone());
        primitives.insert(Primitive {
            shape,
            handle: handle.clone(),
        });
        Ok(handle)
    }

    pub fn remove_primitive(&self, handle: &CollisionHandle<U>) -> Result<(), CollisionError> {
        self.check_owner(handle)?;
        let removed = self.primitives.borrow_mut().remove(handle.primitive());
        if removed.is_none() {
            return Err(CollisionError::StaleHandle);
        }
        self.handles.borrow_mut().remove(handle.slot());
        Ok(())
    }

    pub fn contains(&self, handle: &CollisionHandle<U>) -> bool {
        handle.world_id() == self.id && self.primitives.borrow().contains(handle.primitive())
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.borrow().is_empty()
    }

    pub fn handles(&self) -> Vec<CollisionHandle<U>> {
        self.handles.borrow().iter().cloned().collect()
    }

    /// Copy of the primitive's current shape.
    pub fn shape(&self, handle: &CollisionHandle<U>) -> Option<Shape> {
        if handle.world_id() != self.id {
            return None;
        }
        let primitives = self.primitives.borrow();
        let shape = match &primitives.get(handle.primitive())?.shape {
            ShapeStorage::Owned(shape) => Some(*shape),
            ShapeStorage::Borrowed(cell) => cell.try_borrow().ok().map(|shape| *shape),
        };
        shape
    }

    pub fn is_borrowed(&self, handle: &CollisionHandle<U>) -> bool {
        if handle.world_id() != self.id {
            return false;
        }
        matches!(
            self.primitives.borrow().get(handle.primitive()),
            Some(Primitive {
                shape: ShapeStorage::Borrowed(_),
                ..
            })
        )
    }

    /// Replaces an owned primitive's shape.
    pub fn update_shape(
        &self,
        handle: &CollisionHandle<U>,
        shape: impl Into<Shape>,
    ) -> Result<(), CollisionError> {
        self.check_owner(handle)?;
        let mut primitives = self.primitives.borrow_mut();
        let primitive = primitives
            .get_mut(handle.primitive())
            .ok_or(CollisionError::StaleHandle)?;
        match &mut primitive.shape {
            ShapeStorage::Owned(current) => {
                *current = shape.into();
                Ok(())
            }
            ShapeStorage::Borrowed(_) => Err(CollisionError::BorrowedShape),
        }
    }

    fn check_owner(&self, handle: &CollisionHandle<U>) -> Result<(), CollisionError> {
        if handle.world_id() == self.id {
            Ok(())
        } else {
            Err(CollisionError::ForeignHandle)
        }
    }

    /// Live primitive indices at this moment.
    fn primitive_ids(&self) -> Vec<PoolIndex> {
        self.primitives.borrow().ids().collect()
    }
}
