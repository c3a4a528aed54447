//! Per-query packet: sweep phase, resolve loop and the recursion guard.

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::ptr;

use glam::Vec3;

use super::{CollisionHandle, CollisionWorld, ShapeStorage};
use crate::{
    collision::{
        ccd::SweepVolume,
        contact::ContactResolver,
        queries::{CollisionQuery, CollisionResponse},
        registry::ShapeRegistry,
    },
    core::shapes::{AabbExtent, Shape},
    error::CollisionError,
    utils::{allocator::PoolIndex, logging::PacketTrace},
};

/// Transient state of one `collide` call.
struct Packet<'p, 'c, 's, U, D> {
    shape: &'p RefCell<Shape>,
    sweep: Option<AabbExtent>,
    velocity: Option<Vec3>,
    query: &'p mut CollisionQuery<'c, 's, U, D>,
    collisions: u32,
    last_push: Option<Vec3>,
}

impl<'p, 'c, 's, U, D> Packet<'p, 'c, 's, U, D> {
    fn current_shape(&self) -> Result<Shape, CollisionError> {
        self.shape
            .try_borrow()
            .map(|shape| *shape)
            .map_err(|_| CollisionError::QueryShapeBusy)
    }

    fn translate(&self, registry: &ShapeRegistry, offset: Vec3) -> Result<Shape, CollisionError> {
        let mut shape = self
            .shape
            .try_borrow_mut()
            .map_err(|_| CollisionError::QueryShapeBusy)?;
        registry.apply_velocity(&mut shape, offset)?;
        Ok(*shape)
    }

    fn accept(&mut self, push: Vec3) {
        self.velocity = Some(push);
        self.last_push = Some(push);
        self.collisions += 1;
    }
}

/// Counts a packet as in flight until dropped.
struct InFlightGuard<'w, 's, U> {
    world: &'w CollisionWorld<'s, U>,
}

impl<'w, 's, U> InFlightGuard<'w, 's, U> {
    fn enter(world: &'w CollisionWorld<'s, U>) -> Self {
        world.packets_in_flight.set(world.packets_in_flight.get() + 1);
        Self { world }
    }
}

impl<'w, 's, U> Drop for InFlightGuard<'w, 's, U> {
    fn drop(&mut self) {
        let world = self.world;
        let in_flight = world.packets_in_flight.get().saturating_sub(1);
        world.packets_in_flight.set(in_flight);

        if in_flight == 0 {
            let rejected = world.rejected_packets.get();
            if rejected > 0 {
                log::debug!("{}: recursion limit rejected {rejected} packets", world.id);
            }
            world.rejected_packets.set(0);
        }
    }
}

impl<'s, U> CollisionWorld<'s, U> {
    /// Tests `shape` against every primitive and resolves overlaps through the
    /// query's response callback. Returns the number of collisions handled.
    ///
    /// When the query carries a velocity, `shape` is expected to already be in
    /// its post-motion pose.
    pub fn collide<D>(
        &self,
        shape: &RefCell<Shape>,
        query: &mut CollisionQuery<'_, 's, U, D>,
    ) -> Result<u32, CollisionError> {
        let depth = self.packets_in_flight.get();
        if depth + self.rejected_packets.get() > self.config.max_packet_depth {
            self.rejected_packets.set(self.rejected_packets.get() + 1);
            self.stats.record_rejection();
            return Ok(0);
        }

        if query.velocity == Some(Vec3::ZERO) {
            return Ok(0);
        }

        let current = *shape
            .try_borrow()
            .map_err(|_| CollisionError::QueryShapeBusy)?;
        self.registry.ensure_query_support(current.kind())?;
        self.stats.record_query();

        let _trace = PacketTrace::new(self.id.get(), depth);
        let _in_flight = InFlightGuard::enter(self);

        let sweep = match query.velocity {
            Some(velocity) => SweepVolume::build(
                self.registry,
                &current,
                velocity,
                self.config.sweep_trigger_ratio,
            )?,
            None => None,
        };

        let mut packet = Packet {
            shape,
            sweep,
            velocity: query.velocity,
            query,
            collisions: 0,
            last_push: None,
        };

        if packet.sweep.is_some() && self.sweep(&mut packet)?.is_break() {
            return Ok(0);
        }

        self.resolve(&mut packet)?;
        Ok(packet.collisions)
    }

    /// Sweep phase. Breaks when nothing lies on the swept path.
    fn sweep<D>(
        &self,
        packet: &mut Packet<'_, '_, 's, U, D>,
    ) -> Result<ControlFlow<()>, CollisionError> {
        let (Some(sweep), Some(velocity)) = (packet.sweep, packet.velocity) else {
            return Ok(ControlFlow::Continue(()));
        };
        self.stats.record_sweep();

        let rewound = packet.translate(self.registry, -velocity)?;
        let nearest = match self.nearest_on_path(packet, &rewound, Shape::AabbExtent(sweep)) {
            Ok(nearest) => nearest,
            Err(err) => {
                packet.translate(self.registry, velocity)?;
                return Err(err);
            }
        };

        let Some((distance, collider, contact_point)) = nearest else {
            packet.translate(self.registry, velocity)?;
            return Ok(ControlFlow::Break(()));
        };

        let bias = self.config.sweep_distance_bias;
        if packet.query.has_response() && distance > bias {
            let push = velocity * -(distance / velocity.length());
            self.respond(packet, &collider, push, contact_point);
            packet.accept(push);
        } else {
            packet.translate(self.registry, velocity)?;
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Nearest primitive touched by the sweep volume, ranked by biased distance
    /// from the pre-motion reference point.
    fn nearest_on_path<D>(
        &self,
        packet: &Packet<'_, '_, 's, U, D>,
        rewound: &Shape,
        sweep: Shape,
    ) -> Result<Option<(f32, CollisionHandle<U>, Vec3)>, CollisionError> {
        let origin = self.registry.reference_point(rewound)?;
        let bias = self.config.sweep_distance_bias;
        let mut nearest: Option<(f32, CollisionHandle<U>, Vec3)> = None;

        for id in self.primitive_ids() {
            let Some((primitive, handle)) = self.visit(id, packet.shape) else {
                continue;
            };
            if !packet.query.accepts(&handle) || !self.registry.test(&sweep, &primitive)? {
                continue;
            }

            let contact = ContactResolver::resolve(self.registry, rewound, &primitive)?;
            let distance = contact.point.distance(origin) + bias;
            if nearest.as_ref().map_or(true, |(best, ..)| distance < *best) {
                nearest = Some((distance, handle, contact.point));
            }
        }
        Ok(nearest)
    }

    fn resolve<D>(&self, packet: &mut Packet<'_, '_, 's, U, D>) -> Result<(), CollisionError> {
        let single_pass = !packet.query.has_response() || packet.velocity.is_none();

        for _ in 0..self.config.max_resolve_iterations {
            self.stats.record_pass();
            let before = packet.collisions;
            let flow = self.resolve_pass(packet)?;
            if flow.is_break() || single_pass || packet.collisions == before {
                break;
            }
        }
        Ok(())
    }

    /// One pass over a snapshot of the live primitives.
    fn resolve_pass<D>(
        &self,
        packet: &mut Packet<'_, '_, 's, U, D>,
    ) -> Result<ControlFlow<()>, CollisionError> {
        for id in self.primitive_ids() {
            let Some((primitive, handle)) = self.visit(id, packet.shape) else {
                continue;
            };
            if !packet.query.accepts(&handle) {
                continue;
            }

            let current = packet.current_shape()?;
            if !self.registry.test(&current, &primitive)? {
                continue;
            }

            if !packet.query.has_response() {
                packet.collisions += 1;
                continue;
            }

            let contact = ContactResolver::resolve(self.registry, &current, &primitive)?;
            let push = contact.push();
            if push == Vec3::ZERO {
                continue;
            }
            if packet.last_push.is_some_and(|last| push == -last) {
                log::debug!("{}: push {push} reverses the previous one, stopping", self.id);
                return Ok(ControlFlow::Break(()));
            }

            self.respond(packet, &handle, push, contact.point);
            packet.accept(push);
        }
        Ok(ControlFlow::Continue(()))
    }

    fn respond<D>(
        &self,
        packet: &mut Packet<'_, '_, 's, U, D>,
        collider: &CollisionHandle<U>,
        push_vector: Vec3,
        contact_point: Vec3,
    ) {
        let velocity = packet.velocity.unwrap_or(Vec3::ZERO);
        let query = &mut *packet.query;
        if let Some(response) = query.response.as_mut() {
            response(&CollisionResponse {
                world: self,
                collider,
                push_vector,
                contact_point,
                velocity,
                user_data: &query.user_data,
            });
            self.stats.record_response();
        }
    }

    /// Copies out a primitive's shape and handle, releasing every borrow.
    ///
    /// `None` when the primitive is gone, is the query shape itself, or its
    /// cell is mutably borrowed.
    fn visit(
        &self,
        id: PoolIndex,
        query_shape: &RefCell<Shape>,
    ) -> Option<(Shape, CollisionHandle<U>)> {
        let primitives = self.primitives.borrow();
        let primitive = primitives.get(id)?;
        let shape = match primitive.shape {
            ShapeStorage::Owned(shape) => shape,
            ShapeStorage::Borrowed(cell) => {
                if ptr::eq(cell, query_shape) {
                    return None;
                }
                match cell.try_borrow() {
                    Ok(shape) => *shape,
                    Err(_) => {
                        log::warn!("{}: skipping primitive {id:?}, its shape is borrowed", self.id);
                        return None;
                    }
                }
            }
        };
        Some((shape, primitive.handle.clone()))
    }
}
