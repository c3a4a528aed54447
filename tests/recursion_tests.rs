use std::cell::{Cell, RefCell};

use collision_world::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn stuck_box() -> Shape {
    Shape::aabb(Vec3::new(0.75, 0.0, 0.0), Vec3::new(1.75, 1.0, 1.0))
}

fn world_with_floor<'s>(config: CollisionConfig) -> CollisionWorld<'s, ()> {
    let world = CollisionWorld::with_config(config);
    world
        .add_shape(Shape::aabb(Vec3::ZERO, Vec3::ONE), ())
        .expect("unbounded world");
    world
}

/// Issues a new query from inside every response without ever separating.
fn nest(
    world: &CollisionWorld<'_, ()>,
    shape: &RefCell<Shape>,
    depth: u32,
    deepest: &Cell<u32>,
    refused: &Cell<u32>,
) -> u32 {
    deepest.set(deepest.get().max(depth));
    let mut query = CollisionQuery::moving(Vec3::new(-0.1, 0.0, 0.0)).with_response(|response| {
        if nest(response.world, shape, depth + 1, deepest, refused) == 0 {
            refused.set(refused.get() + 1);
        }
    });
    world.collide(shape, &mut query).expect("aabb pairs are registered")
}

#[test]
fn non_separating_response_hits_iteration_cap() {
    let world = world_with_floor(CollisionConfig::default());
    let mover = RefCell::new(stuck_box());
    let calls = Cell::new(0);
    let mut query = CollisionQuery::moving(Vec3::new(-0.1, 0.0, 0.0))
        .with_response(|_| calls.set(calls.get() + 1));

    let hits = world.collide(&mover, &mut query).expect("aabb pairs are registered");

    assert_eq!(hits, 20);
    assert_eq!(calls.get(), 20);
    assert_eq!(world.stats().snapshot().resolve_passes, 20);
}

#[test]
fn iteration_cap_follows_config() {
    let config = CollisionConfig::builder().max_resolve_iterations(5).build();
    let world = world_with_floor(config);
    let mover = RefCell::new(stuck_box());
    let mut query = CollisionQuery::moving(Vec3::new(-0.1, 0.0, 0.0)).with_response(|_| {});

    assert_eq!(world.collide(&mover, &mut query), Ok(5));
}

#[test]
fn runaway_recursion_is_cut_off() {
    init_logging();
    let world = world_with_floor(CollisionConfig::default());
    let mover = RefCell::new(stuck_box());
    let deepest = Cell::new(0);
    let refused = Cell::new(0);

    let hits = nest(&world, &mover, 0, &deepest, &refused);

    assert_eq!(hits, 20, "outermost query still runs its full loop");
    assert_eq!(deepest.get(), 21, "one level past the depth limit is attempted");
    assert!(refused.get() > 0, "excess queries should return zero");
    assert!(world.stats().snapshot().rejected_queries > 0);
    assert_eq!(world.packets_in_flight(), 0);
    assert_eq!(world.rejected_packets(), 0, "rejections reset once the stack unwinds");
    world.stats().report();
}

#[test]
fn packet_depth_follows_config() {
    let world = world_with_floor(CollisionConfig::builder().max_packet_depth(2).build());
    let mover = RefCell::new(stuck_box());
    let deepest = Cell::new(0);
    let refused = Cell::new(0);

    nest(&world, &mover, 0, &deepest, &refused);

    assert_eq!(deepest.get(), 3);
    assert_eq!(world.packets_in_flight(), 0);
    assert_eq!(world.rejected_packets(), 0);
}

#[test]
fn nested_query_from_response_sees_same_world() {
    let world = world_with_floor(CollisionConfig::default());
    let mover = RefCell::new(stuck_box());
    let sensor = RefCell::new(Shape::sphere(Vec3::new(0.5, 0.5, 0.5), 0.2));
    let inner_hits = Cell::new(None);

    let mut query = CollisionQuery::moving(Vec3::new(-0.1, 0.0, 0.0)).with_response(|response| {
        let mut trigger: CollisionQuery<'_, '_, (), ()> = CollisionQuery::new(());
        inner_hits.set(Some(response.world.collide(&sensor, &mut trigger)));
        assert_eq!(response.world.packets_in_flight(), 1);
        mover.borrow_mut().translate(response.push_vector);
    });

    assert_eq!(world.collide(&mover, &mut query), Ok(1));
    assert_eq!(inner_hits.get(), Some(Ok(1)));
}
