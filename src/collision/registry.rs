//! Kind-indexed dispatch tables for shape operations.
//!
//! Each direction of a pair is registered on its own, so "box against sphere"
//! and "sphere against box" are separate entries. Looking up a missing entry
//! is always reported as an error.

use std::fmt;
use std::sync::OnceLock;

use glam::Vec3;

use crate::collision::intersection::Intersection;
use crate::core::shapes::{Shape, ShapeKind};
use crate::error::CollisionError;

pub type TestFn = fn(&Shape, &Shape) -> bool;
pub type ContactFn = fn(&Shape, Vec3) -> Vec3;
pub type ReferenceFn = fn(&Shape) -> Vec3;
pub type VelocityFn = fn(&mut Shape, Vec3);

const N: usize = ShapeKind::COUNT;

static GLOBAL: OnceLock<ShapeRegistry> = OnceLock::new();

#[derive(Clone)]
pub struct ShapeRegistry {
    test: [[Option<TestFn>; N]; N],
    contact: [Option<ContactFn>; N],
    reference: [Option<ReferenceFn>; N],
    velocity: [Option<VelocityFn>; N],
}

impl ShapeRegistry {
    /// Registry with no entries at all.
    pub fn empty() -> Self {
        Self {
            test: [[None; N]; N],
            contact: [None; N],
            reference: [None; N],
            velocity: [None; N],
        }
    }

    /// Process-wide registry holding the built-in operations.
    pub fn global() -> &'static ShapeRegistry {
        GLOBAL.get_or_init(Self::builtin)
    }

    pub fn builtin() -> Self {
        use ShapeKind::*;

        let mut registry = Self::empty();

        for query in [Aabb, AabbExtent] {
            registry.register_test(query, Aabb, Intersection::box_box);
            registry.register_test(query, AabbExtent, Intersection::box_box);
            registry.register_test(query, Obb, Intersection::box_obb);
            registry.register_test(query, Sphere, Intersection::box_sphere);
            registry.register_test(query, Ellipsoid, Intersection::box_ellipsoid);
            registry.register_test(query, Capsule, Intersection::box_capsule);
        }

        registry.register_test(Obb, Aabb, Intersection::box_obb);
        registry.register_test(Obb, AabbExtent, Intersection::box_obb);
        registry.register_test(Obb, Obb, Intersection::box_obb);
        registry.register_test(Obb, Sphere, Intersection::obb_to_sphere);

        registry.register_test(Sphere, Aabb, Intersection::sphere_box);
        registry.register_test(Sphere, AabbExtent, Intersection::sphere_box);
        registry.register_test(Sphere, Obb, Intersection::obb_to_sphere);
        registry.register_test(Sphere, Sphere, Intersection::spheres);
        registry.register_test(Sphere, Capsule, Intersection::sphere_to_capsule);

        registry.register_test(Ellipsoid, Aabb, Intersection::ellipsoid_to_box);
        registry.register_test(Ellipsoid, AabbExtent, Intersection::ellipsoid_to_box);

        registry.register_test(Capsule, Aabb, Intersection::capsule_to_box);
        registry.register_test(Capsule, AabbExtent, Intersection::capsule_to_box);
        registry.register_test(Capsule, Sphere, Intersection::sphere_to_capsule);
        registry.register_test(Capsule, Capsule, Intersection::capsules);

        for kind in ShapeKind::ALL {
            registry.register_contact(kind, Shape::closest_point);
            registry.register_reference(kind, Shape::reference_point);
            registry.register_velocity(kind, Shape::translate);
        }

        registry
    }

    pub fn register_test(&mut self, query: ShapeKind, primitive: ShapeKind, test: TestFn) {
        self.test[query.index()][primitive.index()] = Some(test);
    }

    pub fn register_contact(&mut self, kind: ShapeKind, contact: ContactFn) {
        self.contact[kind.index()] = Some(contact);
    }

    pub fn register_reference(&mut self, kind: ShapeKind, reference: ReferenceFn) {
        self.reference[kind.index()] = Some(reference);
    }

    pub fn register_velocity(&mut self, kind: ShapeKind, velocity: VelocityFn) {
        self.velocity[kind.index()] = Some(velocity);
    }

    pub fn supports_pair(&self, query: ShapeKind, primitive: ShapeKind) -> bool {
        self.test[query.index()][primitive.index()].is_some()
    }

    pub fn registered_pairs(&self) -> impl Iterator<Item = (ShapeKind, ShapeKind)> + '_ {
        ShapeKind::ALL.into_iter().flat_map(move |query| {
            ShapeKind::ALL
                .into_iter()
                .filter(move |primitive| self.supports_pair(query, *primitive))
                .map(move |primitive| (query, primitive))
        })
    }

    /// Checks that every per-kind operation a query shape needs is registered.
    pub fn ensure_query_support(&self, kind: ShapeKind) -> Result<(), CollisionError> {
        let i = kind.index();
        if self.contact[i].is_none() {
            return Err(missing("closest point", kind));
        }
        if self.reference[i].is_none() {
            return Err(missing("reference point", kind));
        }
        if self.velocity[i].is_none() {
            return Err(missing("velocity", kind));
        }
        Ok(())
    }

    pub fn test(&self, query: &Shape, primitive: &Shape) -> Result<bool, CollisionError> {
        let (a, b) = (query.kind(), primitive.kind());
        match self.test[a.index()][b.index()] {
            Some(test) => Ok(test(query, primitive)),
            None => {
                log::error!("no intersection test registered for {a} against {b}");
                Err(CollisionError::UnsupportedPair {
                    query: a,
                    primitive: b,
                })
            }
        }
    }

    pub fn closest_point(&self, shape: &Shape, point: Vec3) -> Result<Vec3, CollisionError> {
        let kind = shape.kind();
        let contact = self.contact[kind.index()].ok_or_else(|| missing("closest point", kind))?;
        Ok(contact(shape, point))
    }

    pub fn reference_point(&self, shape: &Shape) -> Result<Vec3, CollisionError> {
        let kind = shape.kind();
        let reference =
            self.reference[kind.index()].ok_or_else(|| missing("reference point", kind))?;
        Ok(reference(shape))
    }

    pub fn apply_velocity(&self, shape: &mut Shape, velocity: Vec3) -> Result<(), CollisionError> {
        let kind = shape.kind();
        let apply = self.velocity[kind.index()].ok_or_else(|| missing("velocity", kind))?;
        apply(shape, velocity);
        Ok(())
    }
}

impl fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRegistry")
            .field("pairs", &self.registered_pairs().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn missing(operation: &'static str, kind: ShapeKind) -> CollisionError {
    log::error!("no {operation} operation registered for {kind}");
    CollisionError::MissingOperation { operation, kind }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_expected_rows() {
        let registry = ShapeRegistry::global();
        let row = |query| {
            ShapeKind::ALL
                .into_iter()
                .filter(|primitive| registry.supports_pair(query, *primitive))
                .count()
        };

        assert_eq!(row(ShapeKind::Aabb), 6);
        assert_eq!(row(ShapeKind::AabbExtent), 6);
        assert_eq!(row(ShapeKind::Obb), 4);
        assert_eq!(row(ShapeKind::Sphere), 5);
        assert_eq!(row(ShapeKind::Ellipsoid), 2);
        assert_eq!(row(ShapeKind::Capsule), 4);
        assert_eq!(registry.registered_pairs().count(), 27);
    }

    #[test]
    fn empty_registry_reports_missing_operations() {
        let registry = ShapeRegistry::empty();
        let sphere = Shape::sphere(Vec3::ZERO, 1.0);

        assert!(matches!(
            registry.reference_point(&sphere),
            Err(CollisionError::MissingOperation { kind: ShapeKind::Sphere, .. })
        ));
        assert!(matches!(
            registry.ensure_query_support(ShapeKind::Capsule),
            Err(CollisionError::MissingOperation { .. })
        ));
    }

    #[test]
    fn global_is_built_once() {
        let first = ShapeRegistry::global() as *const ShapeRegistry;
        let second = ShapeRegistry::global() as *const ShapeRegistry;
        assert_eq!(first, second);
    }
}
