use glam::Vec3;

use crate::world::{CollisionHandle, CollisionWorld};

/// Candidate filter: returns `false` to leave a primitive out of the query.
pub type TestCallback<'c, 's, U, D> =
    Box<dyn Fn(&CollisionQuery<'c, 's, U, D>, &CollisionHandle<U>) -> bool + 'c>;

/// Invoked once per accepted collision.
pub type ResponseCallback<'c, 's, U, D> = Box<dyn FnMut(&CollisionResponse<'_, 's, U, D>) + 'c>;

/// What the caller wants from one [`CollisionWorld::collide`] call.
///
/// `velocity` is the step that already moved the query shape into its
/// current pose. Without a response the query only counts intersections.
pub struct CollisionQuery<'c, 's, U, D> {
    pub(crate) velocity: Option<Vec3>,
    pub(crate) test: Option<TestCallback<'c, 's, U, D>>,
    pub(crate) response: Option<ResponseCallback<'c, 's, U, D>>,
    pub(crate) user_data: D,
}

impl<'c, 's, U> CollisionQuery<'c, 's, U, ()> {
    pub fn moving(velocity: Vec3) -> Self {
        Self::new(()).with_velocity(velocity)
    }
}

impl<'c, 's, U, D> CollisionQuery<'c, 's, U, D> {
    pub fn new(user_data: D) -> Self {
        Self {
            velocity: None,
            test: None,
            response: None,
            user_data,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn with_test<F>(mut self, test: F) -> Self
    where
        F: Fn(&CollisionQuery<'c, 's, U, D>, &CollisionHandle<U>) -> bool + 'c,
    {
        self.test = Some(Box::new(test));
        self
    }

    pub fn with_response<F>(mut self, response: F) -> Self
    where
        F: FnMut(&CollisionResponse<'_, 's, U, D>) + 'c,
    {
        self.response = Some(Box::new(response));
        self
    }

    pub fn velocity(&self) -> Option<Vec3> {
        self.velocity
    }

    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    pub fn user_data(&self) -> &D {
        &self.user_data
    }

    pub(crate) fn accepts(&self, candidate: &CollisionHandle<U>) -> bool {
        self.test.as_ref().map_or(true, |test| test(self, candidate))
    }
}

/// Data handed to a response callback.
pub struct CollisionResponse<'a, 's, U, D> {
    /// World being queried; may be queried again or mutated from the callback.
    pub world: &'a CollisionWorld<'s, U>,
    pub collider: &'a CollisionHandle<U>,
    /// Translation that separates the query shape from `collider`.
    pub push_vector: Vec3,
    pub contact_point: Vec3,
    /// Packet velocity before this response was applied.
    pub velocity: Vec3,
    pub user_data: &'a D,
}
