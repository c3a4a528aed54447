//! Error type shared by the registry, the world and the packet engine.

use thiserror::Error;

use crate::core::shapes::ShapeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollisionError {
    #[error("no intersection test registered for {query} against {primitive}")]
    UnsupportedPair {
        query: ShapeKind,
        primitive: ShapeKind,
    },
    #[error("no {operation} operation registered for {kind}")]
    MissingOperation {
        operation: &'static str,
        kind: ShapeKind,
    },
    #[error("handle belongs to a different collision world")]
    ForeignHandle,
    #[error("handle refers to a primitive that was already removed")]
    StaleHandle,
    #[error("borrowed shapes are updated through their own cell")]
    BorrowedShape,
    #[error("collision world is full ({0} primitives)")]
    CapacityExceeded(usize),
    #[error("query shape is mutably borrowed elsewhere")]
    QueryShapeBusy,
}
