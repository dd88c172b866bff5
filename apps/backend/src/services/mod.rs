//! Service layer: the room action surface consumed by a transport layer.

pub mod games;
