//! # Formats Module
//!
//! Serialization of the entity store.
//!
//! This module only converts between [`EntityStore`](crate::EntityStore)
//! and bytes. Reading and writing files stays in the app layer
//! (apps/storerate).

mod snapshot;

pub use snapshot::*;
