//! Shopcore - Consistency-checked in-memory retail entity graph
//!
//! This crate re-exports all layers of the Shopcore system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: shopcore_model      - Entity records, the Shop aggregate, cascades, audit
//! Layer 1: shopcore_storage    - Extent registries, link indices, flat-file persistence
//! Layer 0: shopcore_foundation - Typed handles, errors, configuration, validation
//! ```

pub use shopcore_foundation as foundation;
pub use shopcore_model as model;
pub use shopcore_storage as storage;
