//! Extent registries, link indices, and flat-file persistence for shopcore.
//!
//! This crate provides:
//! - [`Registry`] - Generational arena holding one entity type's extent
//! - [`Entity`] - Naming contract registered types implement
//! - [`ToOne`], [`ManyToMany`], [`Symmetric`] - Bidirectional link indices
//! - [`persist`] - The save/load/exists file contract for extents

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod links;
pub mod persist;
pub mod registry;

pub use links::{ManyToMany, Symmetric, ToOne};
pub use registry::{Entity, Registry};
