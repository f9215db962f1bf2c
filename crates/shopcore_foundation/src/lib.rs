//! Typed handles, errors, configuration, and field validation for shopcore.
//!
//! This crate provides:
//! - [`Id`] - Generational, type-tagged entity handles
//! - [`Error`] - The error taxonomy shared by every layer
//! - [`ShopConfig`] - Threaded configuration (no global state)
//! - [`validate`] - Field-level validation helpers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod id;
pub mod validate;

pub use config::ShopConfig;
pub use error::{Error, ErrorKind, Result};
pub use id::Id;
