//! # Domain Layer
//!
//! Catalog and recommendation models, the provider-neutral request shape,
//! and the error taxonomy. Independent of HTTP and provider details.

pub mod catalog;
pub mod error;
pub mod models;

pub use catalog::*;
pub use error::*;
pub use models::*;
