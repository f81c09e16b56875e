//! # Domain Layer
//!
//! Core models and errors: the resolved configuration snapshot and the
//! canonical conversation form. This layer is independent of external
//! frameworks and infrastructure.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
