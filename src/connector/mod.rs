//! # Connector Layer
//!
//! External integrations implementing the application interfaces:
//! - Configuration resolution (environment + JSON file)
//! - The Bedrock-backed chat model
//! - The axum HTTP surface
pub mod adapter;
pub mod api;
pub mod settings;

pub use adapter::*;
pub use api::{create_router, AppState, Container};
pub use settings::load_config;
