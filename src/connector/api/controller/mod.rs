pub mod chat_controller;
pub mod health_controller;

pub use chat_controller::{ChatRequest, ChatResponse};
pub use health_controller::HealthResponse;
