pub mod application;
pub mod connector;
pub mod domain;

pub use application::{ChatModel, ChatModelFactory, ChatUseCase};

pub use connector::{create_router, load_config, AppState, BedrockChatModel, Container};

pub use domain::{
    AppConfig, AwsConfig, Conversation, ConversationTurn, CorsConfig, CorsOrigins, DomainError,
    ModelConfig, Role,
};
