use std::sync::Arc;

use tracing::debug;

use crate::application::{ChatModel, ChatModelFactory, ChatUseCase};
use crate::connector::adapter::BedrockChatModel;
use crate::domain::AppConfig;

/// Composition root for the HTTP adapter.
///
/// Holds the frozen configuration snapshot and the wired use case. The
/// production constructor installs a factory that builds the Bedrock client
/// on first dispatch; tests swap in their own factory.
pub struct Container {
    config: Arc<AppConfig>,
    chat_use_case: ChatUseCase,
}

impl Container {
    pub fn new(config: AppConfig) -> Self {
        let factory: ChatModelFactory = Box::new(|config| {
            Box::pin(async move {
                debug!("Constructing Bedrock client");
                let model = BedrockChatModel::connect(&config).await?;
                Ok(Arc::new(model) as Arc<dyn ChatModel>)
            })
        });

        Self::with_factory(config, factory)
    }

    pub fn with_factory(config: AppConfig, factory: ChatModelFactory) -> Self {
        let config = Arc::new(config);
        let chat_use_case = ChatUseCase::new(Arc::clone(&config), factory);

        Self {
            config,
            chat_use_case,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn chat_use_case(&self) -> &ChatUseCase {
        &self.chat_use_case
    }
}
