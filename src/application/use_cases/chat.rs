use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::application::ChatModel;
use crate::domain::{AppConfig, Conversation, DomainError};

/// Builds the remote model client from the resolved configuration.
///
/// Injected so the composition root decides what "the model" is and tests can
/// substitute a stub without touching any global state.
pub type ChatModelFactory = Box<
    dyn Fn(Arc<AppConfig>) -> BoxFuture<'static, Result<Arc<dyn ChatModel>, DomainError>>
        + Send
        + Sync,
>;

/// Dispatches canonical conversations to the remote model.
///
/// The model client is constructed lazily on first dispatch rather than at
/// startup, so the process comes up even when credentials or region are not
/// yet configured. Construction failures are not cached: the cell stays unset
/// and a later dispatch retries from scratch. `execute` never fails; every
/// error becomes a textual reply.
pub struct ChatUseCase {
    config: Arc<AppConfig>,
    factory: ChatModelFactory,
    model: OnceCell<Arc<dyn ChatModel>>,
}

impl ChatUseCase {
    pub fn new(config: Arc<AppConfig>, factory: ChatModelFactory) -> Self {
        Self {
            config,
            factory,
            model: OnceCell::new(),
        }
    }

    pub async fn execute(&self, conversation: &Conversation) -> String {
        match self.dispatch(conversation).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Chat dispatch failed: {}", e);
                format!("Server configuration error: {e}")
            }
        }
    }

    async fn dispatch(&self, conversation: &Conversation) -> Result<String, DomainError> {
        let model = self.model().await?;
        let system_prompt = self.config.model.system_prompt.as_str();

        let turns = conversation.turns();
        if conversation.is_multi_turn() {
            debug!("Dispatching {} turns", turns.len());
            model.multi_turn(turns, system_prompt).await
        } else {
            // The remote interface distinguishes the one-message shape, so a
            // single turn goes through it even though multi_turn would accept
            // the same conversation.
            let message = turns.first().map(|t| t.content.as_str()).unwrap_or_default();
            model.single_turn(message, system_prompt).await
        }
    }

    async fn model(&self) -> Result<&Arc<dyn ChatModel>, DomainError> {
        self.model
            .get_or_try_init(|| (self.factory)(Arc::clone(&self.config)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::ConversationTurn;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Single(String),
        Multi(Vec<ConversationTurn>),
    }

    struct RecordingModel {
        calls: Arc<Mutex<Vec<Call>>>,
    }

    #[async_trait]
    impl ChatModel for RecordingModel {
        async fn single_turn(
            &self,
            message: &str,
            _system_prompt: &str,
        ) -> Result<String, DomainError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Single(message.to_string()));
            Ok(format!("echo:{message}"))
        }

        async fn multi_turn(
            &self,
            history: &[ConversationTurn],
            _system_prompt: &str,
        ) -> Result<String, DomainError> {
            self.calls.lock().unwrap().push(Call::Multi(history.to_vec()));
            Ok(history
                .last()
                .map(|t| t.content.clone())
                .unwrap_or_default())
        }
    }

    fn recording_use_case() -> (ChatUseCase, Arc<Mutex<Vec<Call>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let model_calls = Arc::clone(&calls);
        let factory: ChatModelFactory = Box::new(move |_| {
            let model = Arc::new(RecordingModel {
                calls: Arc::clone(&model_calls),
            }) as Arc<dyn ChatModel>;
            Box::pin(async move { Ok(model) })
        });

        (
            ChatUseCase::new(Arc::new(AppConfig::default()), factory),
            calls,
        )
    }

    #[tokio::test]
    async fn test_single_turn_dispatch() {
        let (use_case, calls) = recording_use_case();
        let conversation = Conversation::from_parts(Some("hi".to_string()), Vec::new());

        let reply = use_case.execute(&conversation).await;

        assert_eq!(reply, "echo:hi");
        assert_eq!(calls.lock().unwrap().as_slice(), &[Call::Single("hi".to_string())]);
    }

    #[tokio::test]
    async fn test_multi_turn_dispatch_preserves_order() {
        let (use_case, calls) = recording_use_case();
        let history = vec![
            ConversationTurn::user("a"),
            ConversationTurn::assistant("b"),
            ConversationTurn::user("c"),
        ];
        let conversation = Conversation::from_parts(None, history.clone());

        let reply = use_case.execute(&conversation).await;

        assert_eq!(reply, "c");
        assert_eq!(calls.lock().unwrap().as_slice(), &[Call::Multi(history)]);
    }

    #[tokio::test]
    async fn test_one_turn_history_uses_single_turn() {
        let (use_case, calls) = recording_use_case();
        let conversation =
            Conversation::from_parts(None, vec![ConversationTurn::user("only")]);

        use_case.execute(&conversation).await;

        assert_eq!(
            calls.lock().unwrap().as_slice(),
            &[Call::Single("only".to_string())]
        );
    }

    #[tokio::test]
    async fn test_factory_runs_once_across_dispatches() {
        let constructions = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&constructions);
        let factory: ChatModelFactory = Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            let model = Arc::new(RecordingModel {
                calls: Arc::new(Mutex::new(Vec::new())),
            }) as Arc<dyn ChatModel>;
            Box::pin(async move { Ok(model) })
        });
        let use_case = ChatUseCase::new(Arc::new(AppConfig::default()), factory);
        let conversation = Conversation::from_parts(Some("hi".to_string()), Vec::new());

        use_case.execute(&conversation).await;
        use_case.execute(&conversation).await;

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_construction_failure_becomes_reply() {
        let factory: ChatModelFactory = Box::new(|_| {
            Box::pin(async {
                Err(DomainError::configuration("no AWS region configured"))
            })
        });
        let use_case = ChatUseCase::new(Arc::new(AppConfig::default()), factory);
        let conversation = Conversation::from_parts(Some("hi".to_string()), Vec::new());

        let reply = use_case.execute(&conversation).await;

        assert_eq!(
            reply,
            "Server configuration error: Configuration error: no AWS region configured"
        );
    }

    #[tokio::test]
    async fn test_failed_construction_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let factory: ChatModelFactory = Box::new(move |_| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if attempt == 0 {
                    Err(DomainError::configuration("not ready yet"))
                } else {
                    Ok(Arc::new(RecordingModel {
                        calls: Arc::new(Mutex::new(Vec::new())),
                    }) as Arc<dyn ChatModel>)
                }
            })
        });
        let use_case = ChatUseCase::new(Arc::new(AppConfig::default()), factory);
        let conversation = Conversation::from_parts(Some("hi".to_string()), Vec::new());

        let first = use_case.execute(&conversation).await;
        let second = use_case.execute(&conversation).await;

        assert!(first.starts_with("Server configuration error:"));
        assert_eq!(second, "echo:hi");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
