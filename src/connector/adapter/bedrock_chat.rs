use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::config::Credentials;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ChatModel;
use crate::domain::{AppConfig, ConversationTurn, DomainError, ModelConfig, Role};

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Anthropic messages payload as Bedrock's `InvokeModel` expects it.
#[derive(Serialize)]
struct InvokeRequest<'a> {
    anthropic_version: &'static str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ApiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: [ContentBlock<'a>; 1],
}

#[derive(Serialize)]
struct ContentBlock<'a> {
    #[serde(rename = "type")]
    block_type: &'static str,
    text: &'a str,
}

impl<'a> ApiMessage<'a> {
    fn text(role: &'a str, text: &'a str) -> Self {
        Self {
            role,
            content: [ContentBlock {
                block_type: "text",
                text,
            }],
        }
    }
}

/// Minimal subset of the model response we care about.
#[derive(Deserialize)]
struct InvokeResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize)]
struct ResponseBlock {
    #[serde(default)]
    text: String,
}

/// A [`ChatModel`] backed by Anthropic Claude models on Amazon Bedrock.
///
/// The SDK owns transport, request signing, and retries. Explicit credentials
/// from the resolved configuration override the SDK's default provider chain
/// only when a full key pair is present; the session token rides along only
/// with that pair. Construction fails when no region can be resolved at all,
/// which is why the client is built on first dispatch rather than at startup.
pub struct BedrockChatModel {
    client: Client,
    model: ModelConfig,
}

impl BedrockChatModel {
    pub async fn connect(config: &AppConfig) -> Result<Self, DomainError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.aws.region {
            loader = loader.region(Region::new(region.clone()));
        }

        if let (Some(key_id), Some(secret)) = (
            &config.aws.access_key_id,
            &config.aws.secret_access_key,
        ) {
            loader = loader.credentials_provider(Credentials::new(
                key_id.clone(),
                secret.clone(),
                config.aws.session_token.clone(),
                None,
                "medai-static",
            ));
        }

        let sdk_config = loader.load().await;
        if sdk_config.region().is_none() {
            return Err(DomainError::configuration(
                "no AWS region configured (set AWS_REGION or add aws.region to the config file)",
            ));
        }

        Ok(Self {
            client: Client::new(&sdk_config),
            model: config.model.clone(),
        })
    }

    async fn invoke(
        &self,
        messages: Vec<ApiMessage<'_>>,
        system_prompt: &str,
    ) -> Result<String, DomainError> {
        let payload = InvokeRequest {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens: self.model.max_tokens,
            temperature: self.model.temperature,
            messages,
            system: (!system_prompt.is_empty()).then_some(system_prompt),
        };
        let body = serde_json::to_vec(&payload)
            .map_err(|e| DomainError::serialization(e.to_string()))?;

        let target = self.model.invocation_target();
        debug!("Invoking model {}", target);

        let response = self
            .client
            .invoke_model()
            .model_id(target)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| DomainError::model(DisplayErrorContext(&e).to_string()))?;

        extract_reply(response.body().as_ref())
    }
}

#[async_trait]
impl ChatModel for BedrockChatModel {
    async fn single_turn(
        &self,
        message: &str,
        system_prompt: &str,
    ) -> Result<String, DomainError> {
        let messages = vec![ApiMessage::text(Role::User.as_str(), message)];
        self.invoke(messages, system_prompt).await
    }

    async fn multi_turn(
        &self,
        history: &[ConversationTurn],
        system_prompt: &str,
    ) -> Result<String, DomainError> {
        let messages = history
            .iter()
            .map(|turn| ApiMessage::text(turn.role.as_str(), &turn.content))
            .collect();
        self.invoke(messages, system_prompt).await
    }
}

/// Pull the assistant text out of a raw response body.
fn extract_reply(raw: &[u8]) -> Result<String, DomainError> {
    let parsed: InvokeResponse = serde_json::from_slice(raw)
        .map_err(|e| DomainError::serialization(format!("malformed model response: {e}")))?;

    match parsed.content.into_iter().next() {
        Some(block) => Ok(block.text),
        None => Err(DomainError::model("model response contained no content")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_reply_reads_first_text_block() {
        let raw = br#"{"content": [{"type": "text", "text": "hello"}, {"type": "text", "text": "ignored"}]}"#;

        let reply = extract_reply(raw).unwrap();

        assert_eq!(reply, "hello");
    }

    #[test]
    fn test_extract_reply_rejects_empty_content() {
        let err = extract_reply(br#"{"content": []}"#).unwrap_err();

        assert!(err.is_model());
    }

    #[test]
    fn test_extract_reply_rejects_malformed_body() {
        let err = extract_reply(b"not json").unwrap_err();

        assert!(matches!(err, DomainError::Serialization(_)));
    }

    #[test]
    fn test_payload_shape_matches_anthropic_messages_format() {
        let turns = [
            ConversationTurn::user("question"),
            ConversationTurn::assistant("answer"),
        ];
        let payload = InvokeRequest {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens: 512,
            temperature: 0.2,
            messages: turns
                .iter()
                .map(|t| ApiMessage::text(t.role.as_str(), &t.content))
                .collect(),
            system: Some("be helpful"),
        };

        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(value["max_tokens"], 512);
        assert_eq!(value["system"], "be helpful");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"][0]["type"], "text");
        assert_eq!(value["messages"][0]["content"][0]["text"], "question");
        assert_eq!(value["messages"][1]["role"], "assistant");
    }

    #[test]
    fn test_empty_system_prompt_is_omitted() {
        let payload = InvokeRequest {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens: 512,
            temperature: 0.2,
            messages: vec![ApiMessage::text("user", "hi")],
            system: None,
        };

        let value = serde_json::to_value(&payload).unwrap();

        assert!(value.get("system").is_none());
    }
}
