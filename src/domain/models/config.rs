pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";
pub const DEFAULT_MAX_TOKENS: u32 = 512;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful medical assistant. Answer clearly and concisely.";

/// Origins the development front end is served from.
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];
pub const DEFAULT_CORS_ALLOW_CREDENTIALS: bool = true;

/// AWS credential material. Every field is optional: absent values are passed
/// through as absent, and credential resolution falls to the SDK's own
/// default provider chain (environment, shared credentials file, instance
/// profile, and so on).
#[derive(Debug, Clone, Default)]
pub struct AwsConfig {
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

/// Model invocation parameters.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: String,
    /// When set, invocations target this inference profile instead of
    /// `model_id`.
    pub inference_profile_arn: Option<String>,
}

impl ModelConfig {
    /// The identifier actually passed to the model invocation.
    pub fn invocation_target(&self) -> &str {
        self.inference_profile_arn
            .as_deref()
            .unwrap_or(&self.model_id)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            inference_profile_arn: None,
        }
    }
}

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Allow any origin.
    Any,
    /// Allow a fixed list of origins.
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub origins: CorsOrigins,
    pub allow_credentials: bool,
}

impl CorsConfig {
    /// Browsers refuse credentialed responses carrying a wildcard origin, so
    /// wildcard origins force `allow_credentials` off no matter what was
    /// requested.
    pub fn new(origins: CorsOrigins, allow_credentials: bool) -> Self {
        let allow_credentials = match origins {
            CorsOrigins::Any => false,
            CorsOrigins::List(_) => allow_credentials,
        };
        Self {
            origins,
            allow_credentials,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: CorsOrigins::List(
                DEFAULT_CORS_ORIGINS.iter().map(ToString::to_string).collect(),
            ),
            allow_credentials: DEFAULT_CORS_ALLOW_CREDENTIALS,
        }
    }
}

/// The fully resolved configuration snapshot.
///
/// Constructed exactly once at process start and never mutated afterwards;
/// every component holds a read-only reference and nothing re-reads raw
/// environment or file state after startup.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub aws: AwsConfig,
    pub model: ModelConfig,
    pub cors: CorsConfig,
}
