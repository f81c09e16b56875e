//! Configuration resolution.
//!
//! Merges environment variables, an optional JSON config file, and built-in
//! defaults into one immutable [`AppConfig`] snapshot. Precedence per field,
//! highest first: environment variable, file value, default. Resolution never
//! fails; a bad source is logged and the next one down is used.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{
    AppConfig, AwsConfig, CorsConfig, CorsOrigins, ModelConfig, DEFAULT_CORS_ALLOW_CREDENTIALS,
    DEFAULT_CORS_ORIGINS, DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID, DEFAULT_SYSTEM_PROMPT,
    DEFAULT_TEMPERATURE,
};

const ENV_CONFIG_PATH: &str = "MEDAI_CONFIG_PATH";
const ENV_REGION: &str = "AWS_REGION";
const ENV_REGION_FALLBACK: &str = "AWS_DEFAULT_REGION";
const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
const ENV_MODEL_ID: &str = "BEDROCK_MODEL_ID";
const ENV_INFERENCE_PROFILE_ARN: &str = "BEDROCK_INFERENCE_PROFILE_ARN";
const ENV_SYSTEM_PROMPT: &str = "MEDAI_SYSTEM_PROMPT";
const ENV_MAX_TOKENS: &str = "MEDAI_MAX_TOKENS";
const ENV_TEMPERATURE: &str = "MEDAI_TEMPERATURE";
const ENV_CORS_ORIGINS: &str = "MEDAI_CORS_ORIGINS";
const ENV_CORS_ALLOW_CREDENTIALS: &str = "MEDAI_CORS_ALLOW_CREDENTIALS";

/// File-side mirror of the configuration. Every field is optional so a file
/// can override any subset.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    aws: FileAwsConfig,
    #[serde(default)]
    model: FileModelConfig,
}

#[derive(Debug, Default, Deserialize)]
struct FileAwsConfig {
    region: Option<String>,
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    session_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileModelConfig {
    model_id: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    system_prompt: Option<String>,
    inference_profile_arn: Option<String>,
}

/// Resolve the configuration snapshot. Never fails.
///
/// The file path comes from `explicit_path`, else `MEDAI_CONFIG_PATH`, else
/// no file is consulted.
pub fn load_config(explicit_path: Option<&str>) -> AppConfig {
    let file = load_file(explicit_path);

    let aws = AwsConfig {
        region: env_non_empty(ENV_REGION)
            .or_else(|| env_non_empty(ENV_REGION_FALLBACK))
            .or(file.aws.region),
        access_key_id: env_non_empty(ENV_ACCESS_KEY_ID).or(file.aws.access_key_id),
        secret_access_key: env_non_empty(ENV_SECRET_ACCESS_KEY).or(file.aws.secret_access_key),
        session_token: env_non_empty(ENV_SESSION_TOKEN).or(file.aws.session_token),
    };

    let model = ModelConfig {
        model_id: env_non_empty(ENV_MODEL_ID)
            .or(file.model.model_id)
            .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
        max_tokens: numeric_env(ENV_MAX_TOKENS)
            .or(file.model.max_tokens)
            .unwrap_or(DEFAULT_MAX_TOKENS),
        temperature: numeric_env(ENV_TEMPERATURE)
            .or(file.model.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE),
        system_prompt: env_non_empty(ENV_SYSTEM_PROMPT)
            .or(file.model.system_prompt)
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        inference_profile_arn: env_non_empty(ENV_INFERENCE_PROFILE_ARN)
            .or(file.model.inference_profile_arn),
    };

    AppConfig {
        aws,
        model,
        cors: resolve_cors(),
    }
}

fn load_file(explicit_path: Option<&str>) -> FileConfig {
    let path = explicit_path
        .map(PathBuf::from)
        .or_else(|| env_non_empty(ENV_CONFIG_PATH).map(PathBuf::from));

    let Some(path) = path else {
        return FileConfig::default();
    };

    if !path.exists() {
        debug!("Config file {} does not exist, skipping", path.display());
        return FileConfig::default();
    }

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return FileConfig::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(file) => file,
        Err(e) => {
            warn!("Ignoring malformed config file {}: {}", path.display(), e);
            FileConfig::default()
        }
    }
}

/// An environment variable that is set but empty counts as absent.
fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Parse a numeric environment variable. An unparsable value is dropped so
/// resolution falls to the file value or the default, not to a hard failure.
fn numeric_env<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = env_non_empty(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring unparsable {}={:?}: {}", name, raw, e);
            None
        }
    }
}

fn resolve_cors() -> CorsConfig {
    let origins = match env_non_empty(ENV_CORS_ORIGINS) {
        Some(raw) if raw.trim() == "*" => CorsOrigins::Any,
        Some(raw) => CorsOrigins::List(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        ),
        None => CorsOrigins::List(DEFAULT_CORS_ORIGINS.iter().map(ToString::to_string).collect()),
    };

    let allow_credentials = env_non_empty(ENV_CORS_ALLOW_CREDENTIALS)
        .and_then(|raw| parse_bool_like(ENV_CORS_ALLOW_CREDENTIALS, &raw))
        .unwrap_or(DEFAULT_CORS_ALLOW_CREDENTIALS);

    CorsConfig::new(origins, allow_credentials)
}

fn parse_bool_like(name: &str, raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!("Ignoring unrecognized boolean {}={:?}", name, raw);
            None
        }
    }
}
