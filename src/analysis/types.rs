use std::{fmt, time::Duration};

use serde::{Deserialize, Deserializer, Serialize};

pub type RequestId = String;

pub const DEFAULT_ENDPOINT: &str =
    "https://llm.api.cloud.yandex.net/foundationModels/v1/completion";
pub const DEFAULT_MODEL_URI: &str = "gpt://b1gu5443n2mkggql04p5/yandexgpt/rc";
pub const DEFAULT_FOLDER_ID: &str = "b1gu5443n2mkggql04p5";
pub const DEFAULT_CREDENTIAL_ENV: &str = "YANDEX_CLOUD_API_KEY";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_TEMPERATURE: f64 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 3000;
pub const DEFAULT_MAX_QUESTION_CHARS: usize = 450_000;

pub const DECISION_ALLOWED: &str = "можно";
pub const DECISION_CONDITIONAL: &str = "можно при условиях";
pub const DECISION_FORBIDDEN: &str = "нельзя";
pub const DECISION_PENDING: &str = "pending";

/// Outcome category of a verdict. Strings the model invents are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Decision {
    #[default]
    Allowed,
    AllowedWithConditions,
    Forbidden,
    Pending,
    Other(String),
}

impl Decision {
    pub fn as_str(&self) -> &str {
        match self {
            Decision::Allowed => DECISION_ALLOWED,
            Decision::AllowedWithConditions => DECISION_CONDITIONAL,
            Decision::Forbidden => DECISION_FORBIDDEN,
            Decision::Pending => DECISION_PENDING,
            Decision::Other(raw) => raw,
        }
    }
}

impl From<String> for Decision {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "" | DECISION_ALLOWED => Decision::Allowed,
            DECISION_CONDITIONAL => Decision::AllowedWithConditions,
            DECISION_FORBIDDEN => Decision::Forbidden,
            DECISION_PENDING => Decision::Pending,
            _ => Decision::Other(raw),
        }
    }
}

impl From<Decision> for String {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured answer to a renovation question.
///
/// `is_valid` and `decision` are consistent only by convention; nothing here rejects a
/// forbidden decision paired with `is_valid = true`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_valid: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub decision: Decision,
    #[serde(default, deserialize_with = "null_as_default")]
    pub justification: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technical_basis: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub limitations_risks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub clarification_needed: Vec<String>,
}

impl Verdict {
    pub fn pending() -> Self {
        Self {
            is_valid: false,
            decision: Decision::Pending,
            justification: "Требуется уточнение данных".to_string(),
            technical_basis: Vec::new(),
            limitations_risks: vec!["Требуется ручная проверка инженером".to_string()],
            clarification_needed: vec!["Необходима полная техническая документация".to_string()],
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOptions {
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub model_uri: String,
    pub completion_options: CompletionOptions,
    pub messages: Vec<PromptMessage>,
}

impl CompletionRequest {
    pub fn user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|message| message.role == PromptRole::User)
            .map(|message| message.text.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionEnvelope {
    #[serde(default)]
    pub result: CompletionResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResult {
    #[serde(default)]
    pub alternatives: Vec<CompletionAlternative>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionAlternative {
    #[serde(default)]
    pub message: AlternativeMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlternativeMessage {
    #[serde(default)]
    pub text: String,
}

impl CompletionEnvelope {
    pub fn into_first_text(self) -> Option<String> {
        self.result
            .alternatives
            .into_iter()
            .next()
            .map(|alternative| alternative.message.text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model_uri")]
    pub model_uri: String,
    #[serde(default = "default_folder_id")]
    pub folder_id: String,
    #[serde(default = "default_credential_env")]
    pub credential_env: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_max_question_chars")]
    pub max_question_chars: usize,
}

impl AnalysisConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model_uri: default_model_uri(),
            folder_id: default_folder_id(),
            credential_env: default_credential_env(),
            request_timeout_ms: default_request_timeout_ms(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_question_chars: default_max_question_chars(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model_uri() -> String {
    DEFAULT_MODEL_URI.to_string()
}

fn default_folder_id() -> String {
    DEFAULT_FOLDER_ID.to_string()
}

fn default_credential_env() -> String {
    DEFAULT_CREDENTIAL_ENV.to_string()
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_max_question_chars() -> usize {
    DEFAULT_MAX_QUESTION_CHARS
}
