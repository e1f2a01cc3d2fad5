/// LLM Client: the single point of entry for all Gemini API calls in StyleSense.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All model interactions MUST go through this module.
///
/// Every method issues exactly one HTTP request. There is no retry here:
/// a failed call is terminal for the user action that triggered it.
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// Model used for structured text calls (recommendations, trends).
/// Hardcoded to prevent accidental drift.
pub const TEXT_MODEL: &str = "gemini-3-flash-preview";
/// Model used for outfit image rendering.
pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const API_VERSION: &str = "v1beta";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Base64 payload with its mime type, as carried in Gemini `inlineData` parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl InlineData {
    /// Renders the payload as a `data:` URL the browser can display directly.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// One user turn sent to the model.
#[derive(Debug, Clone, Copy)]
pub struct Prompt<'a> {
    pub system: Option<&'a str>,
    pub text: &'a str,
    pub image: Option<&'a InlineData>,
}

impl<'a> Prompt<'a> {
    pub fn text(text: &'a str) -> Self {
        Self {
            system: None,
            text,
            image: None,
        }
    }
}

/// Generation options forwarded verbatim as `generationConfig`.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<&'a [&'a str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig<'a>>,
}

impl<'a> GenerationConfig<'a> {
    /// Requests JSON text conforming to `schema`.
    pub fn json(schema: &'a Value) -> Self {
        Self {
            response_mime_type: Some("application/json"),
            response_schema: Some(schema),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig<'a> {
    pub aspect_ratio: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum RequestPart<'a> {
    Text(&'a str),
    InlineData(&'a InlineData),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl LlmResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|c| c.parts.iter())
    }

    /// Concatenated text of the first candidate, or `None` if it carries no text.
    pub fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline binary part of the first candidate.
    pub fn inline_data(&self) -> Option<&InlineData> {
        self.parts().find_map(|p| p.inline_data.as_ref())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The single Gemini client used by all services in StyleSense.
/// Wraps the `generateContent` REST endpoint with structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{API_VERSION}/models/{model}:generateContent",
            self.base_url
        )
    }

    /// Makes one raw `generateContent` call, returning the full response object.
    pub async fn generate(
        &self,
        model: &str,
        prompt: Prompt<'_>,
        generation_config: GenerationConfig<'_>,
    ) -> Result<LlmResponse, LlmError> {
        let mut parts = vec![RequestPart::Text(prompt.text)];
        if let Some(image) = prompt.image {
            parts.push(RequestPart::InlineData(image));
        }

        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: Some("user"),
                parts,
            }],
            system_instruction: prompt.system.map(|system| RequestContent {
                role: None,
                parts: vec![RequestPart::Text(system)],
            }),
            generation_config,
        };

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage_metadata {
            debug!(
                "Gemini call to {model} succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(llm_response)
    }

    /// Calls the text model with a response schema and returns the raw JSON text,
    /// with any markdown code fences removed.
    pub async fn generate_json_text(
        &self,
        prompt: Prompt<'_>,
        schema: &Value,
    ) -> Result<String, LlmError> {
        let response = self
            .generate(TEXT_MODEL, prompt, GenerationConfig::json(schema))
            .await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        Ok(strip_json_fences(&text).to_string())
    }

    /// Convenience method that calls the text model and deserializes the response.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: Prompt<'_>,
        schema: &Value,
    ) -> Result<T, LlmError> {
        let text = self.generate_json_text(prompt, schema).await?;
        serde_json::from_str(&text).map_err(LlmError::Parse)
    }

    /// Calls the image model. Returns `None` when the model answers without an image part.
    pub async fn generate_image(
        &self,
        prompt: Prompt<'_>,
        aspect_ratio: &str,
    ) -> Result<Option<InlineData>, LlmError> {
        let config = GenerationConfig {
            response_modalities: Some(&["TEXT", "IMAGE"]),
            image_config: Some(ImageConfig { aspect_ratio }),
            ..GenerationConfig::default()
        };
        let response = self.generate(IMAGE_MODEL, prompt, config).await?;
        Ok(response.inline_data().cloned())
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// In-process stand-in for the Gemini endpoint. Answers every request with a
/// canned status and body, recording how many calls arrived and the last body.
#[cfg(test)]
pub(crate) mod stub {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::{extract::State, http::StatusCode, Json, Router};
    use serde_json::Value;

    use super::LlmClient;

    #[derive(Clone)]
    struct StubState {
        status: StatusCode,
        body: Value,
        calls: Arc<AtomicUsize>,
        last_request: Arc<Mutex<Option<Value>>>,
    }

    pub struct StubServer {
        pub base_url: String,
        calls: Arc<AtomicUsize>,
        last_request: Arc<Mutex<Option<Value>>>,
    }

    impl StubServer {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_request(&self) -> Option<Value> {
            self.last_request.lock().unwrap().clone()
        }

        pub fn client(&self) -> LlmClient {
            LlmClient::new("test-key".into(), self.base_url.clone(), Duration::from_secs(5))
                .unwrap()
        }
    }

    async fn answer(State(stub): State<StubState>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        stub.calls.fetch_add(1, Ordering::SeqCst);
        *stub.last_request.lock().unwrap() = Some(body);
        (stub.status, Json(stub.body.clone()))
    }

    pub async fn spawn(status: StatusCode, body: Value) -> StubServer {
        let calls = Arc::new(AtomicUsize::new(0));
        let last_request = Arc::new(Mutex::new(None));
        let state = StubState {
            status,
            body,
            calls: calls.clone(),
            last_request: last_request.clone(),
        };
        let app = Router::new().fallback(answer).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        StubServer {
            base_url: format!("http://{addr}"),
            calls,
            last_request,
        }
    }

    /// Wraps `text` the way Gemini returns a single text candidate.
    pub fn text_body(text: &str) -> Value {
        serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 34 }
        })
    }
}
