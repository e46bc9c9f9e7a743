use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::GenerativeClient;
use crate::domain::{AdvisorError, Content, GenerateRequest, Part, ProviderConfig};

const API_PATH: &str = "/v1beta/models";
const USER_AGENT: &str = concat!("decor-advisor/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiContent<'a>>,
    contents: Vec<ApiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<ApiGenerationConfig<'a>>,
}

#[derive(Serialize)]
struct ApiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<ApiPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ApiPart<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: ApiInlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiInlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a serde_json::Value,
}

/// Minimal subset of the generateContent response we care about.
#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// HTTP client for the Gemini `generateContent` REST endpoint.
///
/// Implements [`GenerativeClient`] so the chat and room-analysis use cases
/// never see the wire format. The base URL is configurable, which lets tests
/// point it at a local fake server.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    /// Full endpoint URL (base + path + model + method).
    url: String,
}

impl GeminiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AdvisorError::construction(format!("GeminiClient: {e}")))?;

        let base = config.base_url().trim_end_matches('/');
        let url = format!("{base}{API_PATH}/{}:generateContent", config.model());

        Ok(Self {
            client,
            api_key: config.api_key().to_string(),
            model: config.model().to_string(),
            url,
        })
    }

    /// URL every `generateContent` call is posted to.
    pub fn endpoint(&self) -> &str {
        &self.url
    }

    fn to_api_request(request: &GenerateRequest) -> ApiRequest<'_> {
        let system_instruction = request.system_instruction.as_deref().map(|text| ApiContent {
            role: None,
            parts: vec![ApiPart::Text { text }],
        });

        ApiRequest {
            system_instruction,
            contents: request.contents.iter().map(to_api_content).collect(),
            generation_config: request.response_format.as_ref().map(|f| ApiGenerationConfig {
                response_mime_type: &f.mime_type,
                response_schema: &f.schema,
            }),
        }
    }

    /// Join the text parts of the first candidate. No candidates or no text
    /// gives an empty string.
    fn extract_text(response: ApiResponse) -> String {
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn error_message(body: &str) -> String {
        match serde_json::from_str::<ErrorWrapper>(body) {
            Ok(wrapper) => {
                let message = wrapper.error.message.unwrap_or_default();
                match wrapper.error.status {
                    Some(status) if !status.is_empty() => format!("{status}: {message}"),
                    _ => message,
                }
            }
            Err(_) => body.to_string(),
        }
    }
}

fn to_api_content(content: &Content) -> ApiContent<'_> {
    ApiContent {
        role: Some(content.role.as_str()),
        parts: content
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => ApiPart::Text { text },
                Part::InlineData { mime_type, data } => ApiPart::InlineData {
                    inline_data: ApiInlineData { mime_type, data },
                },
            })
            .collect(),
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, AdvisorError> {
        let body = Self::to_api_request(request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AdvisorError::transport(format!("GeminiClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("GeminiClient: API returned {status}: {body}");
            return Err(AdvisorError::provider(
                status.as_u16(),
                Self::error_message(&body),
            ));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            AdvisorError::malformed(format!("GeminiClient: failed to parse response: {e}"))
        })?;

        let text = Self::extract_text(api_response);
        debug!("GeminiClient: {} returned {} chars", self.endpoint(), text.len());
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
