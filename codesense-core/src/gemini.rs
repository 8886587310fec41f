use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Fast, efficient, and reliable for structured output.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Failed to reach Gemini API: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx from the API. The response body is preserved for diagnosis;
    /// the credential travels only in a request header and never appears here.
    #[error("Gemini API error: {status} - {body}")]
    Api { status: StatusCode, body: String },

    #[error("Gemini response contained no candidate text")]
    EmptyResponse,
}

/// Client for the Gemini generateContent API.
///
/// Constructed once at process startup and shared read-only across requests.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    #[serde(rename = "systemInstruction")]
    pub system_instruction: SystemInstruction,
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
    #[serde(rename = "responseSchema")]
    pub response_schema: ResponseSchema,
}

#[derive(Debug, Serialize)]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: SchemaProperties,
    pub required: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SchemaProperties {
    pub summary: SchemaProperty,
    pub readability: SchemaProperty,
    pub modularity: SchemaProperty,
    pub bugs: SchemaProperty,
    pub suggestions: SchemaProperty,
    pub score: SchemaProperty,
}

#[derive(Debug, Serialize)]
pub struct SchemaProperty {
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl SchemaProperty {
    fn string() -> Self {
        SchemaProperty {
            property_type: "STRING".to_string(),
            description: None,
        }
    }
}

/// Response schema for a code review, mirroring the fields of `CodeReview`.
pub fn response_schema() -> ResponseSchema {
    ResponseSchema {
        schema_type: "OBJECT".to_string(),
        properties: SchemaProperties {
            summary: SchemaProperty::string(),
            readability: SchemaProperty::string(),
            modularity: SchemaProperty::string(),
            bugs: SchemaProperty::string(),
            suggestions: SchemaProperty::string(),
            score: SchemaProperty {
                property_type: "INTEGER".to_string(),
                description: Some("Overall quality score from 0 to 10".to_string()),
            },
        },
        required: vec![
            "summary".to_string(),
            "readability".to_string(),
            "modularity".to_string(),
            "bugs".to_string(),
            "suggestions".to_string(),
            "score".to_string(),
        ],
    }
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, GEMINI_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        let client = Client::builder()
            .user_agent("codesense/0.1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url,
            model,
        }
    }

    /// Ask the model for a structured review.
    ///
    /// Sends a single generateContent call requesting JSON-only output
    /// against the review schema with temperature zero, and returns the raw
    /// candidate text. The caller parses and validates the text.
    pub async fn generate_review(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            },
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: user_prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API error: {} - {}", status, body);
            return Err(GeminiError::Api { status, body });
        }

        let body: GenerateContentResponse = response.json().await?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GeminiError::EmptyResponse);
        }

        info!("Gemini returned {} bytes of review text", text.len());

        Ok(text)
    }
}
