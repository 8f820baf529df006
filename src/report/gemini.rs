//! Report generation through the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::time::Duration;

use crate::config::ReportSettings;
use crate::error::ReportError;
use crate::report::generator::{ReportGenerator, ReportRequest};

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiReportGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    system_instruction: String,
}

impl GeminiReportGenerator {
    /// Fails with [`ReportError::MissingCredential`] before any request is made
    /// when `api_key` is blank.
    pub fn new(settings: &ReportSettings, api_key: &str) -> Result<Self, ReportError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ReportError::MissingCredential);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: api_key.to_string(),
            system_instruction: settings.system_instruction.clone(),
        })
    }

    pub fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn build_body(&self, request: &ReportRequest) -> Result<GenerateContentRequest, ReportError> {
        let mut parts = vec![Part::text(request.prompt())];
        if let Some(image) = &request.image {
            parts.push(Part::png(image)?);
        }

        Ok(GenerateContentRequest {
            system_instruction: (!self.system_instruction.trim().is_empty()).then(|| Content {
                role: None,
                parts: vec![Part::text(self.system_instruction.clone())],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
        })
    }
}

#[async_trait]
impl ReportGenerator for GeminiReportGenerator {
    async fn generate(&self, request: &ReportRequest) -> Result<String, ReportError> {
        let body = self.build_body(request)?;
        tracing::info!("Requesting report from model '{}'", self.model);

        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::Service {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_text(parsed)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "inlineData"
    )]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    fn png(image: &DynamicImage) -> Result<Self, ReportError> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(Self {
            inline_data: Some(InlineData {
                mime_type: "image/png".to_string(),
                data: STANDARD.encode(bytes),
            }),
            ..Default::default()
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    #[serde(alias = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text(response: GenerateContentResponse) -> Result<String, ReportError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ReportError::EmptyResponse);
    }
    Ok(text)
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
