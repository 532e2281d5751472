use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

use cw_core::{Classification, Error, InferenceModel, Result};

use crate::classifier::{CATEGORIES, THREAT_TYPES};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const CHAT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

pub struct OpenAiModel {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiModel {
    /// Build a model from the `OPENAI_API_KEY` environment variable. A
    /// missing credential is a construction-time failure.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| Error::Config("OPENAI_API_KEY is not set".to_string()))?;
        Ok(Self::new(api_key))
    }

    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn chat(&self, content: String, json_response: bool) -> Result<String> {
        let request = ChatRequest {
            model: CHAT_MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
            response_format: json_response.then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| Error::Inference("empty completion response".to_string()))
    }
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn bullet_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("- {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl InferenceModel for OpenAiModel {
    async fn classify(&self, title: &str, summary: &str) -> Result<Classification> {
        let prompt = format!(
            "Title: {}\nContent: {}\n\n\
             Classify this cybersecurity news article into these categories and \
             identify the main threat type.\n\
             Return the response as a JSON object with format:\n\
             {{\"category\": \"category_name\", \"threat_type\": \"main_threat_type\"}}\n\n\
             Categories:\n{}\n\nThreat Types:\n{}",
            title,
            summary,
            bullet_list(CATEGORIES),
            bullet_list(THREAT_TYPES),
        );

        let content = self.chat(prompt, true).await?;
        let classification: Classification = serde_json::from_str(&content)?;
        Ok(classification)
    }

    async fn recommend(&self, threat_type: &str) -> Result<String> {
        let prompt = format!(
            "Generate practical cybersecurity recommendations to protect against \
             {} attacks. Focus on actionable steps that both individuals and \
             organizations can take. Keep it concise but comprehensive \
             (3-5 bullet points).",
            threat_type
        );

        self.chat(prompt, false).await
    }
}
