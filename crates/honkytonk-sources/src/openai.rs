//! OpenAI chat completions used to turn reduced chart-page text into structured rows.

use crate::{chart::ParsedChart, error::SourceError};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const SYSTEM_PROMPT: &str = "You extract music chart data from the visible text of a chart web page. \
Respond with a single JSON object of the form \
{\"chart_date\": \"YYYY-MM-DD\" or null, \"entries\": [{\"position\": int, \"title\": string, \"artist\": string, \
\"last_week\": int or null, \"peak_position\": int or null, \"weeks_on_chart\": int or null}]}. \
Only include songs that appear in the text. Do not invent entries.";

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Clone)]
pub struct OpenAiChartParser {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiChartParser {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Ask the model for the first `expected_entries` rows of the chart in `page_text`.
    /// Rows come back unvalidated.
    #[tracing::instrument(skip(self, page_text), fields(model = %self.model, chars = page_text.len()))]
    pub async fn parse_chart(
        &self,
        page_text: &str,
        expected_entries: usize,
    ) -> Result<ParsedChart, SourceError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "temperature": 0,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Extract the top {} entries of this chart.\n\n{}",
                        expected_entries, page_text
                    )
                }
            ]
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SourceError::Upstream(describe_openai_error(
                status.as_u16(),
                &error_text,
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("chat completion: {}", e)))?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chart parse token usage"
            );
        }

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| SourceError::Parse("chat completion has no content".to_string()))?;

        serde_json::from_str(strip_code_fence(&content))
            .map_err(|e| SourceError::Parse(format!("chart JSON: {}", e)))
    }
}

/// `{"error":{"message","type"}}` bodies become `OpenAI API error (type): message`.
fn describe_openai_error(status: u16, body: &str) -> String {
    if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(error_obj) = error_json.get("error") {
            let message = error_obj
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown OpenAI error");
            let error_type = error_obj
                .get("type")
                .and_then(|t| t.as_str())
                .unwrap_or("api_error");
            return format!(
                "OpenAI API error ({}): {} - Status: {}",
                error_type, message, status
            );
        }
    }
    format!("OpenAI API request failed: {} - {}", status, body)
}

/// Models sometimes wrap JSON in a Markdown code fence despite `json_object` mode.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.trim_end().trim_end_matches("```").trim()
        }
        None => trimmed,
    }
}
