mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::util::json_payload;
use client::ClaudeClient;
use types::*;

const EXTRACTION_TOOL: &str = "record_parameters";

/// Handle on a Claude model. Cheap to clone; the HTTP connection pool is shared.
#[derive(Clone)]
pub struct Claude {
    api_key: String,
    model: String,
    base_url: Option<String>,
    http: reqwest::Client,
}

impl std::fmt::Debug for Claude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Claude")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> ClaudeClient<'_> {
        ClaudeClient::new(&self.api_key, self.base_url.as_deref(), &self.http)
    }

    /// Ask the model to fill a JSON object matching `schema` and return that object.
    ///
    /// The model is forced to answer through a single tool whose input schema is `schema`.
    /// A plain-text JSON reply is accepted too.
    pub async fn extract_object(
        &self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        schema: serde_json::Value,
    ) -> Result<serde_json::Map<String, serde_json::Value>> {
        let request = ChatRequest::new(&self.model)
            .system(system_prompt)
            .message(WireMessage::user(user_prompt))
            .temperature(0.0)
            .forced_tool(ToolDefinitionWire {
                name: EXTRACTION_TOOL.to_string(),
                description: "Record the parameters stated in the user's request.".to_string(),
                input_schema: schema,
            });

        let response = self.client().messages(&request).await?;

        let value = match (response.tool_input(), response.text()) {
            (Some(input), _) => input.clone(),
            (None, Some(text)) => {
                debug!("Claude answered in text; parsing as JSON");
                serde_json::from_str(json_payload(text))
                    .map_err(|e| anyhow!("Failed to parse Claude reply as JSON: {}", e))?
            }
            (None, None) => return Err(anyhow!("No structured output in Claude response")),
        };

        match value {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(anyhow!("Expected a JSON object from Claude, got {}", other)),
        }
    }
}
