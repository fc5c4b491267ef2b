use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::{Encoding, RelayConfig};
use crate::error::{RelayError, GENERIC_UPSTREAM_ERROR};
use crate::models::Submission;

use super::SheetService;

pub struct HttpSheet {
    client: reqwest::Client,
    config: RelayConfig,
}

impl HttpSheet {
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        // Apps Script answers POSTs with a redirect to the result page, so
        // reqwest's default redirect policy stays on.
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl SheetService for HttpSheet {
    fn target(&self) -> &str {
        &self.config.target
    }

    async fn append(&self, submission: &Submission) -> Result<Value, RelayError> {
        let req = self.client.post(&self.config.target);
        let req = match self.config.encoding {
            Encoding::Json => req.json(submission),
            Encoding::Form => req.form(&submission.pairs()),
        };

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                RelayError::UpstreamTransport(format!(
                    "Sheet request timed out after {:?}",
                    self.config.timeout
                ))
            } else {
                RelayError::UpstreamTransport(format!("Sheet request failed: {e}"))
            }
        })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| RelayError::UpstreamTransport(format!("Failed to read sheet response: {e}")))?;
        let parsed = serde_json::from_str::<Value>(&text).ok();

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Sheet service returned an error status");
            return Err(RelayError::UpstreamApplication {
                status: status.as_u16(),
                message: parsed
                    .as_ref()
                    .and_then(upstream_message)
                    .unwrap_or_else(|| GENERIC_UPSTREAM_ERROR.to_string()),
            });
        }

        let Some(body) = parsed else {
            if self.config.lenient_text_ack && text.contains("success") {
                tracing::debug!("Accepting plain-text sheet acknowledgement");
                return Ok(json!({ "raw": text }));
            }
            let preview = text.chars().take(200).collect::<String>();
            return Err(RelayError::Decode(format!("Sheet service returned non-JSON body: {preview}")));
        };

        if body.get("success").and_then(Value::as_bool) != Some(true) {
            return Err(RelayError::UpstreamApplication {
                status: status.as_u16(),
                message: upstream_message(&body).unwrap_or_else(|| GENERIC_UPSTREAM_ERROR.to_string()),
            });
        }

        Ok(body)
    }
}

fn upstream_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(|m| m.to_string())
}
