//! Chat-completion gateway — one POST per user utterance, reply text out.
//!
//! The remote endpoint speaks the Gemini `generateContent` shape: the
//! request wraps the utterance in `contents[].parts[].text` and the reply
//! comes back in `candidates[0].content.parts[0].text`.  The gateway
//! normalizes that envelope and nothing else.

use std::time::Duration;

use serde_json::json;

use crate::GatewayError;

/// Substituted when the endpoint answers successfully but the reply field
/// is absent or empty.  An empty reply is not an error — the transcript
/// still records the round-trip.
pub const FALLBACK_REPLY: &str = "No response from AI.";

#[derive(Debug, Clone)]
pub struct ChatGateway {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ChatGateway {
    /// Build a gateway for `api_url`, authenticating via the `key` query
    /// parameter.  `timeout` bounds each call; an elapsed timeout surfaces
    /// as [`GatewayError::Http`].
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Forward `utterance` to the endpoint and return the generated reply.
    ///
    /// No retries here: a non-success status or an unparsable body is a
    /// [`GatewayError`] for the caller to handle.
    pub async fn complete(&self, utterance: &str) -> Result<String, GatewayError> {
        let payload = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": utterance }]
                }
            ]
        });

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "chat completion request failed");
            return Err(GatewayError::Status(status));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|_| GatewayError::MalformedResponse)?;
        Ok(extract_reply(&body))
    }
}

/// Pull the reply text out of the response envelope, substituting
/// [`FALLBACK_REPLY`] when the field is missing or empty.
fn extract_reply(body: &serde_json::Value) -> String {
    body.get("candidates")
        .and_then(|candidates| candidates.get(0))
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.get(0))
        .and_then(|part| part.get("text"))
        .and_then(|text| text.as_str())
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| FALLBACK_REPLY.to_string())
}

// ── Tests ────────────────────────────────────────────────────────────────────
