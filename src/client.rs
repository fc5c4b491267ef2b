//! The caller-facing submission helper.
//!
//! A landing page calls [`SubmissionClient::submit`] from its form handler and
//! only ever gets a [`SubmitOutcome`] back: every transport or decoding
//! failure is folded into `success: false` with a fixed message, so the form
//! can keep the user's input and show the message.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::models::{Envelope, Submission};
use crate::sheet::{HttpSheet, SheetService};

pub const SUBMIT_RETRY: &str = "Failed to submit form. Please try again.";
pub const DEVELOPMENT_ACK: &str = "Form submitted successfully (development mode)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub success: bool,
    pub message: String,
}

impl SubmitOutcome {
    fn failed() -> Self {
        Self {
            success: false,
            message: SUBMIT_RETRY.to_string(),
        }
    }
}

/// Where the helper sends submissions. Resolved once at bootstrap.
#[derive(Debug, Clone)]
pub enum ClientTarget {
    /// A relay endpoint, usually same-origin.
    Relay { url: String, timeout: Duration },
    /// The sheet service itself, skipping the relay.
    Direct { relay: RelayConfig },
    /// Log the submission and report success without any network call.
    Console,
}

impl ClientTarget {
    /// `development` talks to the local relay; anything else goes direct.
    /// Both share the timeout of `relay`.
    pub fn for_environment(environment: &str, relay_url: impl Into<String>, relay: RelayConfig) -> Self {
        if environment.trim().eq_ignore_ascii_case("development") {
            ClientTarget::Relay {
                url: relay_url.into(),
                timeout: relay.timeout,
            }
        } else {
            ClientTarget::Direct { relay }
        }
    }
}

enum Backend {
    Relay { client: reqwest::Client, url: String },
    Direct(HttpSheet),
    Console,
}

pub struct SubmissionClient {
    backend: Backend,
}

impl SubmissionClient {
    pub fn new(target: ClientTarget) -> Result<Self, reqwest::Error> {
        let backend = match target {
            ClientTarget::Relay { url, timeout } => Backend::Relay {
                client: reqwest::Client::builder().timeout(timeout).build()?,
                url,
            },
            ClientTarget::Direct { relay } => Backend::Direct(HttpSheet::new(relay)?),
            ClientTarget::Console => Backend::Console,
        };
        Ok(Self { backend })
    }

    /// Submit once. Never fails; errors come back as `success: false`.
    pub async fn submit(&self, submission: &Submission) -> SubmitOutcome {
        match &self.backend {
            Backend::Relay { client, url } => submit_to_relay(client, url, submission).await,
            Backend::Direct(sheet) => submit_direct(sheet, submission).await,
            Backend::Console => {
                tracing::info!(
                    form_type = %submission.form_type(),
                    "Form submission (development mode)"
                );
                SubmitOutcome {
                    success: true,
                    message: DEVELOPMENT_ACK.to_string(),
                }
            }
        }
    }
}

async fn submit_to_relay(client: &reqwest::Client, url: &str, submission: &Submission) -> SubmitOutcome {
    let resp = match client.post(url).json(submission).send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!("Error submitting form: {e}");
            return SubmitOutcome::failed();
        }
    };

    let status = resp.status();
    let envelope = match resp.json::<Envelope>().await {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::error!(status = status.as_u16(), "Undecodable relay reply: {e}");
            return SubmitOutcome::failed();
        }
    };

    if status.is_success() {
        return SubmitOutcome {
            success: envelope.success,
            message: envelope.message,
        };
    }

    tracing::warn!(status = status.as_u16(), "Relay rejected submission: {}", envelope.message);
    if envelope.message.is_empty() {
        SubmitOutcome::failed()
    } else {
        SubmitOutcome {
            success: false,
            message: envelope.message,
        }
    }
}

async fn submit_direct(sheet: &HttpSheet, submission: &Submission) -> SubmitOutcome {
    match sheet.append(submission).await {
        Ok(ack) => SubmitOutcome {
            success: true,
            message: ack
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(crate::models::envelope::SUBMITTED)
                .to_string(),
        },
        // A 2xx reply carrying `success: false`; error statuses fall through
        Err(RelayError::UpstreamApplication { status, message }) if (200..300).contains(&status) => {
            tracing::warn!("Sheet service rejected submission: {message}");
            SubmitOutcome {
                success: false,
                message,
            }
        }
        Err(e) => {
            tracing::error!("Error submitting form: {e}");
            SubmitOutcome::failed()
        }
    }
}
