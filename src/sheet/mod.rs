pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RelayError;
use crate::models::Submission;

pub use http::HttpSheet;

/// The external service that appends a submission as a spreadsheet row.
#[async_trait]
pub trait SheetService: Send + Sync {
    fn target(&self) -> &str;

    /// Forward one submission. Returns the service's acknowledgement body.
    async fn append(&self, submission: &Submission) -> Result<Value, RelayError>;
}
