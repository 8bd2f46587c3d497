//! LSO Callback Client
//!
//! Delivers run outcomes to the callback address supplied with a run request.
//!
//! Delivery is a single POST with the outcome as JSON. The client reports
//! failures but never retries; deciding what to do with a failed delivery is
//! left to the caller.
//!
//! # Example
//!
//! ```no_run
//! use lso_client::{CallbackClient, CallbackNotifier};
//! use lso_core::domain::job::JobId;
//! use lso_core::domain::outcome::RunOutcome;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CallbackClient::new(Duration::from_secs(10))?;
//!     let url = url::Url::parse("https://orchestrator.example/cb")?;
//!
//!     let outcome = RunOutcome::success(JobId::new(), "PLAY RECAP ok=3".to_string());
//!     client.notify(&url, &outcome).await?;
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ClientError, Result};

use async_trait::async_trait;
use lso_core::domain::outcome::RunOutcome;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Sink for run outcomes
#[async_trait]
pub trait CallbackNotifier: Send + Sync {
    /// Delivers one outcome to `callback`
    ///
    /// Called exactly once per accepted run.
    async fn notify(&self, callback: &Url, outcome: &RunOutcome) -> Result<()>;
}

/// HTTP implementation of [`CallbackNotifier`]
#[derive(Debug, Clone)]
pub struct CallbackClient {
    /// HTTP client instance
    client: Client,
}

impl CallbackClient {
    /// Create a client whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Create a client from a configured reqwest Client
    ///
    /// This allows you to configure proxies, TLS settings, etc.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Check the response status, turning failures into [`ClientError::ApiError`]
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[async_trait]
impl CallbackNotifier for CallbackClient {
    async fn notify(&self, callback: &Url, outcome: &RunOutcome) -> Result<()> {
        debug!("Posting outcome of job {} to {}", outcome.job_id, callback);

        let response = self
            .client
            .post(callback.clone())
            .json(outcome)
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
