//! Outbound deployment-completion notifications.
//!
//! Delivery is best effort: one attempt, bounded by a request timeout, and
//! failures are logged by [`dispatch`] without ever reaching the clock.

use async_trait::async_trait;
use pipesim_core::config::SimConfig;
use pipesim_core::deployment::DeploymentNotice;
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("webhook responded with {0}")]
    Status(reqwest::StatusCode),
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: DeploymentNotice) -> Result<(), NotifyError>;
}

/// POSTs `{"deployment": .., "stacktrace": ..}` to a fixed URL.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pipesim/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notice: DeploymentNotice) -> Result<(), NotifyError> {
        let response = self.client.post(&self.url).json(&notice).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status));
        }
        Ok(())
    }
}

/// Used when the webhook URL is `null` or blank.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, notice: DeploymentNotice) -> Result<(), NotifyError> {
        tracing::debug!(deployment = %notice.deployment.id, "no webhook configured");
        Ok(())
    }
}

pub fn from_config(config: &SimConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    match config.webhook_url.as_deref() {
        Some(url) if !url.trim().is_empty() => {
            let notifier = WebhookNotifier::new(url.trim(), config.notify_timeout())?;
            tracing::info!(url = notifier.url(), "deployment webhook enabled");
            Ok(Arc::new(notifier))
        }
        _ => Ok(Arc::new(NullNotifier)),
    }
}

/// Fire-and-forget: deliver on a spawned task and log any failure.
pub fn dispatch(notifier: Arc<dyn Notifier>, notice: DeploymentNotice) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let id = notice.deployment.id.clone();
        if let Err(e) = notifier.notify(notice).await {
            tracing::warn!(deployment = %id, error = %e, "failed to send deployment notification");
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
