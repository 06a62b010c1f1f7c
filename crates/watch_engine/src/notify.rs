use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use watch_core::Notification;

use crate::http::{build_client, failure_kind};
use crate::{FailureKind, NotifyError};

#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub endpoint: String,
    pub token: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl NotifySettings {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one notification. Exactly one outbound call, never retried.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Posts plain-text notifications to an ntfy topic.
#[derive(Debug, Clone)]
pub struct NtfySink {
    endpoint: url::Url,
    authorization: HeaderValue,
    client: reqwest::Client,
}

impl NtfySink {
    pub fn new(settings: NotifySettings) -> Result<Self, NotifyError> {
        let endpoint = url::Url::parse(&settings.endpoint)
            .map_err(|err| NotifyError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", settings.token))
            .map_err(|err| NotifyError::new(FailureKind::InvalidHeader, err.to_string()))?;
        authorization.set_sensitive(true);
        let client = build_client(settings.connect_timeout, settings.request_timeout)
            .map_err(|err| NotifyError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            endpoint,
            authorization,
            client,
        })
    }
}

/// ntfy action string that opens the observation page.
pub(crate) fn view_action(notification: &Notification) -> String {
    format!(
        "view, Open Observation, {}, clear=true",
        notification.url()
    )
}

#[async_trait::async_trait]
impl NotificationSink for NtfySink {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        // Common names may carry non-ASCII letters; header values allow them as raw bytes.
        let title = HeaderValue::from_bytes(notification.title.as_bytes())
            .map_err(|err| NotifyError::new(FailureKind::InvalidHeader, err.to_string()))?;
        let actions = HeaderValue::from_str(&view_action(notification))
            .map_err(|err| NotifyError::new(FailureKind::InvalidHeader, err.to_string()))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Title", title)
            .header("Actions", actions)
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .header(AUTHORIZATION, self.authorization.clone())
            .body(notification.body.clone())
            .send()
            .await
            .map_err(|err| NotifyError::new(failure_kind(&err), err.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(NotifyError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(())
    }
}
