//! Webhook delivery.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::health::state::TransitionEvent;
use crate::notify::message::MessageTemplate;
use crate::notify::{Notify, NotifyError};

/// Posts transition messages to a webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: Url,
    template: MessageTemplate,
}

impl WebhookNotifier {
    pub fn new(url: Url, template: MessageTemplate, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                Client::new()
            });

        Self {
            client,
            url,
            template,
        }
    }
}

impl Notify for WebhookNotifier {
    async fn notify(&self, event: &TransitionEvent) -> Result<(), NotifyError> {
        let message = self.template.render(event);

        let response = self
            .client
            .post(self.url.clone())
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        tracing::debug!(
            transition = event.transition.as_str(),
            status = %status,
            "Webhook accepted notification"
        );
        Ok(())
    }
}
