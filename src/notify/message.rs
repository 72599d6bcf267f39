//! Webhook message formatting.
//!
//! The payload follows the Discord webhook shape: top-level identity fields
//! plus one embed describing the transition.

use serde::Serialize;

use crate::health::state::{Transition, TransitionEvent};

/// Embed color for down alerts (#FF0000).
pub const DOWN_COLOR: u32 = 16_711_680;
/// Embed color for recoveries (#11DD33).
pub const RECOVERY_COLOR: u32 = 1_170_739;

pub const DOWN_TITLE: &str = "Down Alert!";
pub const RECOVERY_TITLE: &str = "All Systems Green";

/// JSON body POSTed to the webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub username: String,
    /// Mention markup, present only on down alerts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

/// Static parts of every message, taken from configuration.
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    pub name: String,
    pub mention: Option<String>,
    pub avatar_url: Option<String>,
}

impl MessageTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mention: None,
            avatar_url: None,
        }
    }

    pub fn with_mention(mut self, mention: Option<String>) -> Self {
        self.mention = mention.filter(|m| !m.trim().is_empty());
        self
    }

    pub fn with_avatar(mut self, avatar_url: Option<String>) -> Self {
        self.avatar_url = avatar_url;
        self
    }

    /// Build the webhook body for a transition.
    pub fn render(&self, event: &TransitionEvent) -> WebhookMessage {
        let (title, description, color, content) = match event.transition {
            Transition::Down => (
                DOWN_TITLE,
                format!("A problem has been detected with **{}**.", self.name),
                DOWN_COLOR,
                self.mention.as_ref().map(|id| format!("<@{}>", id)),
            ),
            Transition::Recovered => (
                RECOVERY_TITLE,
                format!("{} operation is back to normal.", self.name),
                RECOVERY_COLOR,
                None,
            ),
        };

        WebhookMessage {
            avatar_url: self.avatar_url.clone(),
            username: format!("{} Status", self.name),
            content,
            embeds: vec![Embed {
                title: title.to_string(),
                description,
                color,
                fields: vec![EmbedField {
                    name: "Report Time".to_string(),
                    value: format!("<t:{}:R>", event.detected_at.timestamp()),
                }],
            }],
        }
    }
}
