// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed Adaptive Card document and Teams message envelope.
//!
//! The card is a fixed-shape document assembled through [`CardBuilder`],
//! which enforces the body ordering the Teams webhook expects:
//! image → title → date line → type line → facts → description → action.
//! Serializing one of these always yields JSON that validates against the
//! Adaptive Card 1.4 schema.

use serde::{Deserialize, Serialize};

const ADAPTIVE_CARD_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";
const ADAPTIVE_CARD_VERSION: &str = "1.4";
const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// Top-level webhook payload: a chat message carrying one card attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub content: AdaptiveCard,
}

/// An Adaptive Card document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveCard {
    #[serde(rename = "$schema")]
    pub schema: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub version: String,
    pub body: Vec<CardElement>,
}

/// Body elements, tagged by Adaptive Card element type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CardElement {
    Image {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<String>,
    },
    TextBlock {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        weight: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        spacing: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        wrap: Option<bool>,
    },
    FactSet {
        facts: Vec<Fact>,
        #[serde(skip_serializing_if = "Option::is_none")]
        spacing: Option<String>,
    },
    ActionSet {
        actions: Vec<Action>,
    },
}

/// One (label, value) row in a FactSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub title: String,
    pub value: String,
}

impl Fact {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

/// Card actions; only OpenUrl is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    #[serde(rename = "Action.OpenUrl")]
    OpenUrl { title: String, url: String },
}

/// Builder that assembles the card body in its fixed order.
///
/// The title and action link are mandatory; everything else is added only
/// when the source activity carries the corresponding data.
pub struct CardBuilder {
    body: Vec<CardElement>,
}

impl CardBuilder {
    /// Start a card with the mandatory title block.
    pub fn new(title: impl Into<String>) -> Self {
        let body = vec![CardElement::TextBlock {
            text: title.into(),
            size: Some("Large".to_string()),
            weight: Some("Bolder".to_string()),
            color: None,
            spacing: None,
            wrap: None,
        }];
        Self { body }
    }

    /// Prepend a stretched header image. Call at most once.
    pub fn header_image(mut self, url: impl Into<String>) -> Self {
        self.body.insert(
            0,
            CardElement::Image {
                url: url.into(),
                size: Some("Stretch".to_string()),
            },
        );
        self
    }

    /// Small date/time line directly under the title.
    pub fn date_line(mut self, text: impl Into<String>) -> Self {
        self.body.push(CardElement::TextBlock {
            text: text.into(),
            size: Some("Small".to_string()),
            weight: None,
            color: Some("Default".to_string()),
            spacing: Some("None".to_string()),
            wrap: None,
        });
        self
    }

    /// Small, lighter activity-type line.
    pub fn type_line(mut self, text: impl Into<String>) -> Self {
        self.body.push(CardElement::TextBlock {
            text: text.into(),
            size: Some("Small".to_string()),
            weight: Some("Lighter".to_string()),
            color: None,
            spacing: Some("None".to_string()),
            wrap: None,
        });
        self
    }

    /// Stats fact set. Skipped entirely when `facts` is empty.
    pub fn facts(mut self, facts: Vec<Fact>) -> Self {
        if !facts.is_empty() {
            self.body.push(CardElement::FactSet {
                facts,
                spacing: Some("Medium".to_string()),
            });
        }
        self
    }

    /// Wrapped free-text description.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.body.push(CardElement::TextBlock {
            text: text.into(),
            size: None,
            weight: None,
            color: None,
            spacing: Some("Medium".to_string()),
            wrap: Some(true),
        });
        self
    }

    /// Finish with the mandatory outbound link and wrap into the message
    /// envelope.
    pub fn link(mut self, title: impl Into<String>, url: impl Into<String>) -> TeamsMessage {
        self.body.push(CardElement::ActionSet {
            actions: vec![Action::OpenUrl {
                title: title.into(),
                url: url.into(),
            }],
        });

        TeamsMessage {
            message_type: "message".to_string(),
            attachments: vec![Attachment {
                content_type: ADAPTIVE_CARD_CONTENT_TYPE.to_string(),
                content: AdaptiveCard {
                    schema: ADAPTIVE_CARD_SCHEMA.to_string(),
                    card_type: "AdaptiveCard".to_string(),
                    version: ADAPTIVE_CARD_VERSION.to_string(),
                    body: self.body,
                },
            }],
        }
    }
}
