//! Auto Responder - turns one inbound message into a reply envelope.
//!
//! Coordinates intent classification, template selection, placeholder
//! filling, tone adaptation and platform length limits. Holds no mutable
//! state: the catalog and platform settings are borrowed from the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::intent::{Intent, IntentClassifier};
use super::platform::PlatformConfig;
use super::templates::{adapt_tone, ResponseTemplate, TemplateCatalog, TemplateFiller};
use crate::error::AppError;
use crate::models::{InboundMessage, Platform, SenderContext};
use crate::providers::{Clock, SystemClock};

const FALLBACK_TEMPLATE: &str = "general_thanks";

/// The reply envelope returned to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoReplyResponse {
    pub id: String,
    pub original_message_id: String,
    pub sender_id: String,
    pub platform: Platform,
    pub intent: Intent,
    pub response: String,
    pub template_used: String,
    pub was_edited: bool,
    pub was_approved: bool,
    /// Processing time in milliseconds
    pub response_time: u64,
    pub sent_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub escalation_triggered: bool,
}

impl AutoReplyResponse {
    /// One-line description for logs
    pub fn summary(&self) -> String {
        format!(
            "Intent: {} ({:.0}%), Template: {}, Platform: {}, Escalated: {}",
            self.intent.kind,
            self.intent.confidence * 100.0,
            self.template_used,
            self.platform,
            if self.escalation_triggered { "yes" } else { "no" }
        )
    }
}

/// Builds replies from a catalog.
#[derive(Clone)]
pub struct AutoResponder {
    classifier: IntentClassifier,
    filler: TemplateFiller,
    clock: Arc<dyn Clock>,
}

impl Default for AutoResponder {
    fn default() -> Self {
        Self::new(TemplateFiller::default(), Arc::new(SystemClock))
    }
}

impl AutoResponder {
    pub fn new(filler: TemplateFiller, clock: Arc<dyn Clock>) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            filler,
            clock,
        }
    }

    /// Pick the template for an intent: the suggested one if usable here,
    /// then any active template for the intent, then the general reply.
    fn select_template<'a>(
        &self,
        intent: &Intent,
        platform: Platform,
        catalog: &'a TemplateCatalog,
    ) -> Option<&'a ResponseTemplate> {
        let usable = |t: &&ResponseTemplate| t.is_active && t.platforms.contains(&platform);

        catalog
            .get(&intent.suggested_template)
            .filter(usable)
            .or_else(|| catalog.find_for(intent.kind, platform))
            .or_else(|| catalog.get(FALLBACK_TEMPLATE).filter(usable))
    }

    /// Classify `message` and compose the reply.
    ///
    /// Fails only when the catalog has no usable template at all.
    pub fn respond(
        &self,
        message: &InboundMessage,
        context: Option<&SenderContext>,
        catalog: &TemplateCatalog,
        platform: &PlatformConfig,
    ) -> Result<AutoReplyResponse, AppError> {
        let start = Instant::now();

        let intent = self.classifier.classify(&message.text, context);

        let template = self
            .select_template(&intent, message.platform, catalog)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "no active template for intent '{}' on {}",
                    intent.kind, message.platform
                ))
            })?;
        debug!(template = %template.id, intent = %intent.kind, "template selected");

        let filled = self.filler.fill(template, message);
        let toned = adapt_tone(&filled, intent.emotional_tone, context);
        let response = platform.enforce_length(toned);

        let escalation_triggered = intent.requires_human_escalation;
        if escalation_triggered {
            warn!(sender = %message.sender_id, platform = %message.platform, "message escalated to a human");
        }

        Ok(AutoReplyResponse {
            id: uuid::Uuid::new_v4().to_string(),
            original_message_id: message.id.clone(),
            sender_id: message.sender_id.clone(),
            platform: message.platform,
            tags: intent.tags.clone(),
            intent,
            response,
            template_used: template.id.clone(),
            was_edited: false,
            was_approved: platform.auto_approve && !escalation_triggered,
            response_time: start.elapsed().as_millis() as u64,
            sent_at: self.clock.now(),
            escalation_triggered,
        })
    }
}
