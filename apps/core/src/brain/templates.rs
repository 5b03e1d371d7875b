//! Reply templates: the seeded catalog, placeholder filling and tone adaptation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use super::intent::{EmotionalTone, IntentType};
use crate::error::AppError;
use crate::models::{InboundMessage, Platform, SenderContext};
use crate::providers::{RandomSource, ThreadRandom};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Shipping,
    Orders,
    Drops,
    Complaints,
    Engagement,
    Vip,
    General,
    Support,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateTone {
    Friendly,
    Professional,
    Excited,
    Empathetic,
    Exclusive,
}

/// A canned reply with `{variable}` placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTemplate {
    #[validate(length(min = 1))]
    pub id: String,
    pub name: String,
    pub category: TemplateCategory,
    /// Intents this template may answer.
    #[validate(length(min = 1))]
    pub intents: Vec<IntentType>,
    /// Platforms this template may be sent on.
    #[validate(length(min = 1))]
    pub platforms: Vec<Platform>,
    #[validate(length(min = 1))]
    pub text: String,
    /// Placeholders the filler is allowed to resolve.
    #[serde(default)]
    pub variables: Vec<String>,
    pub tone: TemplateTone,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub success_rate: f32,
}

fn default_active() -> bool {
    true
}

impl ResponseTemplate {
    pub fn applies_to(&self, intent: IntentType, platform: Platform) -> bool {
        self.intents.contains(&intent) && self.platforms.contains(&platform)
    }
}

#[allow(clippy::too_many_arguments)]
fn stock_template(
    id: &str,
    name: &str,
    category: TemplateCategory,
    intents: &[IntentType],
    platforms: &[Platform],
    text: &str,
    variables: &[&str],
    tone: TemplateTone,
    success_rate: f32,
) -> ResponseTemplate {
    ResponseTemplate {
        id: id.to_string(),
        name: name.to_string(),
        category,
        intents: intents.to_vec(),
        platforms: platforms.to_vec(),
        text: text.to_string(),
        variables: variables.iter().map(|v| v.to_string()).collect(),
        tone,
        is_active: true,
        usage_count: 0,
        success_rate,
    }
}

/// The in-memory template store. Owned by the auto-reply actor.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<ResponseTemplate>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl TemplateCatalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self {
            templates: Vec::new(),
        }
    }

    /// The stock catalog, one template for every id the classifier suggests.
    pub fn seeded() -> Self {
        use IntentType::*;
        let all = &Platform::ALL;
        let templates = vec![
            stock_template(
                "shipping_info",
                "Shipping times",
                TemplateCategory::Shipping,
                &[Question],
                all,
                "Hey {name}! Orders ship within 1-2 business days. Track yours here: {tracking_link}",
                &["name", "tracking_link"],
                TemplateTone::Friendly,
                0.92,
            ),
            stock_template(
                "order_status",
                "Order status",
                TemplateCategory::Orders,
                &[OrderTracking],
                all,
                "Hi {name}! Order {order_number} is currently {status}. Follow it live: {tracking_link}",
                &["name", "order_number", "status", "tracking_link"],
                TemplateTone::Professional,
                0.88,
            ),
            stock_template(
                "drop_announcement",
                "Next drop",
                TemplateCategory::Drops,
                &[DropInquiry],
                all,
                "{name}, the next drop lands {drop_date}! Turn on notifications so you don't miss it",
                &["name", "drop_date"],
                TemplateTone::Excited,
                0.95,
            ),
            stock_template(
                "complaint_apology",
                "Complaint acknowledgement",
                TemplateCategory::Complaints,
                &[Complaint],
                all,
                "Hi {name}, we're really sorry about this. A team member will reach out shortly to make it right.",
                &["name"],
                TemplateTone::Empathetic,
                0.81,
            ),
            stock_template(
                "hype_thanks",
                "Thanks for the love",
                TemplateCategory::Engagement,
                &[Hype],
                all,
                "Thank you so much {name}! We love having you in the community",
                &["name"],
                TemplateTone::Excited,
                0.97,
            ),
            stock_template(
                "vip_hype",
                "VIP appreciation",
                TemplateCategory::Vip,
                &[Hype],
                all,
                "{name}, you're one of our favorite people! As a VIP you get early access to the drop on {drop_date}",
                &["name", "drop_date"],
                TemplateTone::Exclusive,
                0.98,
            ),
            stock_template(
                "support_handoff",
                "Support handoff",
                TemplateCategory::Support,
                &[Support, Confusion],
                &[Platform::Email, Platform::LiveChat],
                "Hi {name}, I'm connecting you with our support team now.",
                &["name"],
                TemplateTone::Professional,
                0.85,
            ),
            stock_template(
                "general_thanks",
                "General reply",
                TemplateCategory::General,
                &[General, Confusion, Request, ProductInfo, Support],
                all,
                "Thanks for reaching out {name}! We'll get back to you soon.",
                &["name"],
                TemplateTone::Friendly,
                0.75,
            ),
        ];
        Self { templates }
    }

    pub fn get(&self, id: &str) -> Option<&ResponseTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// First active template answering `intent` on `platform`.
    pub fn find_for(&self, intent: IntentType, platform: Platform) -> Option<&ResponseTemplate> {
        self.templates
            .iter()
            .find(|t| t.is_active && t.applies_to(intent, platform))
    }

    /// Appends a template. Ids are unique.
    pub fn add(&mut self, template: ResponseTemplate) -> Result<&ResponseTemplate, AppError> {
        template.validate()?;
        if self.get(&template.id).is_some() {
            return Err(AppError::Validation(format!(
                "template '{}' already exists",
                template.id
            )));
        }
        self.templates.push(template);
        self.templates
            .last()
            .ok_or_else(|| AppError::Internal("template vanished after insert".to_string()))
    }

    pub fn set_active(&mut self, id: &str, active: bool) -> Result<&ResponseTemplate, AppError> {
        let template = self
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound(format!("template '{}'", id)))?;
        template.is_active = active;
        Ok(template)
    }

    /// Bumps the usage counter of a template; unknown ids are ignored.
    pub fn record_usage(&mut self, id: &str) {
        if let Some(template) = self.templates.iter_mut().find(|t| t.id == id) {
            template.usage_count += 1;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResponseTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Literal values the filler substitutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillerSettings {
    pub tracking_link: String,
    pub drop_date: String,
    pub order_status: String,
}

impl Default for FillerSettings {
    fn default() -> Self {
        Self {
            tracking_link: "https://track.storepulse.app/orders".to_string(),
            drop_date: "Friday at 12PM EST".to_string(),
            order_status: "Shipped".to_string(),
        }
    }
}

const DEFAULT_NAME: &str = "there";

/// Resolves template placeholders for a concrete message.
#[derive(Clone)]
pub struct TemplateFiller {
    settings: FillerSettings,
    random: Arc<dyn RandomSource>,
}

impl Default for TemplateFiller {
    fn default() -> Self {
        Self::new(FillerSettings::default(), Arc::new(ThreadRandom))
    }
}

impl TemplateFiller {
    pub fn new(settings: FillerSettings, random: Arc<dyn RandomSource>) -> Self {
        Self { settings, random }
    }

    /// Display name derived from a sender handle: `sarah_styles` -> `sarah`.
    pub fn display_name(sender_id: &str) -> &str {
        sender_id
            .split('_')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_NAME)
    }

    fn value_for(&self, variable: &str, message: &InboundMessage) -> Option<String> {
        match variable {
            "name" => Some(Self::display_name(&message.sender_id).to_string()),
            "tracking_link" => Some(self.settings.tracking_link.clone()),
            "drop_date" => Some(self.settings.drop_date.clone()),
            "order_number" => Some(format!("#{}", self.random.order_number())),
            "status" => Some(self.settings.order_status.clone()),
            _ => None,
        }
    }

    /// Replaces the first occurrence of each declared, known variable.
    /// Anything else in braces is left as written.
    pub fn fill(&self, template: &ResponseTemplate, message: &InboundMessage) -> String {
        let mut text = template.text.clone();
        for variable in &template.variables {
            if let Some(value) = self.value_for(variable, message) {
                let placeholder = format!("{{{}}}", variable);
                text = text.replacen(&placeholder, &value, 1);
            }
        }
        text
    }
}

/// Decorates a reply for the sender and the detected tone.
/// The VIP crown always comes first, before any tone prefix.
pub fn adapt_tone(text: &str, tone: EmotionalTone, context: Option<&SenderContext>) -> String {
    let mut prefix = String::new();
    if context.is_some_and(|c| c.is_vip) {
        prefix.push_str("👑 ");
    }
    let suffix = match tone {
        EmotionalTone::Positive => " 😊",
        EmotionalTone::Excited => " 🔥",
        EmotionalTone::Negative => {
            prefix.push_str("I understand your concern. ");
            ""
        }
        EmotionalTone::Frustrated => {
            prefix.push_str("I'm so sorry for the trouble. ");
            ""
        }
        EmotionalTone::Neutral => "",
    };
    format!("{}{}{}", prefix, text, suffix)
}
