//! Intent Classification for inbound customer messages.
//!
//! An ordered rule table of keyword groups; the first group that matches
//! decides the intent. Matching is plain substring matching on the
//! lowercased message, compiled to one regex per group.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::models::SenderContext;

/// Detected intent type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    /// Shipping and delivery questions
    Question,
    /// Something went wrong with a product or order
    Complaint,
    /// Enthusiasm about the brand or a product
    Hype,
    Confusion,
    Request,
    /// Where is my package
    OrderTracking,
    ProductInfo,
    Support,
    /// Upcoming drops and restocks
    DropInquiry,
    /// Nothing recognised
    General,
}

impl fmt::Display for IntentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl IntentType {
    pub fn label(&self) -> &'static str {
        match self {
            IntentType::Question => "question",
            IntentType::Complaint => "complaint",
            IntentType::Hype => "hype",
            IntentType::Confusion => "confusion",
            IntentType::Request => "request",
            IntentType::OrderTracking => "order_tracking",
            IntentType::ProductInfo => "product_info",
            IntentType::Support => "support",
            IntentType::DropInquiry => "drop_inquiry",
            IntentType::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalTone {
    Positive,
    Negative,
    Neutral,
    Excited,
    Frustrated,
}

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    #[serde(rename = "type")]
    pub kind: IntentType,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    pub urgency: Urgency,
    pub emotional_tone: EmotionalTone,
    pub requires_human_escalation: bool,
    /// Id of the catalog template best suited to answer
    pub suggested_template: String,
    pub tags: Vec<String>,
}

/// Confidence bonus for VIP senders.
const VIP_CONFIDENCE_BOOST: f32 = 0.1;

const GENERAL_CONFIDENCE: f32 = 0.7;
const GENERAL_TEMPLATE: &str = "general_thanks";
const VIP_HYPE_TEMPLATE: &str = "vip_hype";

/// What a rule produces when it fires.
struct RuleOutcome {
    kind: IntentType,
    confidence: f32,
    urgency: Urgency,
    tone: EmotionalTone,
    escalate: bool,
    template: &'static str,
    tags: &'static [&'static str],
}

/// One row of the rule table
struct IntentRule {
    name: &'static str,
    pattern: &'static LazyLock<Regex>,
    outcome: RuleOutcome,
}

fn keyword_regex(keywords: &[&str]) -> Result<Regex, regex::Error> {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation)
}

// Compile patterns once at startup. The inputs are escaped literals, so
// compilation can only fail on a programming error.
static SHIPPING_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&["ship", "deliver", "arrive"]).expect("Invalid regex: shipping keywords")
});

static TRACKING_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&["track", "where is my order", "order status"])
        .expect("Invalid regex: tracking keywords")
});

static DROP_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&["drop", "release", "restock", "🔥"]).expect("Invalid regex: drop keywords")
});

static COMPLAINT_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&["problem", "issue", "wrong", "broken", "damaged"])
        .expect("Invalid regex: complaint keywords")
});

static HYPE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&["love", "fire", "amazing", "obsessed"]).expect("Invalid regex: hype keywords")
});

/// Evaluation order is part of the contract: "problem with my order tracking"
/// is order_tracking because tracking is tested before complaints.
static RULES: [IntentRule; 5] = [
    IntentRule {
        name: "shipping",
        pattern: &SHIPPING_KEYWORDS,
        outcome: RuleOutcome {
            kind: IntentType::Question,
            confidence: 0.9,
            urgency: Urgency::Low,
            tone: EmotionalTone::Neutral,
            escalate: false,
            template: "shipping_info",
            tags: &["shipping"],
        },
    },
    IntentRule {
        name: "tracking",
        pattern: &TRACKING_KEYWORDS,
        outcome: RuleOutcome {
            kind: IntentType::OrderTracking,
            confidence: 0.95,
            urgency: Urgency::Medium,
            tone: EmotionalTone::Neutral,
            escalate: false,
            template: "order_status",
            tags: &["order_tracking"],
        },
    },
    IntentRule {
        name: "drop",
        pattern: &DROP_KEYWORDS,
        outcome: RuleOutcome {
            kind: IntentType::DropInquiry,
            confidence: 0.9,
            urgency: Urgency::Medium,
            tone: EmotionalTone::Excited,
            escalate: false,
            template: "drop_announcement",
            tags: &["drop", "hype"],
        },
    },
    IntentRule {
        name: "complaint",
        pattern: &COMPLAINT_KEYWORDS,
        outcome: RuleOutcome {
            kind: IntentType::Complaint,
            confidence: 0.85,
            urgency: Urgency::High,
            tone: EmotionalTone::Negative,
            escalate: true,
            template: "complaint_apology",
            tags: &["complaint", "escalation"],
        },
    },
    IntentRule {
        name: "hype",
        pattern: &HYPE_KEYWORDS,
        outcome: RuleOutcome {
            kind: IntentType::Hype,
            confidence: 0.95,
            urgency: Urgency::Low,
            tone: EmotionalTone::Positive,
            escalate: false,
            template: "hype_thanks",
            tags: &["hype"],
        },
    },
];

/// Intent classifier over the fixed rule table
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Name of the first rule matching `message`, if any.
    pub fn matching_rule(&self, message: &str) -> Option<&'static str> {
        let text = message.to_lowercase();
        RULES
            .iter()
            .find(|rule| rule.pattern.is_match(&text))
            .map(|rule| rule.name)
    }

    /// Classify a message. Never fails; unmatched text is `General`.
    pub fn classify(&self, message: &str, context: Option<&SenderContext>) -> Intent {
        let text = message.to_lowercase();
        let is_vip = context.is_some_and(|c| c.is_vip);

        let mut intent = match RULES.iter().find(|rule| rule.pattern.is_match(&text)) {
            Some(rule) => {
                let o = &rule.outcome;
                let template = if o.kind == IntentType::Hype && is_vip {
                    VIP_HYPE_TEMPLATE
                } else {
                    o.template
                };
                Intent {
                    kind: o.kind,
                    confidence: o.confidence,
                    urgency: o.urgency,
                    emotional_tone: o.tone,
                    requires_human_escalation: o.escalate,
                    suggested_template: template.to_string(),
                    tags: o.tags.iter().map(|t| t.to_string()).collect(),
                }
            }
            None => Intent {
                kind: IntentType::General,
                confidence: GENERAL_CONFIDENCE,
                urgency: Urgency::Low,
                emotional_tone: EmotionalTone::Neutral,
                requires_human_escalation: false,
                suggested_template: GENERAL_TEMPLATE.to_string(),
                tags: vec![],
            },
        };

        if let Some(ctx) = context {
            if ctx.is_vip {
                // Capped at 1.0; a boost can never push below the rule's base value.
                intent.confidence = (intent.confidence + VIP_CONFIDENCE_BOOST).min(1.0);
                intent.tags.push("vip".to_string());
            }
            if ctx.has_recent_order {
                intent.tags.push("returning_customer".to_string());
            }
        }

        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_question() {
        let result = IntentClassifier::new().classify("when does it ship?", None);
        assert_eq!(result.kind, IntentType::Question);
        assert!(result.tags.contains(&"shipping".to_string()));
        assert_eq!(result.suggested_template, "shipping_info");
    }

    #[test]
    fn test_complaint_escalates() {
        let result = IntentClassifier::new().classify("I have a problem with my order", None);
        assert_eq!(result.kind, IntentType::Complaint);
        assert!(result.requires_human_escalation);
        assert_eq!(result.urgency, Urgency::High);
        assert_eq!(result.emotional_tone, EmotionalTone::Negative);
    }

    #[test]
    fn test_tracking_precedes_complaint() {
        let result =
            IntentClassifier::new().classify("problem with my order tracking", None);
        assert_eq!(result.kind, IntentType::OrderTracking);
        assert!(!result.requires_human_escalation);
    }

    #[test]
    fn test_fire_emoji_is_drop_inquiry() {
        let result = IntentClassifier::new().classify("🔥🔥🔥", None);
        assert_eq!(result.kind, IntentType::DropInquiry);
        assert_eq!(result.emotional_tone, EmotionalTone::Excited);
    }

    #[test]
    fn test_vip_hype_routes_to_vip_template() {
        let classifier = IntentClassifier::new();
        let plain = classifier.classify("I LOVE this hoodie", None);
        assert_eq!(plain.suggested_template, "hype_thanks");

        let vip = classifier.classify("I LOVE this hoodie", Some(&SenderContext::vip()));
        assert_eq!(vip.kind, IntentType::Hype);
        assert_eq!(vip.suggested_template, "vip_hype");
        assert!(vip.tags.contains(&"vip".to_string()));
    }

    #[test]
    fn test_empty_and_unmatched_are_general() {
        let classifier = IntentClassifier::new();
        for text in ["", "   ", "hello there", "¿qué tal?"] {
            let result = classifier.classify(text, None);
            assert_eq!(result.kind, IntentType::General, "for {:?}", text);
            assert!((result.confidence - 0.7).abs() < f32::EPSILON);
            assert!(result.tags.is_empty());
        }
        assert_eq!(classifier.matching_rule(""), None);
    }

    #[test]
    fn test_vip_boost_is_capped_and_never_lowers() {
        let classifier = IntentClassifier::new();
        let base = classifier.classify("where is my order?", None);
        let boosted = classifier.classify("where is my order?", Some(&SenderContext::vip()));
        assert!(boosted.confidence >= base.confidence);
        assert!(boosted.confidence <= 1.0);

        let general = classifier.classify("hi", Some(&SenderContext::vip()));
        assert!((general.confidence - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_recent_order_only_adds_tag() {
        let ctx = SenderContext {
            has_recent_order: true,
            ..SenderContext::default()
        };
        let classifier = IntentClassifier::new();
        let with_ctx = classifier.classify("this is amazing", Some(&ctx));
        let without = classifier.classify("this is amazing", None);
        assert_eq!(with_ctx.kind, without.kind);
        assert_eq!(with_ctx.confidence, without.confidence);
        assert_eq!(with_ctx.tags, vec!["hype", "returning_customer"]);
    }

    #[test]
    fn test_serialized_shape() {
        let result = IntentClassifier::new().classify("when will it deliver", None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "question");
        assert_eq!(json["emotionalTone"], "neutral");
        assert_eq!(json["requiresHumanEscalation"], false);
        assert_eq!(json["suggestedTemplate"], "shipping_info");
    }
}
