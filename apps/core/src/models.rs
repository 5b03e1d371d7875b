use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

// --- Auto-reply ---

/// A social or support channel a message can arrive on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    Whatsapp,
    Email,
    LiveChat,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Instagram,
        Platform::Whatsapp,
        Platform::Email,
        Platform::LiveChat,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Whatsapp => "whatsapp",
            Platform::Email => "email",
            Platform::LiveChat => "live_chat",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Represents an inbound message waiting for an automatic reply.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    /// Unique identifier of the message (UUID when generated server-side).
    pub id: String,
    /// Platform handle of the sender, e.g. `sarah_styles`.
    #[validate(length(min = 1))]
    pub sender_id: String,
    pub platform: Platform,
    /// Raw message text. May be empty.
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    /// Creates a message stamped with a fresh id and the current time.
    pub fn new(sender_id: impl Into<String>, platform: Platform, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id: sender_id.into(),
            platform,
            text: text.into(),
            received_at: Utc::now(),
        }
    }
}

/// Marketing temperature of a sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSegment {
    #[default]
    Cold,
    Warm,
    Hot,
    Vip,
}

/// Looked-up attributes of a message sender. Read-only to the classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SenderContext {
    pub is_vip: bool,
    pub is_first_time: bool,
    pub has_recent_order: bool,
    pub has_commented_before: bool,
    pub interaction_count: u32,
    pub segment: CustomerSegment,
}

impl SenderContext {
    /// Context for a VIP sender; everything else default.
    pub fn vip() -> Self {
        Self {
            is_vip: true,
            segment: CustomerSegment::Vip,
            ..Self::default()
        }
    }
}

// --- VIP / churn ---

/// Loyalty tier of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Platinum,
    Gold,
    Silver,
    Bronze,
}

/// Represents a customer as seen by the VIP intelligence module.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[validate(range(min = 0.0))]
    pub total_spent: f64,
    pub order_count: u32,
    pub last_purchase: DateTime<Utc>,
    #[validate(range(min = 0.0))]
    pub average_order_value: f64,
    #[validate(range(min = 0.0))]
    pub lifetime_value: f64,
    /// Satisfaction on a 0-10 scale.
    #[validate(range(min = 0.0, max = 10.0))]
    pub satisfaction_score: f64,
    pub tier: Tier,
}

// --- Campaigns ---

/// Ad network a campaign runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdPlatform {
    Facebook,
    Instagram,
    Google,
    Tiktok,
}

/// Raw delivery numbers of an ad campaign. Ratios are derived on demand.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub platform: AdPlatform,
    #[validate(range(min = 0.0))]
    pub budget: f64,
    #[validate(range(min = 0.0))]
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    #[validate(range(min = 0.0))]
    pub revenue: f64,
    /// Average number of times a person saw the ad.
    #[validate(range(min = 0.0))]
    pub frequency: f64,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

impl Campaign {
    /// Return on ad spend (revenue / spend).
    pub fn roas(&self) -> f64 {
        ratio(self.revenue, self.spend)
    }

    /// Click-through rate in percent.
    pub fn ctr(&self) -> f64 {
        ratio(self.clicks as f64, self.impressions as f64) * 100.0
    }

    /// Cost per thousand impressions.
    pub fn cpm(&self) -> f64 {
        ratio(self.spend, self.impressions as f64) * 1000.0
    }

    /// Cost per click.
    pub fn cpc(&self) -> f64 {
        ratio(self.spend, self.clicks as f64)
    }

    /// Conversions per click, in percent.
    pub fn conversion_rate(&self) -> f64 {
        ratio(self.conversions as f64, self.clicks as f64) * 100.0
    }

    /// Share of the budget already spent, in percent.
    pub fn budget_utilization(&self) -> f64 {
        ratio(self.spend, self.budget) * 100.0
    }
}

// --- Web analytics ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficSource {
    Direct,
    Organic,
    Paid,
    Social,
    Email,
    Referral,
}

/// One visitor session on the storefront.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WebSession {
    #[validate(length(min = 1))]
    pub id: String,
    pub device: DeviceType,
    pub source: TrafficSource,
    pub duration_seconds: u32,
    /// Deepest scroll position reached, 0-100.
    #[validate(range(min = 0.0, max = 100.0))]
    pub scroll_depth: f64,
    #[serde(default)]
    pub rage_clicks: u32,
    #[serde(default)]
    pub exited: bool,
    #[serde(default)]
    pub converted: bool,
}
