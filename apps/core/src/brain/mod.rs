//! # Brain Module
//!
//! Fast, rule-based auto-reply engine for StorePulse.
//! Classifies an inbound message and composes the reply BEFORE any human
//! sees it; only complaints are held back for review.
//!
//! ## Components
//! - `intent`: Intent classification using an ordered keyword rule table
//! - `templates`: Template catalog, placeholder filling, tone adaptation
//! - `platform`: Per-platform reply settings (length limit, approval, quota)
//! - `responder`: Main orchestrator producing the reply envelope

pub mod intent;
pub mod platform;
pub mod responder;
pub mod templates;

pub use intent::{EmotionalTone, Intent, IntentClassifier, IntentType, Urgency};
pub use platform::PlatformConfig;
pub use responder::{AutoReplyResponse, AutoResponder};
pub use templates::{
    adapt_tone, FillerSettings, ResponseTemplate, TemplateCatalog, TemplateCategory,
    TemplateFiller, TemplateTone,
};
