use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::brain::{AutoReplyResponse, PlatformConfig, ResponseTemplate};
use crate::models::{InboundMessage, SenderContext};

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Running counters of the auto-reply actor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoReplyStats {
    /// Every message handed to the actor.
    pub total_received: u64,
    /// Messages that produced a reply.
    pub total_replied: u64,
    /// Replies held back for a human.
    pub escalations: u64,
    /// Messages refused by the per-sender limiter.
    pub rate_limited: u64,
    /// Messages ignored because the system or platform was switched off.
    pub skipped: u64,
    pub average_response_time_ms: f64,
}

impl AutoReplyStats {
    pub fn record_reply(&mut self, response_time_ms: u64, escalated: bool) {
        self.total_replied += 1;
        if escalated {
            self.escalations += 1;
        }
        let n = self.total_replied as f64;
        self.average_response_time_ms += (response_time_ms as f64 - self.average_response_time_ms) / n;
    }
}

/// Snapshot returned by status queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoReplyStatus {
    pub active: bool,
    pub stats: AutoReplyStats,
    pub template_count: usize,
    pub active_template_count: usize,
    pub platforms: Vec<PlatformConfig>,
}

/// Messages that can be sent to the auto-reply actor.
#[derive(Debug)]
pub enum AutoReplyMessage {
    /// Classify a message and compose the reply.
    ProcessMessage {
        message: InboundMessage,
        context: Option<SenderContext>,
        /// A channel to send the reply envelope back.
        responder: oneshot::Sender<Result<AutoReplyResponse, AppError>>,
    },
    /// A snapshot of the whole template catalog.
    ListTemplates {
        responder: oneshot::Sender<Vec<ResponseTemplate>>,
    },
    /// Append a template to the catalog.
    AddTemplate {
        template: ResponseTemplate,
        responder: oneshot::Sender<Result<ResponseTemplate, AppError>>,
    },
    /// Enable or disable one template.
    SetTemplateActive {
        id: String,
        active: bool,
        responder: oneshot::Sender<Result<ResponseTemplate, AppError>>,
    },
    /// Pause or resume the whole auto-reply system.
    SetActive {
        active: bool,
        responder: oneshot::Sender<AutoReplyStatus>,
    },
    /// Replace the settings of one platform.
    UpdatePlatform {
        config: PlatformConfig,
        responder: oneshot::Sender<AutoReplyStatus>,
    },
    GetStatus {
        responder: oneshot::Sender<AutoReplyStatus>,
    },
    /// A command to stop the actor.
    Shutdown,
}
