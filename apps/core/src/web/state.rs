//! Shared state handed to every handler.

use std::sync::Arc;

use crate::actors::AutoReplyService;
use crate::scoring::{CampaignScorer, VipAnalyzer};

/// Created once at startup. Scorers are stateless apart from their injected
/// clock and history source, so handlers use them directly.
#[derive(Clone)]
pub struct AppState {
    pub auto_reply: Arc<dyn AutoReplyService>,
    pub vip: VipAnalyzer,
    pub campaigns: CampaignScorer,
}

impl AppState {
    pub fn new(auto_reply: Arc<dyn AutoReplyService>) -> Self {
        Self {
            auto_reply,
            vip: VipAnalyzer::default(),
            campaigns: CampaignScorer::default(),
        }
    }

    pub fn with_vip(mut self, vip: VipAnalyzer) -> Self {
        self.vip = vip;
        self
    }

    pub fn with_campaigns(mut self, campaigns: CampaignScorer) -> Self {
        self.campaigns = campaigns;
        self
    }
}
