use crate::actors::messages::{AppError, AutoReplyMessage, AutoReplyStats, AutoReplyStatus};
use crate::actors::traits::AutoReplyService;
use crate::brain::{
    AutoReplyResponse, AutoResponder, PlatformConfig, ResponseTemplate, TemplateCatalog,
    TemplateFiller,
};
use crate::models::{InboundMessage, Platform, SenderContext};
use crate::providers::{Clock, SystemClock};
use crate::rate_limiter::RateLimiter;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument, warn};

/// Everything the actor starts with.
#[derive(Clone)]
pub struct AutoReplySettings {
    pub active: bool,
    pub catalog: TemplateCatalog,
    pub platforms: Vec<PlatformConfig>,
    pub filler: TemplateFiller,
    pub clock: Arc<dyn Clock>,
    /// How long a caller waits for the actor before giving up.
    pub call_timeout: Duration,
}

impl Default for AutoReplySettings {
    fn default() -> Self {
        Self {
            active: true,
            catalog: TemplateCatalog::seeded(),
            platforms: Platform::ALL
                .iter()
                .map(|p| PlatformConfig::default_for(*p))
                .collect(),
            filler: TemplateFiller::default(),
            clock: Arc::new(SystemClock),
            call_timeout: Duration::from_secs(5),
        }
    }
}

/// A handle to the auto-reply actor.
///
/// The actor is the single owner of the template catalog, the active flag,
/// the platform settings and the rate limiter; every mutation goes through
/// its mailbox, one message at a time.
#[derive(Clone)]
pub struct AutoReplyHandle {
    sender: mpsc::Sender<AutoReplyMessage>,
    call_timeout: Duration,
}

impl AutoReplyHandle {
    /// Spawns the actor on the current tokio runtime and returns a handle to it.
    pub fn spawn(settings: AutoReplySettings) -> Self {
        let (sender, receiver) = mpsc::channel(64);
        let call_timeout = settings.call_timeout;
        let runner = AutoReplyRunner::new(receiver, settings);
        tokio::spawn(async move { runner.run().await });
        Self {
            sender,
            call_timeout,
        }
    }

    /// A handle whose mailbox is never served; the caller holds the receiver.
    #[cfg(test)]
    pub(crate) fn unattended(call_timeout: Duration) -> (Self, mpsc::Receiver<AutoReplyMessage>) {
        let (sender, receiver) = mpsc::channel(64);
        (
            Self {
                sender,
                call_timeout,
            },
            receiver,
        )
    }

    /// Sends a message built around a fresh oneshot and waits for the answer.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> AutoReplyMessage,
    ) -> Result<T, AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(build(send))
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(self.call_timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))
    }

    /// Asks the actor to stop after the messages already queued.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(AutoReplyMessage::Shutdown)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))
    }
}

#[async_trait]
impl AutoReplyService for AutoReplyHandle {
    #[instrument(skip(self, message, context), fields(sender = %message.sender_id, platform = %message.platform))]
    async fn process_message(
        &self,
        message: InboundMessage,
        context: Option<SenderContext>,
    ) -> Result<AutoReplyResponse, AppError> {
        self.request(|responder| AutoReplyMessage::ProcessMessage {
            message,
            context,
            responder,
        })
        .await?
    }

    async fn list_templates(&self) -> Result<Vec<ResponseTemplate>, AppError> {
        self.request(|responder| AutoReplyMessage::ListTemplates { responder })
            .await
    }

    #[instrument(skip(self, template), fields(template = %template.id))]
    async fn add_template(&self, template: ResponseTemplate) -> Result<ResponseTemplate, AppError> {
        self.request(|responder| AutoReplyMessage::AddTemplate {
            template,
            responder,
        })
        .await?
    }

    #[instrument(skip(self))]
    async fn set_template_active(&self, id: String, active: bool) -> Result<ResponseTemplate, AppError> {
        self.request(|responder| AutoReplyMessage::SetTemplateActive {
            id,
            active,
            responder,
        })
        .await?
    }

    #[instrument(skip(self))]
    async fn set_active(&self, active: bool) -> Result<AutoReplyStatus, AppError> {
        self.request(|responder| AutoReplyMessage::SetActive { active, responder })
            .await
    }

    #[instrument(skip(self, config), fields(platform = %config.platform))]
    async fn update_platform(&self, config: PlatformConfig) -> Result<AutoReplyStatus, AppError> {
        self.request(|responder| AutoReplyMessage::UpdatePlatform { config, responder })
            .await
    }

    async fn status(&self) -> Result<AutoReplyStatus, AppError> {
        self.request(|responder| AutoReplyMessage::GetStatus { responder })
            .await
    }
}

// --- Actor Runner ---
struct AutoReplyRunner {
    receiver: mpsc::Receiver<AutoReplyMessage>,
    responder: AutoResponder,
    catalog: TemplateCatalog,
    active: bool,
    platforms: BTreeMap<Platform, PlatformConfig>,
    limiter: RateLimiter,
    stats: AutoReplyStats,
}

impl AutoReplyRunner {
    fn new(receiver: mpsc::Receiver<AutoReplyMessage>, settings: AutoReplySettings) -> Self {
        let mut platforms: BTreeMap<Platform, PlatformConfig> = Platform::ALL
            .iter()
            .map(|p| (*p, PlatformConfig::default_for(*p)))
            .collect();
        for config in settings.platforms {
            platforms.insert(config.platform, config);
        }
        Self {
            receiver,
            responder: AutoResponder::new(settings.filler, settings.clock),
            catalog: settings.catalog,
            active: settings.active,
            platforms,
            limiter: RateLimiter::hourly(),
            stats: AutoReplyStats::default(),
        }
    }

    async fn run(mut self) {
        info!(templates = self.catalog.len(), active = self.active, "Auto-reply actor started");
        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, AutoReplyMessage::Shutdown) {
                break;
            }
            self.handle_message(msg);
        }
        info!("Auto-reply actor stopped");
    }

    fn status(&self) -> AutoReplyStatus {
        AutoReplyStatus {
            active: self.active,
            stats: self.stats.clone(),
            template_count: self.catalog.len(),
            active_template_count: self.catalog.iter().filter(|t| t.is_active).count(),
            platforms: self.platforms.values().cloned().collect(),
        }
    }

    fn handle_message(&mut self, msg: AutoReplyMessage) {
        match msg {
            AutoReplyMessage::ProcessMessage {
                message,
                context,
                responder,
            } => {
                let result = self.handle_inbound(message, context);
                if let Err(e) = &result {
                    if !matches!(e, AppError::RateLimited(_) | AppError::Unavailable(_)) {
                        error!("Error processing inbound message: {:?}", e);
                    }
                }
                let _ = responder.send(result);
            }
            AutoReplyMessage::ListTemplates { responder } => {
                let _ = responder.send(self.catalog.iter().cloned().collect());
            }
            AutoReplyMessage::AddTemplate {
                template,
                responder,
            } => {
                let result = self.catalog.add(template).cloned();
                if let Ok(t) = &result {
                    info!(template = %t.id, "template added");
                }
                let _ = responder.send(result);
            }
            AutoReplyMessage::SetTemplateActive {
                id,
                active,
                responder,
            } => {
                let result = self.catalog.set_active(&id, active).cloned();
                let _ = responder.send(result);
            }
            AutoReplyMessage::SetActive { active, responder } => {
                if self.active != active {
                    info!(active, "auto-reply system toggled");
                }
                self.active = active;
                let _ = responder.send(self.status());
            }
            AutoReplyMessage::UpdatePlatform { config, responder } => {
                info!(platform = %config.platform, enabled = config.enabled, "platform settings updated");
                self.platforms.insert(config.platform, config);
                let _ = responder.send(self.status());
            }
            AutoReplyMessage::GetStatus { responder } => {
                let _ = responder.send(self.status());
            }
            AutoReplyMessage::Shutdown => {}
        }
    }

    fn handle_inbound(
        &mut self,
        message: InboundMessage,
        context: Option<SenderContext>,
    ) -> Result<AutoReplyResponse, AppError> {
        self.stats.total_received += 1;

        if !self.active {
            self.stats.skipped += 1;
            return Err(AppError::Unavailable("auto-reply is paused".to_string()));
        }

        let config = self
            .platforms
            .get(&message.platform)
            .cloned()
            .unwrap_or_else(|| PlatformConfig::default_for(message.platform));
        if !config.enabled {
            self.stats.skipped += 1;
            return Err(AppError::Unavailable(format!(
                "auto-reply is disabled on {}",
                message.platform
            )));
        }

        let key = format!("{}:{}", message.platform, message.sender_id);
        if !self.limiter.allows(&key, config.replies_per_hour) {
            self.stats.rate_limited += 1;
            warn!(sender = %key, limit = config.replies_per_hour, "reply quota exhausted");
            return Err(AppError::RateLimited(key));
        }

        let reply = self
            .responder
            .respond(&message, context.as_ref(), &self.catalog, &config)?;
        // Only replies actually produced count against the quota
        self.limiter.record(&key);
        self.catalog.record_usage(&reply.template_used);
        self.stats
            .record_reply(reply.response_time, reply.escalation_triggered);
        info!("{}", reply.summary());

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::IntentType;

    #[tokio::test]
    async fn test_process_and_count_usage() {
        let handle = AutoReplyHandle::spawn(AutoReplySettings::default());
        let msg = InboundMessage::new("sarah_styles", Platform::Instagram, "when does it ship?");

        let reply = handle.process_message(msg, None).await.unwrap();
        assert_eq!(reply.intent.kind, IntentType::Question);

        let templates = handle.list_templates().await.unwrap();
        let used = templates.iter().find(|t| t.id == "shipping_info").unwrap();
        assert_eq!(used.usage_count, 1);

        let status = handle.status().await.unwrap();
        assert_eq!(status.stats.total_received, 1);
        assert_eq!(status.stats.total_replied, 1);
    }

    #[tokio::test]
    async fn test_paused_system_is_unavailable() {
        let handle = AutoReplyHandle::spawn(AutoReplySettings::default());
        let status = handle.set_active(false).await.unwrap();
        assert!(!status.active);

        let msg = InboundMessage::new("sarah", Platform::Instagram, "hi");
        let err = handle.process_message(msg, None).await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable(_)));
        assert_eq!(handle.status().await.unwrap().stats.skipped, 1);
    }

    #[tokio::test]
    async fn test_handle_fails_after_shutdown() {
        let handle = AutoReplyHandle::spawn(AutoReplySettings::default());
        handle.shutdown().await.unwrap();
        // Give the runner a chance to drain and drop the receiver
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        let err = handle.status().await.unwrap_err();
        assert!(matches!(err, AppError::Actor(_)));
    }
}
