use crate::actors::messages::{AppError, AutoReplyStatus};
use crate::brain::{AutoReplyResponse, PlatformConfig, ResponseTemplate};
use crate::models::{InboundMessage, SenderContext};
use async_trait::async_trait;

/// Defines the public interface of the auto-reply engine.
///
/// The HTTP layer only sees this trait, so handlers can be exercised against a
/// stub without spawning the real actor.
#[async_trait]
pub trait AutoReplyService: Send + Sync + 'static {
    /// Classifies a message and returns the composed reply.
    async fn process_message(
        &self,
        message: InboundMessage,
        context: Option<SenderContext>,
    ) -> Result<AutoReplyResponse, AppError>;

    async fn list_templates(&self) -> Result<Vec<ResponseTemplate>, AppError>;

    /// Appends a template; ids must be unique.
    async fn add_template(&self, template: ResponseTemplate) -> Result<ResponseTemplate, AppError>;

    async fn set_template_active(&self, id: String, active: bool) -> Result<ResponseTemplate, AppError>;

    /// Pauses or resumes the whole system.
    async fn set_active(&self, active: bool) -> Result<AutoReplyStatus, AppError>;

    async fn update_platform(&self, config: PlatformConfig) -> Result<AutoReplyStatus, AppError>;

    async fn status(&self) -> Result<AutoReplyStatus, AppError>;
}
