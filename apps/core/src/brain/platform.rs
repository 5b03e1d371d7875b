//! Per-platform reply settings.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Platform;

const ELLIPSIS: &str = "...";

/// How the auto-reply engine behaves on one platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    pub platform: Platform,
    pub enabled: bool,
    /// Hard cap on reply length in characters. `None` means unlimited.
    /// Must leave room for at least one character before the ellipsis.
    #[validate(range(min = 4))]
    pub max_response_length: Option<usize>,
    /// Replies go out without human review unless escalated.
    pub auto_approve: bool,
    /// Automatic replies allowed per sender per hour.
    pub replies_per_hour: usize,
}

impl PlatformConfig {
    /// Defaults for a platform.
    pub fn default_for(platform: Platform) -> Self {
        let (max_response_length, replies_per_hour) = match platform {
            Platform::Instagram => (Some(1000), 10),
            Platform::Whatsapp => (Some(4096), 20),
            Platform::Email => (None, 5),
            Platform::LiveChat => (Some(500), 30),
        };
        Self {
            platform,
            enabled: true,
            max_response_length,
            auto_approve: true,
            replies_per_hour,
        }
    }

    /// Truncates `text` to `max_response_length - 3` characters plus an
    /// ellipsis when it is longer than the limit.
    pub fn enforce_length(&self, text: String) -> String {
        match self.max_response_length {
            Some(max) if text.chars().count() > max => {
                let mut truncated: String = text.chars().take(max.saturating_sub(3)).collect();
                truncated.push_str(ELLIPSIS);
                truncated
            }
            _ => text,
        }
    }
}
