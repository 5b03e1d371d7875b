//! # Actors
//!
//! The auto-reply engine runs as a single tokio task that owns all mutable
//! state. Callers talk to it through [`AutoReplyHandle`], which implements
//! [`AutoReplyService`].

pub mod auto_reply;
pub mod messages;
pub mod traits;

pub use auto_reply::{AutoReplyHandle, AutoReplySettings};
pub use messages::{AutoReplyStats, AutoReplyStatus};
pub use traits::AutoReplyService;
