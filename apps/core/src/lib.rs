//! StorePulse core: rule-based heuristics behind the store dashboard.
//!
//! - [`brain`]: auto-reply intent classification and template replies
//! - [`scoring`]: churn risk, campaign health and session behavior
//! - [`actors`]: the auto-reply actor owning catalog and quotas
//! - [`web`]: axum router exposing everything over JSON

pub mod actors;
pub mod brain;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod rate_limiter;
pub mod scoring;
pub mod telemetry;
pub mod web;

#[cfg(test)]
mod tests;
