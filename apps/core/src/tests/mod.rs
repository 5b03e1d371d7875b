//! Test Module
//!
//! Cross-module suites for the StorePulse core. Unit tests live next to the
//! code they cover; these exercise the pieces together.
//!
//! ## Test Categories
//! - `brain_tests`: Intent rules, template filling and the responder pipeline
//! - `scoring_tests`: Churn risk, campaign health/fatigue, session labels
//! - `actor_tests`: Auto-reply actor state, quotas and timeouts
//! - `web_tests`: HTTP routes driven through the axum router

pub mod scoring_tests;
