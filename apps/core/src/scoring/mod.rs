//! # Scoring Module
//!
//! Weighted-threshold heuristics behind the CRM, ads and analytics views.
//! Every function here is pure: value in, value out, never an error.
//!
//! ## Components
//! - `churn`: Churn-risk score and VIP intelligence (predictions, recommendations, metrics)
//! - `campaign`: Ad campaign health and fatigue
//! - `session`: Web session behavior labels and engagement score

pub mod campaign;
pub mod churn;
pub mod session;

pub use campaign::{
    fatigue_score, health_score, CampaignReport, CampaignScorer, FatigueAssessment,
    FixedCtrTrend, HealthStatus, HistoricalCtrProvider, NoCtrHistory,
};
pub use churn::{
    churn_risk, ChurnPrediction, CustomerAnalysis, Recommendation, RiskLevel, VipAnalyzer,
    VipMetrics,
};
pub use session::{
    behavior_score, labels, summarize, BehaviorLabel, SessionAssessment, SessionInsights,
};
