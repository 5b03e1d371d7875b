//! Campaign health and ad-fatigue scoring.
//!
//! Health rewards ROAS and CTR and penalizes frequency. Fatigue needs a CTR
//! trend which only an analytics feed can provide, so it is read through
//! [`HistoricalCtrProvider`].

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::Campaign;
use crate::providers::{Clock, SystemClock};

// Health weights
const ROAS_WEIGHT: f64 = 0.4;
const CTR_WEIGHT: f64 = 0.3;
const FREQUENCY_WEIGHT: f64 = 0.3;

// Fatigue rules
const FATIGUE_FREQUENCY: f64 = 3.0;
const FATIGUE_FREQUENCY_POINTS: u32 = 40;
const CTR_DECLINE_THRESHOLD: f64 = -0.5;
const CTR_DECLINE_POINTS: u32 = 30;

/// Fatigue scores at or above this mark the campaign as fatigued.
pub const FATIGUED_AT: u8 = 40;

/// Weighted health 0-100 from raw ratios. `ctr` is in percent.
pub fn health_score(roas: f64, ctr: f64, frequency: f64) -> u8 {
    let roas_part = (roas * 20.0).min(100.0) * ROAS_WEIGHT;
    let ctr_part = (ctr * 10.0).min(100.0) * CTR_WEIGHT;
    let frequency_part = (100.0 - frequency * 20.0).max(0.0) * FREQUENCY_WEIGHT;
    (roas_part + ctr_part + frequency_part).round().clamp(0.0, 100.0) as u8
}

/// Fatigue 0-100 from frequency and an optional CTR decline (relative change).
pub fn fatigue_score(frequency: f64, ctr_decline: Option<f64>) -> u8 {
    let mut score = 0;
    if frequency > FATIGUE_FREQUENCY {
        score += FATIGUE_FREQUENCY_POINTS;
    }
    if ctr_decline.is_some_and(|d| d < CTR_DECLINE_THRESHOLD) {
        score += CTR_DECLINE_POINTS;
    }
    score.min(100) as u8
}

/// Supplies the CTR trend of a campaign, e.g. -0.6 for a 60% drop.
pub trait HistoricalCtrProvider: Send + Sync {
    /// `None` when no history is available.
    fn ctr_decline(&self, campaign: &Campaign) -> Option<f64>;
}

/// No history: the CTR-decline rule never fires.
// TODO: back this with the ad-platform insights feed once daily CTR per campaign is stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCtrHistory;

impl HistoricalCtrProvider for NoCtrHistory {
    fn ctr_decline(&self, _campaign: &Campaign) -> Option<f64> {
        None
    }
}

/// Reports the same decline for every campaign.
#[derive(Debug, Clone, Copy)]
pub struct FixedCtrTrend(pub f64);

impl HistoricalCtrProvider for FixedCtrTrend {
    fn ctr_decline(&self, _campaign: &Campaign) -> Option<f64> {
        Some(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Good,
    NeedsAttention,
    Critical,
}

impl HealthStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => HealthStatus::Excellent,
            60..=79 => HealthStatus::Good,
            40..=59 => HealthStatus::NeedsAttention,
            _ => HealthStatus::Critical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatigueAssessment {
    pub score: u8,
    pub is_fatigued: bool,
    /// Day the frequency is expected to cross the fatigue line.
    pub forecast_date: Option<NaiveDate>,
}

/// Full scoring output for one campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignReport {
    pub campaign_id: String,
    pub roas: f64,
    pub ctr: f64,
    pub cpm: f64,
    pub cpc: f64,
    pub conversion_rate: f64,
    pub budget_utilization: f64,
    pub health_score: u8,
    pub health_status: HealthStatus,
    pub fatigue: FatigueAssessment,
}

/// Scores campaigns against a CTR history source.
#[derive(Clone)]
pub struct CampaignScorer {
    history: Arc<dyn HistoricalCtrProvider>,
    clock: Arc<dyn Clock>,
}

impl Default for CampaignScorer {
    fn default() -> Self {
        Self::new(Arc::new(NoCtrHistory), Arc::new(SystemClock))
    }
}

impl CampaignScorer {
    pub fn new(history: Arc<dyn HistoricalCtrProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { history, clock }
    }

    pub fn health_score(&self, campaign: &Campaign) -> u8 {
        health_score(campaign.roas(), campaign.ctr(), campaign.frequency)
    }

    pub fn fatigue_score(&self, campaign: &Campaign) -> u8 {
        fatigue_score(campaign.frequency, self.history.ctr_decline(campaign))
    }

    /// Linear extrapolation of frequency since launch.
    fn forecast(&self, campaign: &Campaign, now: DateTime<Utc>) -> Option<NaiveDate> {
        if campaign.frequency >= FATIGUE_FREQUENCY {
            return Some(now.date_naive());
        }
        let started = campaign.started_at?;
        let days_running = (now - started).num_seconds() as f64 / 86_400.0;
        if days_running <= 0.0 || campaign.frequency <= 0.0 {
            return None;
        }
        // remaining / (frequency / days_running), rearranged to keep the division last
        let days_left =
            ((FATIGUE_FREQUENCY - campaign.frequency) * days_running / campaign.frequency).ceil();
        if !days_left.is_finite() {
            return None;
        }
        // Too far out for chrono to represent: no forecast
        let delta = Duration::try_days(days_left as i64)?;
        now.checked_add_signed(delta).map(|date| date.date_naive())
    }

    pub fn fatigue(&self, campaign: &Campaign) -> FatigueAssessment {
        let score = self.fatigue_score(campaign);
        FatigueAssessment {
            score,
            is_fatigued: score >= FATIGUED_AT,
            forecast_date: self.forecast(campaign, self.clock.now()),
        }
    }

    pub fn report(&self, campaign: &Campaign) -> CampaignReport {
        let health = self.health_score(campaign);
        CampaignReport {
            campaign_id: campaign.id.clone(),
            roas: campaign.roas(),
            ctr: campaign.ctr(),
            cpm: campaign.cpm(),
            cpc: campaign.cpc(),
            conversion_rate: campaign.conversion_rate(),
            budget_utilization: campaign.budget_utilization(),
            health_score: health,
            health_status: HealthStatus::from_score(health),
            fatigue: self.fatigue(campaign),
        }
    }
}
