//! Session behavior labeling.
//!
//! Every rule is evaluated on its own; a session can carry any subset of
//! the labels.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::WebSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorLabel {
    Intent,
    Frustration,
    Confusion,
    HighIntent,
}

/// Sessions shorter than this that end in an exit count as bounces.
const BOUNCE_SECONDS: u32 = 10;

pub fn labels(session: &WebSession) -> BTreeSet<BehaviorLabel> {
    let mut labels = BTreeSet::new();
    let depth = session.scroll_depth;
    let duration = session.duration_seconds;

    if depth > 70.0 && duration > 180 {
        labels.insert(BehaviorLabel::Intent);
    }
    if session.rage_clicks > 2 {
        labels.insert(BehaviorLabel::Frustration);
    }
    if depth < 30.0 && duration > 120 {
        labels.insert(BehaviorLabel::Confusion);
    }
    if session.converted || (depth > 80.0 && duration > 300) {
        labels.insert(BehaviorLabel::HighIntent);
    }

    labels
}

/// Engagement 0-100.
pub fn behavior_score(session: &WebSession) -> u8 {
    let mut score = (session.scroll_depth / 10.0).floor() as i64;
    score -= 5 * i64::from(session.rage_clicks);
    if session.duration_seconds > 300 {
        score += 20;
    }
    if session.converted {
        score += 50;
    }
    score.clamp(0, 100) as u8
}

/// Per-session result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAssessment {
    pub id: String,
    pub labels: BTreeSet<BehaviorLabel>,
    pub behavior_score: u8,
}

pub fn assess(session: &WebSession) -> SessionAssessment {
    SessionAssessment {
        id: session.id.clone(),
        labels: labels(session),
        behavior_score: behavior_score(session),
    }
}

/// Aggregate over a batch of sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInsights {
    pub total_sessions: usize,
    /// Percent of sessions that converted
    pub conversion_rate: f64,
    /// Percent of sessions that exited within the bounce window
    pub bounce_rate: f64,
    pub average_behavior_score: f64,
    pub label_counts: BTreeMap<BehaviorLabel, usize>,
}

pub fn summarize(sessions: &[WebSession]) -> SessionInsights {
    if sessions.is_empty() {
        return SessionInsights::default();
    }

    let n = sessions.len() as f64;
    let mut label_counts = BTreeMap::new();
    let mut converted = 0usize;
    let mut bounced = 0usize;
    let mut score_total = 0u64;

    for session in sessions {
        for label in labels(session) {
            *label_counts.entry(label).or_insert(0) += 1;
        }
        if session.converted {
            converted += 1;
        }
        if session.exited && session.duration_seconds < BOUNCE_SECONDS {
            bounced += 1;
        }
        score_total += u64::from(behavior_score(session));
    }

    SessionInsights {
        total_sessions: sessions.len(),
        conversion_rate: converted as f64 / n * 100.0,
        bounce_rate: bounced as f64 / n * 100.0,
        average_behavior_score: score_total as f64 / n,
        label_counts,
    }
}
