//! Churn-risk scoring and VIP customer intelligence.
//!
//! The risk score is an additive point model over a customer record,
//! clamped to 0-100. Everything else in this module (predictions,
//! recommendations, portfolio metrics) is derived from that score and the
//! raw record; nothing is written back onto the customer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::{CustomerRecord, Tier};
use crate::providers::{Clock, SystemClock};

// Thresholds
const RECENCY_DAYS: f64 = 30.0;
const LOW_SATISFACTION: f64 = 7.0;
const HIGH_SATISFACTION: f64 = 8.0;
const LOW_ORDER_VALUE: f64 = 500.0;
const FEW_ORDERS: u32 = 3;
const HIGH_LIFETIME_VALUE: f64 = 10_000.0;

// Points
const LAPSED_PENALTY: i32 = 30;
const LOW_SATISFACTION_PENALTY: i32 = 25;
const LOW_ORDER_VALUE_PENALTY: i32 = 15;
const FEW_ORDERS_PENALTY: i32 = 20;
const HIGH_LIFETIME_VALUE_BONUS: i32 = 20;
const HIGH_SATISFACTION_BONUS: i32 = 15;
const PLATINUM_BONUS: i32 = 10;

/// Scores at or above this count a customer as at risk.
pub const AT_RISK_THRESHOLD: u8 = 60;

/// Days between purchases expected for a tier.
fn tier_cadence_days(tier: Tier) -> i64 {
    match tier {
        Tier::Platinum => 14,
        Tier::Gold => 21,
        Tier::Silver => 30,
        Tier::Bronze => 45,
    }
}

/// Fractional days between the last purchase and `now`.
pub fn days_since(last_purchase: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - last_purchase).num_seconds() as f64 / 86_400.0
}

/// Churn risk 0-100 for a customer at instant `now`.
pub fn churn_risk(customer: &CustomerRecord, now: DateTime<Utc>) -> u8 {
    let mut risk: i32 = 0;

    if days_since(customer.last_purchase, now) > RECENCY_DAYS {
        risk += LAPSED_PENALTY;
    }
    if customer.satisfaction_score < LOW_SATISFACTION {
        risk += LOW_SATISFACTION_PENALTY;
    }
    if customer.average_order_value < LOW_ORDER_VALUE {
        risk += LOW_ORDER_VALUE_PENALTY;
    }
    if customer.order_count < FEW_ORDERS {
        risk += FEW_ORDERS_PENALTY;
    }
    if customer.lifetime_value > HIGH_LIFETIME_VALUE {
        risk -= HIGH_LIFETIME_VALUE_BONUS;
    }
    if customer.satisfaction_score > HIGH_SATISFACTION {
        risk -= HIGH_SATISFACTION_BONUS;
    }
    if customer.tier == Tier::Platinum {
        risk -= PLATINUM_BONUS;
    }

    risk.clamp(0, 100) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=29 => RiskLevel::Low,
            30..=59 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

/// Outcome of the `predictions` action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnPrediction {
    pub customer_id: String,
    pub churn_risk: u8,
    /// `churn_risk` as a 0-1 probability
    pub churn_probability: f64,
    pub risk_level: RiskLevel,
    pub days_since_last_purchase: i64,
    pub next_purchase_prediction: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A suggested retention action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub action: String,
    pub priority: Priority,
    pub reason: String,
}

/// Outcome of the `analyze` action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAnalysis {
    pub customer_id: String,
    pub tier: Tier,
    pub churn_risk: u8,
    pub risk_level: RiskLevel,
    pub next_purchase_prediction: DateTime<Utc>,
    pub recommendations: Vec<Recommendation>,
}

/// Outcome of the `metrics` action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VipMetrics {
    pub total_customers: usize,
    pub total_revenue: f64,
    pub average_order_value: f64,
    pub average_lifetime_value: f64,
    pub average_satisfaction: f64,
    pub average_churn_risk: f64,
    pub at_risk_customers: usize,
    pub tier_breakdown: BTreeMap<Tier, usize>,
}

/// VIP intelligence over customer records
#[derive(Clone)]
pub struct VipAnalyzer {
    clock: Arc<dyn Clock>,
}

impl Default for VipAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl VipAnalyzer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn churn_risk(&self, customer: &CustomerRecord) -> u8 {
        churn_risk(customer, self.clock.now())
    }

    /// Last purchase plus the tier's cadence, never in the past.
    pub fn next_purchase(&self, customer: &CustomerRecord) -> DateTime<Utc> {
        let expected = customer.last_purchase + Duration::days(tier_cadence_days(customer.tier));
        expected.max(self.clock.now())
    }

    pub fn predict(&self, customer: &CustomerRecord) -> ChurnPrediction {
        let now = self.clock.now();
        let risk = churn_risk(customer, now);
        ChurnPrediction {
            customer_id: customer.id.clone(),
            churn_risk: risk,
            churn_probability: f64::from(risk) / 100.0,
            risk_level: RiskLevel::from_score(risk),
            days_since_last_purchase: (now - customer.last_purchase).num_days(),
            next_purchase_prediction: self.next_purchase(customer),
        }
    }

    /// Retention actions, most urgent first.
    pub fn recommendations(&self, customer: &CustomerRecord) -> Vec<Recommendation> {
        let risk = self.churn_risk(customer);
        let mut recs = Vec::new();

        if risk >= AT_RISK_THRESHOLD {
            recs.push(Recommendation {
                action: "win_back_offer".to_string(),
                priority: Priority::High,
                reason: format!("churn risk is {}", risk),
            });
        }
        if customer.satisfaction_score < LOW_SATISFACTION {
            recs.push(Recommendation {
                action: "personal_outreach".to_string(),
                priority: Priority::High,
                reason: format!("satisfaction is {:.1}/10", customer.satisfaction_score),
            });
        }
        if customer.order_count < FEW_ORDERS {
            recs.push(Recommendation {
                action: "loyalty_incentive".to_string(),
                priority: Priority::Medium,
                reason: format!("only {} orders so far", customer.order_count),
            });
        }
        if customer.average_order_value < LOW_ORDER_VALUE {
            recs.push(Recommendation {
                action: "bundle_upsell".to_string(),
                priority: Priority::Low,
                reason: format!("average order value is {:.2}", customer.average_order_value),
            });
        }
        if matches!(customer.tier, Tier::Platinum | Tier::Gold)
            && RiskLevel::from_score(risk) == RiskLevel::Low
        {
            recs.push(Recommendation {
                action: "exclusive_early_access".to_string(),
                priority: Priority::Low,
                reason: "loyal top-tier customer".to_string(),
            });
        }

        recs.sort_by_key(|r| r.priority);
        recs
    }

    pub fn analyze(&self, customer: &CustomerRecord) -> CustomerAnalysis {
        let risk = self.churn_risk(customer);
        CustomerAnalysis {
            customer_id: customer.id.clone(),
            tier: customer.tier,
            churn_risk: risk,
            risk_level: RiskLevel::from_score(risk),
            next_purchase_prediction: self.next_purchase(customer),
            recommendations: self.recommendations(customer),
        }
    }

    /// Portfolio aggregates. An empty slice yields all zeros.
    pub fn metrics(&self, customers: &[CustomerRecord]) -> VipMetrics {
        let now = self.clock.now();
        let n = customers.len();
        let mean = |sum: f64| if n == 0 { 0.0 } else { sum / n as f64 };

        let mut tier_breakdown = BTreeMap::new();
        let mut at_risk_customers = 0;
        let mut risk_sum = 0.0;
        for c in customers {
            *tier_breakdown.entry(c.tier).or_insert(0) += 1;
            let risk = churn_risk(c, now);
            risk_sum += f64::from(risk);
            if risk >= AT_RISK_THRESHOLD {
                at_risk_customers += 1;
            }
        }

        VipMetrics {
            total_customers: n,
            total_revenue: customers.iter().map(|c| c.total_spent).sum(),
            average_order_value: mean(customers.iter().map(|c| c.average_order_value).sum()),
            average_lifetime_value: mean(customers.iter().map(|c| c.lifetime_value).sum()),
            average_satisfaction: mean(customers.iter().map(|c| c.satisfaction_score).sum()),
            average_churn_risk: mean(risk_sum),
            at_risk_customers,
            tier_breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::FixedClock;

    /// A customer that triggers no rule at all.
    fn neutral(now: DateTime<Utc>) -> CustomerRecord {
        CustomerRecord {
            id: "cust_1".to_string(),
            name: None,
            total_spent: 5_000.0,
            order_count: 5,
            last_purchase: now - Duration::days(10),
            average_order_value: 1_000.0,
            lifetime_value: 5_000.0,
            satisfaction_score: 7.5,
            tier: Tier::Gold,
        }
    }

    #[test]
    fn test_neutral_customer_scores_zero() {
        let now = Utc::now();
        assert_eq!(churn_risk(&neutral(now), now), 0);
    }

    #[test]
    fn test_every_penalty() {
        let now = Utc::now();
        let c = CustomerRecord {
            last_purchase: now - Duration::days(45),
            satisfaction_score: 5.0,
            average_order_value: 100.0,
            order_count: 1,
            ..neutral(now)
        };
        assert_eq!(churn_risk(&c, now), 90);
    }

    #[test]
    fn test_clamped_at_zero() {
        let now = Utc::now();
        let c = CustomerRecord {
            lifetime_value: 20_000.0,
            satisfaction_score: 9.5,
            tier: Tier::Platinum,
            ..neutral(now)
        };
        assert_eq!(churn_risk(&c, now), 0);
    }

    #[test]
    fn test_satisfaction_boundaries() {
        let now = Utc::now();
        let at = |s: f64| {
            churn_risk(
                &CustomerRecord {
                    satisfaction_score: s,
                    ..neutral(now)
                },
                now,
            )
        };
        assert_eq!(at(7.0), 0);
        assert_eq!(at(6.99), 25);
        assert_eq!(at(8.0), 0);
        // -15 is swallowed by the clamp on an otherwise neutral record
        assert_eq!(at(8.5), 0);
    }

    #[test]
    fn test_recency_boundary() {
        let now = Utc::now();
        let exactly = CustomerRecord {
            last_purchase: now - Duration::days(30),
            ..neutral(now)
        };
        let just_over = CustomerRecord {
            last_purchase: now - Duration::days(30) - Duration::seconds(1),
            ..neutral(now)
        };
        assert_eq!(churn_risk(&exactly, now), 0);
        assert_eq!(churn_risk(&just_over, now), 30);
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::High);
    }

    #[test]
    fn test_next_purchase_never_in_past() {
        let now = Utc::now();
        let analyzer = VipAnalyzer::new(Arc::new(FixedClock(now)));

        let recent = neutral(now);
        assert_eq!(
            analyzer.next_purchase(&recent),
            recent.last_purchase + Duration::days(21)
        );

        let lapsed = CustomerRecord {
            last_purchase: now - Duration::days(200),
            ..neutral(now)
        };
        assert_eq!(analyzer.next_purchase(&lapsed), now);
    }

    #[test]
    fn test_recommendations_sorted_by_priority() {
        let now = Utc::now();
        let analyzer = VipAnalyzer::new(Arc::new(FixedClock(now)));
        let c = CustomerRecord {
            last_purchase: now - Duration::days(60),
            satisfaction_score: 4.0,
            order_count: 1,
            average_order_value: 80.0,
            tier: Tier::Bronze,
            ..neutral(now)
        };
        let actions: Vec<String> = analyzer
            .recommendations(&c)
            .into_iter()
            .map(|r| r.action)
            .collect();
        assert_eq!(
            actions,
            vec![
                "win_back_offer",
                "personal_outreach",
                "loyalty_incentive",
                "bundle_upsell"
            ]
        );
    }

    #[test]
    fn test_loyal_gold_customer_gets_early_access() {
        let now = Utc::now();
        let analyzer = VipAnalyzer::new(Arc::new(FixedClock(now)));
        let analysis = analyzer.analyze(&neutral(now));
        assert_eq!(analysis.risk_level, RiskLevel::Low);
        assert_eq!(analysis.recommendations.len(), 1);
        assert_eq!(analysis.recommendations[0].action, "exclusive_early_access");
    }

    #[test]
    fn test_metrics_empty_portfolio() {
        let analyzer = VipAnalyzer::default();
        let metrics = analyzer.metrics(&[]);
        assert_eq!(metrics.total_customers, 0);
        assert_eq!(metrics.average_satisfaction, 0.0);
        assert!(metrics.tier_breakdown.is_empty());
    }
}
