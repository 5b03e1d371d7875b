//! Scoring Module Tests
//!
//! Properties of the churn, campaign and session heuristics that hold across
//! many inputs rather than single examples.

use crate::models::{AdPlatform, Campaign, CustomerRecord, DeviceType, Tier, TrafficSource, WebSession};
use crate::providers::FixedClock;
use crate::scoring::{
    self, churn_risk, health_score, BehaviorLabel, CampaignScorer, FixedCtrTrend, HealthStatus,
    NoCtrHistory, RiskLevel, VipAnalyzer,
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::sync::Arc;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 6, 12, 0, 0).unwrap()
}

fn customer(days_ago: i64, satisfaction: f64, orders: u32, aov: f64, ltv: f64, tier: Tier) -> CustomerRecord {
    CustomerRecord {
        id: format!("cust_{}_{}", days_ago, orders),
        name: None,
        total_spent: ltv,
        order_count: orders,
        last_purchase: now() - Duration::days(days_ago),
        average_order_value: aov,
        lifetime_value: ltv,
        satisfaction_score: satisfaction,
        tier,
    }
}

#[cfg(test)]
mod churn_tests {
    use super::*;

    #[test]
    fn test_risk_always_within_bounds() {
        let tiers = [Tier::Platinum, Tier::Gold, Tier::Silver, Tier::Bronze];
        for days in [0, 30, 31, 365] {
            for satisfaction in [0.0, 6.99, 7.0, 8.0, 8.5, 10.0] {
                for orders in [0, 2, 3, 50] {
                    for (aov, ltv) in [(10.0, 10.0), (499.99, 20_000.0), (500.0, 10_000.0)] {
                        for tier in tiers {
                            let c = customer(days, satisfaction, orders, aov, ltv, tier);
                            let risk = churn_risk(&c, now());
                            assert!(risk <= 100, "risk {} out of range for {:?}", risk, c);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_risk_is_non_decreasing_with_recency() {
        let mut previous = 0;
        for days in [0, 10, 29, 30, 31, 60, 400] {
            let risk = churn_risk(&customer(days, 7.5, 5, 600.0, 5_000.0, Tier::Silver), now());
            assert!(risk >= previous, "risk dropped at {} days", days);
            previous = risk;
        }
        assert_eq!(previous, 30);
    }

    #[test]
    fn test_worst_and_best_case() {
        let worst = customer(90, 2.0, 1, 40.0, 40.0, Tier::Bronze);
        assert_eq!(churn_risk(&worst, now()), 90);

        let best = customer(2, 9.5, 40, 900.0, 25_000.0, Tier::Platinum);
        assert_eq!(churn_risk(&best, now()), 0);
    }

    #[test]
    fn test_analyzer_agrees_with_free_function() {
        let analyzer = VipAnalyzer::new(Arc::new(FixedClock(now())));
        let customers = vec![
            customer(90, 2.0, 1, 40.0, 40.0, Tier::Bronze),
            customer(45, 6.0, 2, 450.0, 900.0, Tier::Silver),
            customer(2, 9.5, 40, 900.0, 25_000.0, Tier::Platinum),
        ];

        for c in &customers {
            let prediction = analyzer.predict(c);
            assert_eq!(prediction.churn_risk, churn_risk(c, now()));
            assert_eq!(prediction.risk_level, RiskLevel::from_score(prediction.churn_risk));
            assert!(prediction.next_purchase_prediction >= now());
        }

        let metrics = analyzer.metrics(&customers);
        assert_eq!(metrics.total_customers, 3);
        // 90 and 90 are at risk, 0 is not
        assert_eq!(metrics.at_risk_customers, 2);
        assert_eq!(metrics.tier_breakdown.values().sum::<usize>(), 3);
    }

    #[test]
    fn test_lapsed_customer_gets_win_back_first() {
        let analyzer = VipAnalyzer::new(Arc::new(FixedClock(now())));
        let analysis = analyzer.analyze(&customer(90, 2.0, 1, 40.0, 40.0, Tier::Bronze));
        assert_eq!(analysis.risk_level, RiskLevel::High);
        assert_eq!(analysis.recommendations[0].action, "win_back_offer");
        assert!(analysis
            .recommendations
            .iter()
            .any(|r| r.action == "bundle_upsell"));
    }
}

#[cfg(test)]
mod campaign_tests {
    use super::*;

    fn oracle(roas: f64, ctr: f64, frequency: f64) -> u8 {
        (0.4 * (roas * 20.0).min(100.0)
            + 0.3 * (ctr * 10.0).min(100.0)
            + 0.3 * (100.0 - frequency * 20.0).max(0.0))
        .round() as u8
    }

    fn campaign(frequency: f64, started_days_ago: Option<i64>) -> Campaign {
        Campaign {
            id: "camp_spring".to_string(),
            name: "Spring drop".to_string(),
            platform: AdPlatform::Instagram,
            budget: 2_000.0,
            spend: 1_000.0,
            impressions: 100_000,
            clicks: 2_000,
            conversions: 80,
            revenue: 4_000.0,
            frequency,
            started_at: started_days_ago.map(|d| now() - Duration::days(d)),
        }
    }

    #[test]
    fn test_health_matches_formula() {
        for roas in [0.0, 1.2, 3.0, 5.0, 9.0] {
            for ctr in [0.0, 0.8, 5.0, 12.0] {
                for frequency in [0.0, 1.0, 2.5, 5.0, 7.0] {
                    assert_eq!(
                        health_score(roas, ctr, frequency),
                        oracle(roas, ctr, frequency),
                        "roas={} ctr={} frequency={}",
                        roas,
                        ctr,
                        frequency
                    );
                }
            }
        }
        assert_eq!(health_score(3.0, 5.0, 1.0), 63);
    }

    #[test]
    fn test_report_uses_derived_ratios() {
        let scorer = CampaignScorer::new(Arc::new(NoCtrHistory), Arc::new(FixedClock(now())));
        let report = scorer.report(&campaign(1.5, Some(10)));

        // roas 4.0, ctr 2.0% -> 32 + 6 + 21
        assert_eq!(report.health_score, oracle(4.0, 2.0, 1.5));
        assert_eq!(report.health_score, 59);
        assert_eq!(report.health_status, HealthStatus::NeedsAttention);
        assert_eq!(report.fatigue.score, 0);
        assert!(!report.fatigue.is_fatigued);
        // 1.5 per 10 days, 1.5 to go
        assert_eq!(
            report.fatigue.forecast_date,
            NaiveDate::from_ymd_opt(2026, 3, 16)
        );
    }

    #[test]
    fn test_declining_ctr_adds_fatigue() {
        let scorer = CampaignScorer::new(Arc::new(FixedCtrTrend(-0.6)), Arc::new(FixedClock(now())));
        let fatigue = scorer.fatigue(&campaign(3.5, None));
        assert_eq!(fatigue.score, 70);
        assert!(fatigue.is_fatigued);
        assert_eq!(fatigue.forecast_date, Some(now().date_naive()));

        let mild = CampaignScorer::new(Arc::new(FixedCtrTrend(-0.5)), Arc::new(FixedClock(now())));
        assert_eq!(mild.fatigue_score(&campaign(3.0, None)), 0);
    }

    #[test]
    fn test_no_forecast_without_start_date() {
        let scorer = CampaignScorer::new(Arc::new(NoCtrHistory), Arc::new(FixedClock(now())));
        assert_eq!(scorer.fatigue(&campaign(1.0, None)).forecast_date, None);
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;

    fn session(id: &str, scroll_depth: f64, duration_seconds: u32, rage_clicks: u32) -> WebSession {
        WebSession {
            id: id.to_string(),
            device: DeviceType::Desktop,
            source: TrafficSource::Paid,
            duration_seconds,
            scroll_depth,
            rage_clicks,
            exited: false,
            converted: false,
        }
    }

    #[test]
    fn test_summary_counts_match_individual_labels() {
        let sessions = vec![
            session("a", 75.0, 200, 0),
            session("b", 85.0, 310, 0),
            session("c", 20.0, 150, 4),
            session("d", 50.0, 30, 0),
        ];

        let insights = scoring::summarize(&sessions);
        let counted: usize = sessions.iter().map(|s| scoring::labels(s).len()).sum();
        assert_eq!(insights.label_counts.values().sum::<usize>(), counted);
        assert_eq!(insights.label_counts[&BehaviorLabel::Intent], 2);
        assert_eq!(insights.label_counts[&BehaviorLabel::Frustration], 1);
        assert_eq!(insights.label_counts[&BehaviorLabel::Confusion], 1);
        assert_eq!(insights.label_counts[&BehaviorLabel::HighIntent], 1);
        assert_eq!(insights.conversion_rate, 0.0);
    }

    #[test]
    fn test_scores_stay_in_range() {
        for depth in [0.0, 35.0, 100.0] {
            for duration in [0, 301, 5_000] {
                for rage in [0, 3, 40] {
                    let s = session("x", depth, duration, rage);
                    assert!(scoring::behavior_score(&s) <= 100);
                }
            }
        }
    }
}
