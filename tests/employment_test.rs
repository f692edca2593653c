//! Job-title classification and employment scoring.

use credit_scoring::employment::{
    analyze, categorize, category_stability, EmploymentScorer, JobCategory, KEYWORD_RULES,
    NEUTRAL_CATEGORY,
};
use credit_scoring::risk::RiskLevel;

#[test]
fn every_keyword_maps_to_its_category() {
    for (category, keywords) in KEYWORD_RULES {
        for kw in *keywords {
            assert_eq!(categorize(kw), *category, "keyword {kw:?}");
        }
    }
}

#[test]
fn empty_and_garbage_titles() {
    assert_eq!(categorize(""), JobCategory::Unknown);
    assert_eq!(categorize("   "), JobCategory::Unknown);
    assert_eq!(categorize("xyzzy123"), JobCategory::OtherServices);
}

#[test]
fn rule_order_keeps_specific_sectors_ahead_of_management() {
    assert_eq!(categorize("Bank Manager"), JobCategory::BankingFinance);
    assert_eq!(categorize("Branch Manager, GCB Bank"), JobCategory::BankingFinance);
    assert_eq!(categorize("Sales Manager"), JobCategory::ManagementExecutive);
    assert_eq!(categorize("Senior Software Engineer"), JobCategory::InformationTechnology);
    assert_eq!(categorize("Police Officer"), JobCategory::GovernmentWorker);
}

#[test]
fn matching_is_case_and_punctuation_insensitive() {
    assert_eq!(categorize("  NURSE "), JobCategory::Healthcare);
    assert_eq!(categorize("Self-Employed"), JobCategory::InformalSelfEmployed);
    assert_eq!(categorize("Market Trader"), JobCategory::TradingCommerce);
    assert_eq!(categorize("Graphic Designer"), JobCategory::CreativeMedia);
}

#[test]
fn stability_table_anchors() {
    assert_eq!(category_stability(JobCategory::GovernmentWorker), 85.0);
    assert_eq!(category_stability(JobCategory::DomesticServices), 20.0);
    assert_eq!(category_stability(JobCategory::Unknown), 15.0);
    for category in JobCategory::ALL {
        let s = category_stability(category);
        assert!((0.0..=100.0).contains(&s));
        assert!(s <= category_stability(JobCategory::GovernmentWorker));
    }
}

#[test]
fn government_worker_reference_score() {
    let score = EmploymentScorer::new()
        .score("10+ years", JobCategory::GovernmentWorker, Some(96_000.0))
        .unwrap();
    assert_eq!(score.employment_length_score, 40.0);
    assert!((score.job_stability_score - 51.0).abs() < 1e-9);
    assert_eq!(score.income_consistency_score, 20.0);
    assert!((score.total_score - 111.0).abs() < 1e-9);
    assert_eq!(score.risk_tier, RiskLevel::VeryLow);
}

#[test]
fn totals_stay_within_bounds() {
    let scorer = EmploymentScorer::new();
    for category in JobCategory::ALL {
        for tenure in ["< 1 year", "3 years", "10+ years", "unknown"] {
            for income in [None, Some(0.0), Some(12_000.0), Some(1_000_000.0)] {
                let s = scorer.score(tenure, category, income).unwrap();
                assert!((0.0..=120.0).contains(&s.total_score));
                assert!((0.0..=40.0).contains(&s.employment_length_score));
                assert!((0.0..=60.0).contains(&s.job_stability_score));
                assert!((0.0..=20.0).contains(&s.income_consistency_score));
            }
        }
    }
}

#[test]
fn analyze_with_nothing_uses_defaults() {
    let a = analyze(None, None, None).unwrap();
    assert_eq!(a.job_category, "Unknown");
    // 15 (length) + 9 (stability 15 × 0.6) + 10 (income)
    assert!((a.employment_score - 34.0).abs() < 1e-9);
    assert_eq!(a.stability_score, 15.0);
    assert_eq!(a.risk_tier, Some(RiskLevel::VeryHigh));
}

#[test]
fn analyze_rejects_unusable_income() {
    assert!(analyze(Some("teacher"), Some("2 years"), Some(f64::NAN)).is_err());
    assert!(analyze(Some("teacher"), Some("2 years"), Some(-1.0)).is_err());
}

#[test]
fn neutral_analysis_shape() {
    let n = credit_scoring::employment::EmploymentAnalysis::neutral();
    assert_eq!(n.job_category, NEUTRAL_CATEGORY);
    assert_eq!(n.employment_score, 0.0);
    assert_eq!(n.stability_score, 0.0);
    assert!(n.is_neutral());
}

#[test]
fn plural_and_compound_titles_keep_their_sector() {
    assert_eq!(categorize("Headteacher"), JobCategory::Education);
    assert_eq!(categorize("Schoolteacher"), JobCategory::Education);
    assert_eq!(categorize("Teachers"), JobCategory::Education);
    assert_eq!(categorize("Nurses"), JobCategory::Healthcare);
    assert_eq!(categorize("Bankers"), JobCategory::BankingFinance);
    assert_eq!(categorize("Storekeeper"), JobCategory::TradingCommerce);
    assert_eq!(categorize("Auto Mechanics"), JobCategory::SkilledTrades);
    assert_eq!(categorize("Policemen"), JobCategory::GovernmentWorker);
}

#[test]
fn short_keywords_do_not_fire_inside_other_words() {
    assert_eq!(categorize("Hospitality Supervisor"), JobCategory::ManagementExecutive);
    assert_eq!(categorize("Graphic Artist"), JobCategory::CreativeMedia);
    assert_eq!(categorize("Storyteller"), JobCategory::OtherServices);
    assert_eq!(categorize("Building Contractor"), JobCategory::Construction);
}
