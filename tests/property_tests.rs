/// Property-based tests using proptest
/// Tests invariants that should hold for all inputs
use gfg_profile_api::extractor::FieldPattern;
use gfg_profile_api::locator::{locate, WINDOW_WIDTH};
use gfg_profile_api::models::{BreakdownResult, Difficulty, ProblemBreakdown, ProfileRecord};
use gfg_profile_api::orchestrator::merge;
use gfg_profile_api::services::{parse_breakdown, parse_profile_html};
use proptest::prelude::*;

// Property: the locator never panics and always returns a slice of its input
proptest! {
    #[test]
    fn locate_returns_substring(html in "\\PC*") {
        let window = locate(&html);
        prop_assert!(html.contains(window));
    }

    #[test]
    fn locate_bounds_keyword_window(prefix in "[a-z ]{0,50}", tail in "\\PC{0,8000}") {
        let html = format!("{}userData{}", prefix, tail);
        let window = locate(&html);
        prop_assert!(window.len() <= WINDOW_WIDTH);
        prop_assert!(window.starts_with("userData"));
    }
}

// Property: a value found escaped equals the same value found plain
proptest! {
    #[test]
    fn escaping_tiers_agree_on_text(value in "[A-Za-z0-9 .@_-]{1,40}") {
        let pattern = FieldPattern::text("name");
        let plain = format!(r#"{{"name":"{}"}}"#, value);
        let escaped = format!(r#"{{\"name\":\"{}\"}}"#, value);
        let nested = format!(r#"{{\\\"name\\\":\\\"{}\\\"}}"#, value);
        prop_assert_eq!(pattern.extract_text(&plain), value.clone());
        prop_assert_eq!(pattern.extract_text(&escaped), value.clone());
        prop_assert_eq!(pattern.extract_text(&nested), value);
    }

    #[test]
    fn escaping_tiers_agree_on_integers(n in 0u64..=u32::MAX as u64) {
        let pattern = FieldPattern::integer("score");
        prop_assert_eq!(pattern.extract_int(&format!(r#""score":{}"#, n)), n);
        prop_assert_eq!(pattern.extract_int(&format!(r#"\"score\":{}"#, n)), n);
    }

    #[test]
    fn profile_parsing_never_panics(html in "\\PC*") {
        let record = parse_profile_html("user", "u".to_string(), &html);
        prop_assert_eq!(record.username, "user");
        prop_assert!(!record.html_fetch_success);
    }
}

// Property: the breakdown always has exactly the five difficulty keys
proptest! {
    #[test]
    fn breakdown_always_has_five_keys(
        labels in prop::collection::vec("[A-Za-z]{1,8}", 0..8),
        sizes in prop::collection::vec(0usize..5, 8)
    ) {
        let mut result = serde_json::Map::new();
        for (label, size) in labels.iter().zip(sizes.iter()) {
            result.insert(label.clone(), serde_json::Value::Array(vec![serde_json::Value::Null; *size]));
        }
        let body = serde_json::json!({"result": result});
        let parsed = parse_breakdown(&body).unwrap();

        let value = serde_json::to_value(parsed.breakdown).unwrap();
        let keys = value.as_object().unwrap();
        prop_assert_eq!(keys.len(), 5);
        for d in Difficulty::ALL {
            prop_assert!(keys.contains_key(d.as_str()));
        }
    }

    #[test]
    fn failed_api_merge_is_identity(total in 0u64..1000, hard in 0u64..100) {
        let mut page = ProfileRecord::empty("u", "u".to_string());
        page.total_problems_solved = total;
        page.problems_solved_breakdown = ProblemBreakdown { hard, ..ProblemBreakdown::default() };
        let merged = merge(page.clone(), BreakdownResult::failed());
        prop_assert_eq!(merged, page);
    }

    #[test]
    fn merge_never_decreases_total(page_total in 0u64..1000, api_total in proptest::option::of(0u64..1000)) {
        let mut page = ProfileRecord::empty("u", "u".to_string());
        page.total_problems_solved = page_total;
        let api = BreakdownResult { total_count: api_total, success: true, ..BreakdownResult::default() };
        let merged = merge(page, api);
        prop_assert!(merged.total_problems_solved >= page_total);
        if page_total > 0 {
            prop_assert_eq!(merged.total_problems_solved, page_total);
        }
    }
}
