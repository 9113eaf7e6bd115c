//! Out-of-order responses and the loading flag.

use super::{controller, controller_with, ms, pump_for};
use pretty_assertions::assert_eq;
use smart_search::backend::mock::Endpoint;
use smart_search::backend::MockBackend;
use smart_search::config::SuggestConfig;
use smart_search::controller::{NavKey, NavOutcome, SuggestionController};
use std::time::Duration;

/// "r" answers 500 ms late, so it lands after the later "re" request.
fn slow_prefix_backend() -> MockBackend {
    MockBackend::new()
        .with_term("rust", 1)
        .with_term("react", 1)
        .with_query_delay("r", Duration::from_millis(500))
}

fn exact_terms(ctl: &SuggestionController) -> Vec<&str> {
    ctl.exact().iter().map(|s| s.term.as_str()).collect()
}

/// Types "r", lets its fetch start, then types "re" and waits for both
/// answers. "r" completes at 800 ms, "re" at 650 ms.
async fn type_over_slow_request(ctl: &mut SuggestionController) {
    ctl.set_query("r");
    pump_for(ctl, ms(350)).await;
    ctl.set_query("re");
    pump_for(ctl, ms(400)).await;
}

#[tokio::test(start_paused = true)]
async fn test_late_response_overwrites_by_default() {
    let mock = slow_prefix_backend();
    let mut ctl = controller(&mock);

    type_over_slow_request(&mut ctl).await;
    assert_eq!(exact_terms(&ctl), vec!["react"]);
    assert_eq!(ctl.fuzzy().len(), 1);

    pump_for(&mut ctl, ms(200)).await;
    assert_eq!(ctl.query(), "re");
    assert_eq!(exact_terms(&ctl), vec!["react", "rust"]);
    assert!(ctl.fuzzy().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_sequence_guard_discards_late_response() {
    let mock = slow_prefix_backend();
    let config = SuggestConfig {
        discard_stale_responses: true,
        ..Default::default()
    };
    let mut ctl = controller_with(&mock, config);

    type_over_slow_request(&mut ctl).await;
    pump_for(&mut ctl, ms(200)).await;

    assert_eq!(mock.calls_to(Endpoint::Exact), vec!["r", "re"]);
    assert_eq!(exact_terms(&ctl), vec!["react"]);
    assert_eq!(ctl.fuzzy()[0].term, "react");
}

#[tokio::test(start_paused = true)]
async fn test_sequence_guard_keeps_dismissed_list_closed() {
    let mock = MockBackend::with_sample_terms().with_delay(Endpoint::Exact, ms(200));
    let config = SuggestConfig {
        discard_stale_responses: true,
        ..Default::default()
    };
    let mut ctl = controller_with(&mock, config);

    ctl.set_query("re");
    pump_for(&mut ctl, ms(350)).await;
    ctl.set_query("");
    pump_for(&mut ctl, ms(500)).await;

    assert_eq!(ctl.merged_len(), 0);
    assert!(!ctl.is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_escape_before_first_results_keeps_fetch_alive() {
    let mock = MockBackend::with_sample_terms()
        .with_delay(Endpoint::Exact, ms(1000))
        .with_delay(Endpoint::Fuzzy, ms(1000));
    let config = SuggestConfig {
        discard_stale_responses: true,
        ..Default::default()
    };
    let mut ctl = controller_with(&mock, config);

    ctl.set_query("re");
    pump_for(&mut ctl, ms(400)).await;
    assert_eq!(ctl.merged_len(), 0);
    assert!(ctl.is_loading());

    assert_eq!(ctl.handle_key(NavKey::Escape), NavOutcome::Ignored);
    assert!(ctl.is_loading());
    assert!(!ctl.fallback_available());

    pump_for(&mut ctl, ms(2000)).await;
    assert_eq!(exact_terms(&ctl), vec!["react", "redis", "redux"]);
    assert!(!ctl.is_loading());
    assert!(!ctl.fallback_available());
}

#[tokio::test(start_paused = true)]
async fn test_any_exact_completion_clears_loading() {
    let mock = slow_prefix_backend();
    let mut ctl = controller(&mock);

    ctl.set_query("r");
    pump_for(&mut ctl, ms(350)).await;
    assert!(ctl.is_loading());

    // "re" answers first while "r" is still outstanding.
    ctl.set_query("re");
    pump_for(&mut ctl, ms(310)).await;
    assert!(!ctl.is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_slow_fuzzy_does_not_hold_loading() {
    let mock = MockBackend::with_sample_terms().with_delay(Endpoint::Fuzzy, ms(1000));
    let mut ctl = controller(&mock);

    ctl.set_query("re");
    pump_for(&mut ctl, ms(400)).await;
    assert!(!ctl.is_loading());
    assert!(!ctl.exact().is_empty());
    assert!(ctl.fuzzy().is_empty());

    pump_for(&mut ctl, ms(1000)).await;
    assert!(!ctl.fuzzy().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_slow_exact_holds_loading() {
    let mock = MockBackend::with_sample_terms().with_delay(Endpoint::Exact, ms(1000));
    let mut ctl = controller(&mock);

    ctl.set_query("re");
    pump_for(&mut ctl, ms(400)).await;
    assert!(ctl.is_loading());
    assert!(!ctl.fuzzy().is_empty());

    pump_for(&mut ctl, ms(1000)).await;
    assert!(!ctl.is_loading());
    assert!(!ctl.exact().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_fuzzy_failure_degrades_only_fuzzy() {
    let mock = MockBackend::with_sample_terms().with_failure(Endpoint::Fuzzy);
    let mut ctl = controller(&mock);

    ctl.set_query("re");
    pump_for(&mut ctl, ms(400)).await;

    assert_eq!(ctl.exact().len(), 3);
    assert!(ctl.fuzzy().is_empty());
    assert!(!ctl.is_loading());
    assert!(!ctl.fallback_available());
}

#[tokio::test(start_paused = true)]
async fn test_exact_failure_clears_loading_and_keeps_fuzzy() {
    let mock = MockBackend::with_sample_terms().with_failure(Endpoint::Exact);
    let mut ctl = controller(&mock);

    ctl.set_query("re");
    pump_for(&mut ctl, ms(400)).await;

    assert!(ctl.exact().is_empty());
    assert!(!ctl.fuzzy().is_empty());
    assert!(!ctl.is_loading());
}
