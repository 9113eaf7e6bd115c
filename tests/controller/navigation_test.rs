//! Merged-list navigation, commit and dismissal.

use super::{controller, merged_terms, ms, pump_for};
use pretty_assertions::assert_eq;
use smart_search::backend::{ExactSuggestion, FuzzySuggestion, MockBackend};
use smart_search::controller::{ControllerEvent, NavKey, NavOutcome, SuggestionController};

/// Loads Exact=[app/5] and Fuzzy=[apple/0.8] as if both requests had answered.
fn load_app_apple(ctl: &mut SuggestionController) {
    ctl.set_query("app");
    ctl.apply(ControllerEvent::ExactLoaded {
        seq: 1,
        query: "app".into(),
        result: Ok(vec![ExactSuggestion::new("app", 5.0)]),
    });
    ctl.apply(ControllerEvent::FuzzyLoaded {
        seq: 1,
        query: "app".into(),
        result: Ok(vec![FuzzySuggestion::new("apple", 0.8)]),
    });
}

#[tokio::test(start_paused = true)]
async fn test_commit_round_trip() {
    let mock = MockBackend::new();
    let mut ctl = controller(&mock);
    load_app_apple(&mut ctl);
    assert_eq!(merged_terms(&ctl), vec!["app", "apple"]);

    assert_eq!(ctl.handle_key(NavKey::Down), NavOutcome::Moved);
    assert_eq!(ctl.handle_key(NavKey::Enter), NavOutcome::Commit(0));

    assert_eq!(ctl.query(), "app");
    assert!(ctl.exact().is_empty());
    assert!(ctl.fuzzy().is_empty());
    assert_eq!(ctl.selected_index(), -1);
    assert!(ctl.is_debouncing());
}

#[tokio::test(start_paused = true)]
async fn test_merge_order_exact_then_fuzzy() {
    let mock = MockBackend::with_sample_terms();
    let mut ctl = controller(&mock);

    ctl.set_query("redi");
    pump_for(&mut ctl, ms(400)).await;

    let terms = merged_terms(&ctl);
    let exact: Vec<_> = ctl.exact().iter().map(|s| s.term.clone()).collect();
    let fuzzy: Vec<_> = ctl.fuzzy().iter().map(|s| s.term.clone()).collect();
    assert_eq!(terms, [exact, fuzzy].concat());
    assert!(ctl.merged().take(ctl.exact().len()).all(|s| s.is_exact()));
}

#[tokio::test(start_paused = true)]
async fn test_up_down_clamp_without_wrapping() {
    let mock = MockBackend::new();
    let mut ctl = controller(&mock);
    load_app_apple(&mut ctl);

    ctl.handle_key(NavKey::Down);
    ctl.handle_key(NavKey::Down);
    assert_eq!(ctl.handle_key(NavKey::Down), NavOutcome::Ignored);
    assert_eq!(ctl.selected().unwrap().term(), "apple");

    ctl.handle_key(NavKey::Up);
    ctl.handle_key(NavKey::Up);
    assert_eq!(ctl.selected_index(), -1);
    assert_eq!(ctl.handle_key(NavKey::Up), NavOutcome::Ignored);
    assert_eq!(ctl.selected_index(), -1);
}

#[tokio::test(start_paused = true)]
async fn test_enter_when_idle_does_nothing() {
    let mock = MockBackend::new();
    let mut ctl = controller(&mock);
    load_app_apple(&mut ctl);

    assert_eq!(ctl.handle_key(NavKey::Enter), NavOutcome::Ignored);
    assert_eq!(ctl.merged_len(), 2);
    assert_eq!(ctl.query(), "app");
}

#[tokio::test(start_paused = true)]
async fn test_escape_idempotent() {
    let mock = MockBackend::with_sample_terms();
    let mut ctl = controller(&mock);
    ctl.set_query("re");
    pump_for(&mut ctl, ms(400)).await;
    ctl.handle_key(NavKey::Down);

    assert_eq!(ctl.handle_key(NavKey::Escape), NavOutcome::Dismiss);
    let once = (ctl.query().to_string(), merged_terms(&ctl), ctl.selected_index());
    // The list is empty now, so the second press has nothing to do.
    assert_eq!(ctl.handle_key(NavKey::Escape), NavOutcome::Ignored);
    let twice = (ctl.query().to_string(), merged_terms(&ctl), ctl.selected_index());

    assert_eq!(once, twice);
    assert_eq!(once, ("re".to_string(), Vec::<String>::new(), -1));
}

#[tokio::test(start_paused = true)]
async fn test_select_equals_enter_at_index() {
    let mock = MockBackend::new();
    let mut by_enter = controller(&mock);
    let mut by_select = controller(&mock);
    load_app_apple(&mut by_enter);
    load_app_apple(&mut by_select);

    by_enter.handle_key(NavKey::Down);
    by_enter.handle_key(NavKey::Down);
    by_enter.handle_key(NavKey::Enter);
    assert!(by_select.select(1));

    assert_eq!(by_enter.query(), "apple");
    assert_eq!(by_select.query(), by_enter.query());
    assert_eq!(by_select.merged_len(), by_enter.merged_len());
    assert_eq!(by_select.selected_index(), by_enter.selected_index());
}

#[tokio::test(start_paused = true)]
async fn test_keys_on_empty_list_are_noops() {
    let mock = MockBackend::new();
    let mut ctl = controller(&mock);
    ctl.set_query("zz");

    for key in [NavKey::Down, NavKey::Up, NavKey::Enter, NavKey::Escape] {
        assert_eq!(ctl.handle_key(key), NavOutcome::Ignored);
        assert_eq!(ctl.selected_index(), -1);
        assert_eq!(ctl.query(), "zz");
    }
}

#[tokio::test(start_paused = true)]
async fn test_selection_bounds_hold_across_refreshes() {
    let mock = MockBackend::with_sample_terms();
    let mut ctl = controller(&mock);
    let keys = [NavKey::Down, NavKey::Down, NavKey::Up, NavKey::Down];

    for query in ["re", "red", "r", "redux", "x"] {
        ctl.set_query(query);
        pump_for(&mut ctl, ms(400)).await;
        for key in keys.iter().cycle().take(25) {
            ctl.handle_key(*key);
            let n = ctl.merged_len() as isize;
            let i = ctl.selected_index();
            assert!(i >= -1 && i < n.max(0), "query {query}: index {i} with {n} rows");
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_new_results_reset_selection() {
    let mock = MockBackend::with_sample_terms();
    let mut ctl = controller(&mock);

    ctl.set_query("re");
    pump_for(&mut ctl, ms(400)).await;
    ctl.handle_key(NavKey::Down);
    ctl.handle_key(NavKey::Down);
    assert_eq!(ctl.selected_index(), 1);

    ctl.set_query("red");
    pump_for(&mut ctl, ms(400)).await;
    assert_eq!(ctl.selected_index(), -1);
}
