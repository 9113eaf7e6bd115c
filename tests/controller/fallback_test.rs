//! "Add term" fallback and transient status messages.

use super::{controller, ms, pump_for};
use pretty_assertions::assert_eq;
use smart_search::backend::mock::Endpoint;
use smart_search::backend::MockBackend;
use smart_search::controller::{MessageKind, SuggestionController};

async fn settle_with_no_results(ctl: &mut SuggestionController, query: &str) {
    ctl.set_query(query);
    pump_for(ctl, ms(400)).await;
    assert_eq!(ctl.merged_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_add_term_success_refetches() {
    let mock = MockBackend::with_sample_terms();
    let mut ctl = controller(&mock);
    settle_with_no_results(&mut ctl, "zzzz").await;
    assert!(ctl.fallback_available());

    assert!(ctl.add_term());
    pump_for(&mut ctl, ms(10)).await;

    let message = ctl.message().expect("status message");
    assert_eq!(message.kind, MessageKind::Success);
    assert_eq!(message.text, "Term added successfully!");
    assert_eq!(mock.calls_to(Endpoint::AddTerm), vec!["zzzz"]);
    assert_eq!(mock.calls_to(Endpoint::Exact), vec!["zzzz", "zzzz"]);
    assert_eq!(mock.calls_to(Endpoint::Fuzzy), vec!["zzzz", "zzzz"]);
    assert_eq!(ctl.exact()[0].term, "zzzz");
    assert!(!ctl.fallback_available());
}

#[tokio::test(start_paused = true)]
async fn test_message_expires_after_ttl() {
    let mock = MockBackend::with_sample_terms();
    let mut ctl = controller(&mock);
    settle_with_no_results(&mut ctl, "zzzz").await;

    ctl.add_term();
    pump_for(&mut ctl, ms(1)).await;
    let expires_at = ctl.message().expect("status message").expires_at;

    tokio::time::sleep_until(expires_at - ms(1)).await;
    ctl.drain_events();
    assert!(ctl.message().is_some());

    pump_for(&mut ctl, ms(2)).await;
    assert!(ctl.message().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_message_lives_three_seconds() {
    let mock = MockBackend::with_sample_terms();
    let mut ctl = controller(&mock);
    settle_with_no_results(&mut ctl, "zzzz").await;

    ctl.add_term();
    pump_for(&mut ctl, ms(2999)).await;
    assert!(ctl.message().is_some());
    pump_for(&mut ctl, ms(2)).await;
    assert!(ctl.message().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_add_term_failure_reports_without_refetch() {
    let mock = MockBackend::with_sample_terms().with_failure(Endpoint::AddTerm);
    let mut ctl = controller(&mock);
    settle_with_no_results(&mut ctl, "zzzz").await;

    assert!(ctl.add_term());
    pump_for(&mut ctl, ms(10)).await;

    let message = ctl.message().expect("status message");
    assert_eq!(message.kind, MessageKind::Error);
    assert_eq!(message.text, "Failed to add term");
    assert_eq!(mock.calls_to(Endpoint::Exact), vec!["zzzz"]);
    assert!(!mock.contains("zzzz"));
    // Still nothing to show, so the fallback stays on offer.
    assert!(ctl.fallback_available());
}

#[tokio::test(start_paused = true)]
async fn test_newer_message_replaces_older() {
    let mock = MockBackend::with_sample_terms();
    let mut ctl = controller(&mock);
    settle_with_no_results(&mut ctl, "zzzz").await;
    ctl.add_term();
    pump_for(&mut ctl, ms(10)).await;
    let first = ctl.message().expect("first message").clone();

    // Second insertion 2 s later; the first timer must not clear it.
    pump_for(&mut ctl, ms(1590)).await;
    settle_with_no_results(&mut ctl, "qqqq").await;
    ctl.add_term();
    pump_for(&mut ctl, ms(10)).await;
    let second = ctl.message().expect("second message").clone();
    assert!(second.expires_at > first.expires_at);

    tokio::time::sleep_until(first.expires_at + ms(100)).await;
    ctl.drain_events();
    assert_eq!(ctl.message(), Some(&second));

    tokio::time::sleep_until(second.expires_at + ms(1)).await;
    ctl.drain_events();
    assert!(ctl.message().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_fallback_hidden_while_exact_loading() {
    let mock = MockBackend::with_sample_terms().with_delay(Endpoint::Exact, ms(1000));
    let mut ctl = controller(&mock);

    ctl.set_query("zzzz");
    pump_for(&mut ctl, ms(400)).await;
    assert!(ctl.is_loading());
    assert_eq!(ctl.merged_len(), 0);
    assert!(!ctl.fallback_available());
    assert!(!ctl.add_term());

    pump_for(&mut ctl, ms(1000)).await;
    assert!(!ctl.is_loading());
    assert!(ctl.fallback_available());
}

#[tokio::test(start_paused = true)]
async fn test_fallback_not_offered_for_blank_or_matched_query() {
    let mock = MockBackend::with_sample_terms();
    let mut ctl = controller(&mock);

    assert!(!ctl.fallback_available());
    assert!(!ctl.add_term());

    ctl.set_query("re");
    pump_for(&mut ctl, ms(400)).await;
    assert!(!ctl.fallback_available());
    assert!(!ctl.add_term());
    assert!(mock.calls_to(Endpoint::AddTerm).is_empty());
}
