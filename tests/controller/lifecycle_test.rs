//! Teardown: nothing fires once the controller is gone.

use super::{controller, merged_terms, ms, pump_for};
use pretty_assertions::assert_eq;
use smart_search::backend::mock::Endpoint;
use smart_search::backend::MockBackend;
use smart_search::controller::NavKey;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn test_dispose_cancels_pending_debounce() {
    let mock = MockBackend::with_sample_terms();
    let mut ctl = controller(&mock);

    ctl.set_query("re");
    sleep(ms(100)).await;
    ctl.dispose();
    pump_for(&mut ctl, ms(1000)).await;

    assert!(ctl.is_disposed());
    assert!(mock.calls().is_empty());
    assert!(!ctl.is_debouncing());
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending_debounce() {
    let mock = MockBackend::with_sample_terms();
    let mut ctl = controller(&mock);

    ctl.set_query("re");
    drop(ctl);
    sleep(ms(1000)).await;

    assert!(mock.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dispose_clears_message() {
    let mock = MockBackend::with_sample_terms();
    let mut ctl = controller(&mock);
    ctl.set_query("zzzz");
    pump_for(&mut ctl, ms(400)).await;
    ctl.add_term();
    pump_for(&mut ctl, ms(10)).await;
    assert!(ctl.message().is_some());

    ctl.dispose();
    assert!(ctl.message().is_none());
    pump_for(&mut ctl, ms(5000)).await;
    assert!(ctl.message().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_response_ignored_after_dispose() {
    let mock = MockBackend::with_sample_terms().with_delay(Endpoint::Exact, ms(500));
    let mut ctl = controller(&mock);

    ctl.set_query("re");
    pump_for(&mut ctl, ms(350)).await;
    let before = merged_terms(&ctl);
    ctl.dispose();
    pump_for(&mut ctl, ms(1000)).await;

    assert_eq!(mock.calls_to(Endpoint::Exact), vec!["re"]);
    assert_eq!(merged_terms(&ctl), before);
}

#[tokio::test(start_paused = true)]
async fn test_disposed_controller_ignores_input() {
    let mock = MockBackend::with_sample_terms();
    let mut ctl = controller(&mock);
    ctl.dispose();
    ctl.dispose();

    assert!(!ctl.set_query("re"));
    assert!(!ctl.add_term());
    ctl.handle_key(NavKey::Down);
    pump_for(&mut ctl, ms(1000)).await;

    assert_eq!(ctl.query(), "");
    assert!(mock.calls().is_empty());
}
