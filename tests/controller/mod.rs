//! Controller behaviour against the in-memory backend.

pub mod fallback_test;
pub mod lifecycle_test;
pub mod navigation_test;
pub mod race_test;

use smart_search::backend::MockBackend;
use smart_search::config::SuggestConfig;
use smart_search::controller::SuggestionController;
use std::sync::Arc;
use std::time::Duration;

/// Controller with default timings over `mock`.
pub fn controller(mock: &MockBackend) -> SuggestionController {
    controller_with(mock, SuggestConfig::default())
}

pub fn controller_with(mock: &MockBackend, config: SuggestConfig) -> SuggestionController {
    SuggestionController::new(Arc::new(mock.clone()), config)
}

/// Applies controller events as they arrive for `duration` of (virtual) time.
pub async fn pump_for(ctl: &mut SuggestionController, duration: Duration) {
    let deadline = tokio::time::Instant::now() + duration;
    loop {
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => break,
            Some(event) = ctl.next_event() => ctl.apply(event),
        }
    }
    ctl.drain_events();
}

/// Terms of the merged list, in display order.
pub fn merged_terms(ctl: &SuggestionController) -> Vec<String> {
    ctl.merged().map(|s| s.term().to_string()).collect()
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
