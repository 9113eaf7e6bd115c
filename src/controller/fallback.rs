//! "Add this term" recovery when neither source has a match.

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};

use super::message::MessageKind;
use super::ControllerEvent;
use crate::backend::SuggestionBackend;
use crate::error::Result;

pub const ADDED_MESSAGE: &str = "Term added successfully!";
pub const FAILED_MESSAGE: &str = "Failed to add term";

/// The fallback is offered only for a non-blank query with no results and no
/// exact request outstanding.
pub fn is_available(query: &str, no_results: bool, loading: bool) -> bool {
    !query.trim().is_empty() && no_results && !loading
}

/// Sends `term` to the store on its own task; the outcome comes back as
/// [`ControllerEvent::TermAdded`].
pub fn submit(
    backend: Arc<dyn SuggestionBackend>,
    term: String,
    events: &UnboundedSender<ControllerEvent>,
) {
    let tx = events.clone();
    tokio::spawn(async move {
        let result = backend.add_term(&term).await;
        let _ = tx.send(ControllerEvent::TermAdded { term, result });
    });
}

/// Status message for an insertion outcome. Success means a re-fetch follows.
pub fn outcome_message(term: &str, result: &Result<()>) -> (MessageKind, &'static str) {
    match result {
        Ok(()) => {
            info!("Added term '{}'", term);
            (MessageKind::Success, ADDED_MESSAGE)
        }
        Err(e) => {
            error!("Failed to add term '{}': {}", term, e);
            (MessageKind::Error, FAILED_MESSAGE)
        }
    }
}
