//! Suggestion controller.
//!
//! Owns every piece of widget state and applies one event at a time. Timers
//! and network calls run on spawned tasks and report back through a channel;
//! the owner drives the controller with [`SuggestionController::next_event`]
//! and [`SuggestionController::apply`], so all state changes happen on the
//! owner's task.
//!
//! All operations that schedule work (typing, adding a term, applying events)
//! must run inside a tokio runtime.

pub mod aggregator;
pub mod debounce;
pub mod fallback;
pub mod message;
pub mod navigation;
pub mod timer;

pub use aggregator::Aggregator;
pub use debounce::{DebounceOutcome, Debouncer};
pub use message::{MessageKind, TransientMessage};
pub use navigation::{NavKey, NavOutcome, Selection};

use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::backend::{ExactSuggestion, FuzzySuggestion, Suggestion, SuggestionBackend};
use crate::config::SuggestConfig;
use crate::error::Result;
use message::MessageSlot;

/// Completions posted back to the controller by its timers and requests.
#[derive(Debug)]
pub enum ControllerEvent {
    /// The debounce window elapsed for `query`.
    QuerySettled { ticket: u64, query: String },
    /// The exact-match request finished.
    ExactLoaded {
        seq: u64,
        query: String,
        result: Result<Vec<ExactSuggestion>>,
    },
    /// The fuzzy request finished.
    FuzzyLoaded {
        seq: u64,
        query: String,
        result: Result<Vec<FuzzySuggestion>>,
    },
    /// The insertion request finished.
    TermAdded { term: String, result: Result<()> },
    /// A status message reached the end of its lifetime.
    MessageExpired { ticket: u64 },
}

/// The search box state machine.
pub struct SuggestionController {
    query: String,
    config: SuggestConfig,
    debouncer: Debouncer,
    aggregator: Aggregator,
    selection: Selection,
    message: MessageSlot,
    /// Parent of every timer this controller schedules.
    root: CancellationToken,
    events_tx: UnboundedSender<ControllerEvent>,
    events_rx: UnboundedReceiver<ControllerEvent>,
}

impl SuggestionController {
    /// Creates a controller talking to `backend`.
    pub fn new(backend: Arc<dyn SuggestionBackend>, config: SuggestConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            query: String::new(),
            debouncer: Debouncer::new(config.debounce()),
            aggregator: Aggregator::new(backend, config.discard_stale_responses),
            selection: Selection::new(),
            message: MessageSlot::new(config.message_ttl()),
            root: CancellationToken::new(),
            config,
            events_tx,
            events_rx,
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Returns false while keystrokes are being ignored. This covers query
    /// edits and navigation keys alike.
    ///
    /// Only ever false with `lock_input_while_loading` set and an exact
    /// request outstanding.
    pub fn accepts_input(&self) -> bool {
        !(self.config.lock_input_while_loading && self.aggregator.is_loading())
    }

    /// Registers a keystroke that changed the query.
    ///
    /// A blank query clears both lists and the selection immediately; anything
    /// else (re)starts the debounce window. Returns false if the change was
    /// ignored (see [`Self::accepts_input`]).
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        if !self.accepts_input() {
            debug!("Ignoring query change while loading");
            return false;
        }
        if self.root.is_cancelled() {
            return false;
        }

        self.query = query.into();
        match self.debouncer.change(&self.query, &self.root, &self.events_tx) {
            DebounceOutcome::Clear => self.clear_suggestions(),
            DebounceOutcome::Scheduled => {}
        }
        true
    }

    /// Feeds a navigation key to the state machine.
    pub fn handle_key(&mut self, key: NavKey) -> NavOutcome {
        if !self.accepts_input() || self.root.is_cancelled() {
            debug!("Ignoring {:?} while input is locked", key);
            return NavOutcome::Ignored;
        }
        let outcome = self.selection.handle(key, self.aggregator.len());
        match outcome {
            NavOutcome::Commit(index) => self.commit(index),
            NavOutcome::Dismiss => self.clear_suggestions(),
            NavOutcome::Ignored | NavOutcome::Moved => {}
        }
        outcome
    }

    /// Picks row `index` directly, exactly as Enter would with it selected.
    ///
    /// Returns false if there is no such row.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.aggregator.len() {
            return false;
        }
        self.commit(index);
        true
    }

    /// Runs the "add term" fallback for the current query.
    ///
    /// Returns false (and does nothing) when the fallback is not available.
    pub fn add_term(&mut self) -> bool {
        if !self.fallback_available() || self.root.is_cancelled() {
            return false;
        }
        fallback::submit(self.aggregator.backend(), self.query.clone(), &self.events_tx);
        true
    }

    fn commit(&mut self, index: usize) {
        let Some(term) = self.aggregator.get(index).map(|s| s.term().to_string()) else {
            return;
        };
        debug!("Committing suggestion {} '{}'", index, term);
        self.query = term;
        self.clear_suggestions();
        // The committed term is a query change like any other.
        self.debouncer.change(&self.query, &self.root, &self.events_tx);
    }

    fn clear_suggestions(&mut self) {
        self.aggregator.clear();
        self.selection.reset();
    }

    // ------------------------------------------------------------------
    // Event pump
    // ------------------------------------------------------------------

    /// Waits for the next completion from a timer or request.
    pub async fn next_event(&mut self) -> Option<ControllerEvent> {
        self.events_rx.recv().await
    }

    /// Returns a completion that is already queued, without waiting.
    pub fn try_next_event(&mut self) -> Option<ControllerEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Applies every completion that is already queued. Returns how many.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.try_next_event() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Applies one completion.
    pub fn apply(&mut self, event: ControllerEvent) {
        if self.root.is_cancelled() {
            return;
        }
        trace!("Applying {:?}", event);

        match event {
            ControllerEvent::QuerySettled { ticket, query } => {
                if self.debouncer.accept(ticket) {
                    self.aggregator.fetch(&query, &self.events_tx);
                }
            }
            ControllerEvent::ExactLoaded { seq, query, result } => {
                if self.aggregator.apply_exact(seq, &query, result) {
                    self.selection.reset();
                }
            }
            ControllerEvent::FuzzyLoaded { seq, query, result } => {
                if self.aggregator.apply_fuzzy(seq, &query, result) {
                    self.selection.reset();
                }
            }
            ControllerEvent::TermAdded { term, result } => {
                let (kind, text) = fallback::outcome_message(&term, &result);
                self.message.show(kind, text, &self.root, &self.events_tx);
                if result.is_ok() {
                    self.aggregator.fetch(&term, &self.events_tx);
                }
            }
            ControllerEvent::MessageExpired { ticket } => {
                self.message.expire(ticket);
            }
        }
    }

    /// Tears the controller down: pending timers are cancelled and later
    /// completions are ignored. In-flight requests are left to finish.
    pub fn dispose(&mut self) {
        if !self.root.is_cancelled() {
            debug!("Disposing suggestion controller");
            self.root.cancel();
            self.debouncer.cancel();
            self.message.clear();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.root.is_cancelled()
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn exact(&self) -> &[ExactSuggestion] {
        self.aggregator.exact()
    }

    pub fn fuzzy(&self) -> &[FuzzySuggestion] {
        self.aggregator.fuzzy()
    }

    /// Exact rows followed by fuzzy rows.
    pub fn merged(&self) -> impl Iterator<Item = Suggestion<'_>> {
        self.aggregator.merged()
    }

    pub fn merged_len(&self) -> usize {
        self.aggregator.len()
    }

    /// Selected row, `None` when idle.
    pub fn selection(&self) -> Option<usize> {
        self.selection.get()
    }

    /// Selected row as a signed index, `-1` when idle.
    pub fn selected_index(&self) -> isize {
        self.selection.as_signed()
    }

    pub fn selected(&self) -> Option<Suggestion<'_>> {
        self.selection.get().and_then(|i| self.aggregator.get(i))
    }

    /// True while the exact-match request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.aggregator.is_loading()
    }

    /// True while a settle signal is waiting for the debounce window.
    pub fn is_debouncing(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn message(&self) -> Option<&TransientMessage> {
        self.message.current()
    }

    /// Whether "add term" is currently offered.
    pub fn fallback_available(&self) -> bool {
        fallback::is_available(
            &self.query,
            self.aggregator.is_empty(),
            self.aggregator.is_loading(),
        )
    }

    pub fn config(&self) -> &SuggestConfig {
        &self.config
    }
}

impl Drop for SuggestionController {
    fn drop(&mut self) {
        self.dispose();
    }
}
