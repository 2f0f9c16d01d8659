//! Presentation boundary
//!
//! The controller, history and connectivity monitor push display changes
//! through [`Presenter`]; they never read UI state back. Front ends
//! implement the trait directly (console) or consume [`ViewUpdate`]s from
//! a channel (TUI).

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::connectivity::ConnectivityState;
use crate::history::HistoryEntry;
use crate::model::AnalysisResult;

/// Display sink for core state changes
pub trait Presenter: Send + Sync {
    fn show_loading(&self, loading: bool);

    /// `None` hides the error banner
    fn show_error(&self, message: Option<&str>);

    fn display_result(&self, result: &AnalysisResult);

    /// Full history, newest first
    fn render_history(&self, entries: &[HistoryEntry]);

    fn set_connectivity(&self, state: &ConnectivityState);

    /// Whether the submit affordance is enabled
    fn update_input_gate(&self, enabled: bool);

    /// Live character counter for the draft input
    fn show_char_count(&self, _count: usize) {}
}

/// Owned form of a [`Presenter`] call
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    Loading(bool),
    Error(Option<String>),
    Result(AnalysisResult),
    History(Vec<HistoryEntry>),
    Connectivity(ConnectivityState),
    InputGate(bool),
    CharCount(usize),
}

// ─────────────────────────────────────────────────────────────────────────────
// Channel presenter
// ─────────────────────────────────────────────────────────────────────────────

/// Forwards every call as a [`ViewUpdate`] to a receiver task
#[derive(Clone)]
pub struct ChannelPresenter {
    tx: mpsc::UnboundedSender<ViewUpdate>,
}

impl ChannelPresenter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ViewUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, update: ViewUpdate) {
        // Receiver gone means the UI is shutting down
        if self.tx.send(update).is_err() {
            tracing::trace!("View update dropped, receiver closed");
        }
    }
}

impl Presenter for ChannelPresenter {
    fn show_loading(&self, loading: bool) {
        self.send(ViewUpdate::Loading(loading));
    }

    fn show_error(&self, message: Option<&str>) {
        self.send(ViewUpdate::Error(message.map(str::to_string)));
    }

    fn display_result(&self, result: &AnalysisResult) {
        self.send(ViewUpdate::Result(result.clone()));
    }

    fn render_history(&self, entries: &[HistoryEntry]) {
        self.send(ViewUpdate::History(entries.to_vec()));
    }

    fn set_connectivity(&self, state: &ConnectivityState) {
        self.send(ViewUpdate::Connectivity(state.clone()));
    }

    fn update_input_gate(&self, enabled: bool) {
        self.send(ViewUpdate::InputGate(enabled));
    }

    fn show_char_count(&self, count: usize) {
        self.send(ViewUpdate::CharCount(count));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording presenter
// ─────────────────────────────────────────────────────────────────────────────

/// Keeps every update in order, for assertions
#[derive(Default)]
pub struct RecordingPresenter {
    updates: Mutex<Vec<ViewUpdate>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<ViewUpdate> {
        self.updates.lock().clone()
    }

    pub fn clear(&self) {
        self.updates.lock().clear();
    }

    /// Most recent error banner content, if any was shown
    pub fn last_error(&self) -> Option<String> {
        self.updates.lock().iter().rev().find_map(|u| match u {
            ViewUpdate::Error(Some(msg)) => Some(msg.clone()),
            _ => None,
        })
    }

    pub fn last_result(&self) -> Option<AnalysisResult> {
        self.updates.lock().iter().rev().find_map(|u| match u {
            ViewUpdate::Result(r) => Some(r.clone()),
            _ => None,
        })
    }

    pub fn last_connectivity(&self) -> Option<ConnectivityState> {
        self.updates.lock().iter().rev().find_map(|u| match u {
            ViewUpdate::Connectivity(s) => Some(s.clone()),
            _ => None,
        })
    }

    pub fn last_history(&self) -> Option<Vec<HistoryEntry>> {
        self.updates.lock().iter().rev().find_map(|u| match u {
            ViewUpdate::History(h) => Some(h.clone()),
            _ => None,
        })
    }

    fn push(&self, update: ViewUpdate) {
        self.updates.lock().push(update);
    }
}

impl Presenter for RecordingPresenter {
    fn show_loading(&self, loading: bool) {
        self.push(ViewUpdate::Loading(loading));
    }

    fn show_error(&self, message: Option<&str>) {
        self.push(ViewUpdate::Error(message.map(str::to_string)));
    }

    fn display_result(&self, result: &AnalysisResult) {
        self.push(ViewUpdate::Result(result.clone()));
    }

    fn render_history(&self, entries: &[HistoryEntry]) {
        self.push(ViewUpdate::History(entries.to_vec()));
    }

    fn set_connectivity(&self, state: &ConnectivityState) {
        self.push(ViewUpdate::Connectivity(state.clone()));
    }

    fn update_input_gate(&self, enabled: bool) {
        self.push(ViewUpdate::InputGate(enabled));
    }

    fn show_char_count(&self, count: usize) {
        self.push(ViewUpdate::CharCount(count));
    }
}
