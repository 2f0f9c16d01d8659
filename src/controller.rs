//! Analysis controller
//!
//! Owns the session state (history, processing flag, draft length) and
//! runs one analysis at a time:
//!
//! ```text
//! submit(raw) ─► trim + length check ─► busy? ─► gate? ─► POST /sentiment
//!                     │                   │        │            │
//!                     ▼                   ▼        ▼            ▼
//!               validation error       no-op   "API unavailable"  result │ classified error
//! ```
//!
//! Nothing escapes `submit`: every path ends in a presenter call and a
//! [`SubmitOutcome`], and the controller is idle and submittable again.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::client::SentimentApi;
use crate::connectivity::ConnectivityState;
use crate::error::SentimentError;
use crate::history::{HistoryEntry, HistoryStore};
use crate::model::{AnalysisResult, MIN_TEXT_CHARS};
use crate::presenter::Presenter;

/// Submission rules that differ between deployments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitPolicy {
    /// Reject while the last probe said the API is down
    pub gate_on_connectivity: bool,
}

impl Default for SubmitPolicy {
    fn default() -> Self {
        Self {
            gate_on_connectivity: true,
        }
    }
}

/// What happened to one `submit` call
#[derive(Debug)]
pub enum SubmitOutcome {
    Completed(AnalysisResult),
    /// Request sent, service or transport failed
    Failed(SentimentError),
    /// Refused locally, nothing sent
    Rejected(SentimentError),
    /// Another analysis is in flight; ignored
    Busy,
}

impl SubmitOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn error(&self) -> Option<&SentimentError> {
        match self {
            Self::Failed(e) | Self::Rejected(e) => Some(e),
            _ => None,
        }
    }
}

/// Single-request coordinator
pub struct AnalysisController {
    api: Arc<dyn SentimentApi>,
    presenter: Arc<dyn Presenter>,
    history: Mutex<HistoryStore>,
    connectivity: watch::Receiver<ConnectivityState>,
    policy: SubmitPolicy,
    processing: AtomicBool,
    draft_chars: AtomicUsize,
}

impl AnalysisController {
    pub fn new(
        api: Arc<dyn SentimentApi>,
        presenter: Arc<dyn Presenter>,
        history: HistoryStore,
        connectivity: watch::Receiver<ConnectivityState>,
    ) -> Self {
        Self {
            api,
            presenter,
            history: Mutex::new(history),
            connectivity,
            policy: SubmitPolicy::default(),
            processing: AtomicBool::new(false),
            draft_chars: AtomicUsize::new(0),
        }
    }

    pub fn with_policy(mut self, policy: SubmitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Push the hydrated state to the presenter
    pub fn start(&self) {
        let entries = self.history();
        self.presenter.render_history(&entries);
        self.presenter.show_char_count(self.draft_chars.load(Ordering::Acquire));
        self.refresh_input_gate();
    }

    /// Draft text changed; updates the counter and the submit gate
    pub fn input_changed(&self, text: &str) {
        let chars = text.chars().count();
        self.draft_chars.store(chars, Ordering::Release);
        self.presenter.show_char_count(chars);
        self.refresh_input_gate();
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().snapshot()
    }

    /// Analyze `raw_text`; never fails, see [`SubmitOutcome`]
    pub async fn submit(&self, raw_text: &str) -> SubmitOutcome {
        let text = raw_text.trim();
        let chars = text.chars().count();

        if chars < MIN_TEXT_CHARS {
            let err = SentimentError::Validation {
                min: MIN_TEXT_CHARS,
                actual: chars,
            };
            self.presenter.show_error(Some(&err.user_message()));
            return SubmitOutcome::Rejected(err);
        }

        if self.is_processing() {
            tracing::debug!("Submission ignored, analysis already in flight");
            return SubmitOutcome::Busy;
        }

        if self.policy.gate_on_connectivity && self.connectivity.borrow().is_disconnected() {
            let err = SentimentError::Offline;
            self.presenter.show_error(Some(&err.user_message()));
            return SubmitOutcome::Rejected(err);
        }

        let Some(_guard) = self.begin() else {
            tracing::debug!("Submission ignored, analysis already in flight");
            return SubmitOutcome::Busy;
        };

        tracing::info!(chars, api = self.api.name(), "Submitting analysis");

        match self.api.classify(text).await {
            Ok(result) => {
                let entries = self.history.lock().record(text, &result);
                self.presenter.render_history(&entries);
                self.presenter.display_result(&result);
                tracing::info!(
                    label = %result.label,
                    probability = result.probability,
                    "Analysis completed"
                );
                SubmitOutcome::Completed(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Analysis failed");
                self.presenter.show_error(Some(&e.user_message()));
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Claim the processing flag and enter the loading state
    fn begin(&self) -> Option<InFlight<'_>> {
        self.processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;

        self.presenter.show_loading(true);
        self.presenter.show_error(None);
        self.presenter.update_input_gate(false);
        Some(InFlight { controller: self })
    }

    fn refresh_input_gate(&self) {
        let enabled =
            self.draft_chars.load(Ordering::Acquire) >= MIN_TEXT_CHARS && !self.is_processing();
        self.presenter.update_input_gate(enabled);
    }
}

/// Held for the duration of one request; dropping it leaves the
/// loading state whatever the outcome
struct InFlight<'a> {
    controller: &'a AnalysisController,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.controller.processing.store(false, Ordering::Release);
        self.controller.presenter.show_loading(false);
        self.controller.refresh_input_gate();
    }
}
