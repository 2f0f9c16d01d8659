//! ViewState - Domain Layer
//!
//! Holds everything the renderer draws. Core components never touch it
//! directly; their [`ViewUpdate`]s are folded in with [`ViewState::apply`].

use std::collections::VecDeque;
use std::time::Instant;

use crate::connectivity::ConnectivityState;
use crate::history::HistoryEntry;
use crate::model::AnalysisResult;
use crate::presenter::ViewUpdate;

// ─────────────────────────────────────────────────────────────────────────────
// Core State
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ViewState {
    // Input
    pub input: String,
    pub char_count: usize,
    pub can_submit: bool,

    // Request
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<AnalysisResult>,

    // Session
    pub history: Vec<HistoryEntry>,
    pub connectivity: ConnectivityState,

    // Activity log
    pub events: VecDeque<ActivityEvent>,
    pub max_events: usize,

    // UI state
    pub focus: Panel,
    pub history_scroll: usize,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            input: String::new(),
            char_count: 0,
            can_submit: false,
            loading: false,
            error: None,
            result: None,
            history: Vec::new(),
            connectivity: ConnectivityState::unknown(),
            events: VecDeque::new(),
            max_events: 50,
            focus: Panel::Input,
            history_scroll: 0,
            spinner_frame: 0,
            should_quit: false,
        }
    }
}

impl ViewState {
    /// Fold one presenter update into the view
    pub fn apply(&mut self, update: ViewUpdate) {
        match update {
            ViewUpdate::Loading(loading) => {
                self.loading = loading;
                if loading {
                    // Previous result is hidden while a new one is computed
                    self.result = None;
                }
            }
            ViewUpdate::Error(error) => {
                if let Some(msg) = &error {
                    self.push_event(ActivityEvent::error(msg.clone()));
                }
                self.error = error;
            }
            ViewUpdate::Result(result) => {
                self.push_event(ActivityEvent::info(format!(
                    "{} {}",
                    result.label.display(),
                    result.percent_label()
                )));
                self.result = Some(result);
            }
            ViewUpdate::History(history) => {
                self.history = history;
                self.history_scroll = self.history_scroll.min(self.history.len().saturating_sub(1));
            }
            ViewUpdate::Connectivity(state) => {
                if state.status != self.connectivity.status {
                    self.push_event(ActivityEvent::info(state.message.clone()));
                }
                self.connectivity = state;
            }
            ViewUpdate::InputGate(enabled) => self.can_submit = enabled,
            ViewUpdate::CharCount(count) => self.char_count = count,
        }
    }

    /// Add an activity event, newest first
    pub fn push_event(&mut self, event: ActivityEvent) {
        self.events.push_front(event);
        if self.events.len() > self.max_events {
            self.events.pop_back();
        }
    }

    /// Advance the spinner while loading
    pub fn tick(&mut self) {
        if self.loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn scroll_history(&mut self, delta: i32) {
        let max = self.history.len().saturating_sub(1);
        self.history_scroll = if delta < 0 {
            self.history_scroll.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.history_scroll.saturating_add(delta as usize).min(max)
        };
    }

    /// Gauge ratio for the result panel
    pub fn result_ratio(&self) -> f64 {
        self.result
            .as_ref()
            .map(|r| r.probability.clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Activity Events
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ActivityEvent {
    pub timestamp: Instant,
    pub event_type: ActivityEventType,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEventType {
    Info,
    Error,
}

impl ActivityEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            timestamp: Instant::now(),
            event_type: ActivityEventType::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            timestamp: Instant::now(),
            event_type: ActivityEventType::Error,
            message: message.into(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.event_type {
            ActivityEventType::Info => "•",
            ActivityEventType::Error => "✗",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Input,
    History,
}

impl Panel {
    pub fn next(&self) -> Self {
        match self {
            Self::Input => Self::History,
            Self::History => Self::Input,
        }
    }
}
