//! Sentiment client - terminal front end for a text classification API

pub mod client;
pub mod config;
pub mod connectivity;
pub mod console;
pub mod controller;
pub mod error;
pub mod history;
pub mod model;
pub mod presenter;
pub mod tui;

pub use client::{HttpSentimentApi, MockApi, MockReply, SentimentApi};
pub use config::ClientConfig;
pub use connectivity::{ConnectivityMonitor, ConnectivityState, LinkStatus};
pub use controller::{AnalysisController, SubmitOutcome, SubmitPolicy};
pub use error::{FixSuggestion, SentimentError};
pub use history::{FileStorage, HistoryEntry, HistoryStorage, HistoryStore, MemoryStorage};
pub use model::{AnalysisResult, Label, SentimentKind};
pub use presenter::{ChannelPresenter, Presenter, RecordingPresenter, ViewUpdate};
