//! TUI Module - Interactive analyzer
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        UI LAYER (app.rs)                            │
//! │  Pure rendering of ViewState. Keys become controller calls.         │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ ViewUpdate stream (ChannelPresenter)
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      DOMAIN LAYER (state.rs)                        │
//! │  ViewState folds presenter updates.                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ Presenter calls
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 CORE (controller, connectivity, history)            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod events;
mod state;
mod theme;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::controller::AnalysisController;
use crate::presenter::ViewUpdate;

pub use app::{make_progress_bar, TuiApp};
pub use state::ViewState;
pub use theme::Theme;

/// Run the interactive analyzer until the user quits
pub async fn run(
    controller: Arc<AnalysisController>,
    updates: mpsc::UnboundedReceiver<ViewUpdate>,
) -> anyhow::Result<()> {
    TuiApp::new(controller, updates).run().await
}
