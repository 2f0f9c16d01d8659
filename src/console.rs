//! Console output for the one-shot commands
//!
//! Results go to stdout, progress and errors to stderr, so
//! `sentiment analyze "..." > out.txt` captures only the answer.

use colored::{ColoredString, Colorize};

use crate::connectivity::{ConnectivityState, LinkStatus};
use crate::history::HistoryEntry;
use crate::model::{percent, AnalysisResult, SentimentKind};
use crate::presenter::Presenter;

/// Line-oriented [`Presenter`] for `analyze` and `health`
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePresenter;

impl ConsolePresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Presenter for ConsolePresenter {
    fn show_loading(&self, loading: bool) {
        if loading {
            eprintln!("{} Analyzing...", "→".cyan());
        }
    }

    fn show_error(&self, message: Option<&str>) {
        if let Some(msg) = message {
            eprintln!("{} {}", "✗".red().bold(), msg.red());
        }
    }

    fn display_result(&self, result: &AnalysisResult) {
        println!("{}", format_result(result));
    }

    // `history` prints on demand through `print_history`
    fn render_history(&self, _entries: &[HistoryEntry]) {}

    fn set_connectivity(&self, state: &ConnectivityState) {
        eprintln!("{}", format_connectivity(state));
    }

    fn update_input_gate(&self, _enabled: bool) {}
}

fn paint(text: &str, kind: SentimentKind) -> ColoredString {
    match kind {
        SentimentKind::Positive => text.green().bold(),
        SentimentKind::Negative => text.red().bold(),
        SentimentKind::Other => text.yellow().bold(),
    }
}

/// `☺ POSITIVO  probability 92%  confidence 92%`
pub fn format_result(result: &AnalysisResult) -> String {
    let kind = result.label.kind();
    format!(
        "{} {}  probability {}  confidence {}",
        paint(kind.icon(), kind),
        paint(&result.label.display(), kind),
        result.percent_label().bold(),
        result.percent_label().bold()
    )
}

pub fn format_connectivity(state: &ConnectivityState) -> String {
    let dot = match state.status {
        LinkStatus::Connected => "●".green(),
        LinkStatus::Disconnected => "●".red(),
        LinkStatus::Unknown => "●".dimmed(),
    };
    format!("{} {}", dot, state.message)
}

pub fn format_history_entry(entry: &HistoryEntry) -> String {
    let label = entry.label();
    let kind = label.kind();
    format!(
        "{} {:<10} {:>4}  {}",
        paint(kind.icon(), kind),
        paint(&label.display(), kind),
        format!("{}%", percent(entry.probability)),
        entry.text.dimmed()
    )
}

/// Print the persisted history, newest first
pub fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("{}", "No analyses yet".dimmed());
        return;
    }
    println!("{} {}", "History:".cyan().bold(), entries.len());
    for entry in entries {
        println!("  {}", format_history_entry(entry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Label;

    #[test]
    fn result_line_shows_label_and_percent() {
        let line = format_result(&AnalysisResult::new(Label::new("Positivo"), 0.8734));
        assert!(line.contains("POSITIVO"));
        assert_eq!(line.matches("87%").count(), 2);
    }

    #[test]
    fn connectivity_line_carries_message() {
        assert!(format_connectivity(&ConnectivityState::disconnected()).contains("API unavailable"));
        assert!(format_connectivity(&ConnectivityState::connected()).contains("Connected to API"));
    }

    #[test]
    fn history_line() {
        let entry = HistoryEntry {
            id: 1,
            text: "o filme foi ótimo".into(),
            sentiment: "negativo".into(),
            probability: 0.61,
        };
        let line = format_history_entry(&entry);
        assert!(line.contains("NEGATIVO"));
        assert!(line.contains("61%"));
        assert!(line.contains("o filme foi ótimo"));
    }
}
