//! Theme - Visual Design System
//!
//! Dark palette with green/red sentiment accents and an amber highlight.

use ratatui::style::{Color, Modifier, Style};

use crate::connectivity::LinkStatus;
use crate::model::SentimentKind;

/// Color palette
pub struct Theme {
    // Primary palette
    pub indigo: Color,
    pub amber: Color,
    pub teal: Color,
    pub snow: Color,
    pub slate: Color,

    // Status colors
    pub positive_green: Color,
    pub negative_red: Color,
    pub warning_orange: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            indigo: Color::Rgb(99, 102, 241),  // #6366F1
            amber: Color::Rgb(245, 158, 11),   // #F59E0B
            teal: Color::Rgb(20, 184, 166),    // #14B8A6
            snow: Color::Rgb(230, 237, 243),   // #E6EDF3
            slate: Color::Rgb(100, 116, 139),  // #64748B

            positive_green: Color::Rgb(16, 185, 129), // #10B981
            negative_red: Color::Rgb(239, 68, 68),    // #EF4444
            warning_orange: Color::Rgb(210, 153, 34), // #D29922
        }
    }
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Styles
    // ─────────────────────────────────────────────────────────────────────

    pub fn text(&self) -> Style {
        Style::default().fg(self.snow)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.slate)
    }

    pub fn header(&self) -> Style {
        Style::default().fg(self.indigo).add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.amber)
    }

    /// Focused panel border
    pub fn highlight(&self) -> Style {
        Style::default().fg(self.teal).add_modifier(Modifier::BOLD)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning_orange)
    }

    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.negative_red)
            .add_modifier(Modifier::BOLD)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Domain colors
    // ─────────────────────────────────────────────────────────────────────

    pub fn sentiment_color(&self, kind: SentimentKind) -> Color {
        match kind {
            SentimentKind::Positive => self.positive_green,
            SentimentKind::Negative => self.negative_red,
            SentimentKind::Other => self.amber,
        }
    }

    pub fn sentiment(&self, kind: SentimentKind) -> Style {
        Style::default()
            .fg(self.sentiment_color(kind))
            .add_modifier(Modifier::BOLD)
    }

    pub fn link(&self, status: LinkStatus) -> Style {
        match status {
            LinkStatus::Connected => Style::default().fg(self.positive_green),
            LinkStatus::Disconnected => Style::default().fg(self.negative_red),
            LinkStatus::Unknown => self.dimmed(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Icons and Symbols
// ─────────────────────────────────────────────────────────────────────────────

pub mod icons {
    pub const APP: &str = "◉";
    pub const LINK: &str = "●";
    pub const HISTORY: &str = "◆";
    pub const INPUT: &str = "✎";

    pub const BAR_FULL: char = '█';
    pub const BAR_EMPTY: char = '░';

    /// Braille spinner frames
    pub const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
}
