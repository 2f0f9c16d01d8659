//! TUI Application - Main entry point and run loop

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{Event, EventStream, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{handle_key_event, Action};
use super::state::{ActivityEvent, ActivityEventType, Panel, ViewState};
use super::theme::{icons, Theme};
use crate::controller::AnalysisController;
use crate::model::{percent, MIN_TEXT_CHARS};
use crate::presenter::ViewUpdate;

/// TUI Application
pub struct TuiApp {
    state: ViewState,
    theme: Theme,
    controller: Arc<AnalysisController>,
    updates: mpsc::UnboundedReceiver<ViewUpdate>,
}

impl TuiApp {
    /// `updates` must be the receiving end of the presenter the controller uses
    pub fn new(
        controller: Arc<AnalysisController>,
        updates: mpsc::UnboundedReceiver<ViewUpdate>,
    ) -> Self {
        Self {
            state: ViewState::default(),
            theme: Theme::new(),
            controller,
            updates,
        }
    }

    /// Run the TUI application
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut terminal = self.setup_terminal()?;

        self.state
            .push_event(ActivityEvent::info("Type a text and press Enter to analyze"));
        self.controller.start();

        let result = self.main_loop(&mut terminal).await;

        self.restore_terminal(&mut terminal)?;

        result
    }

    fn setup_terminal(&self) -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn restore_terminal(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    /// Main event loop
    ///
    /// Keyboard, presenter updates and the spinner tick share one task, so
    /// rendering never races a state change.
    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        let mut keys = EventStream::new();
        let mut ticker = tokio::time::interval(Duration::from_millis(100));

        loop {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = ticker.tick() => self.state.tick(),
                Some(update) = self.updates.recv() => {
                    self.state.apply(update);
                    while let Ok(update) = self.updates.try_recv() {
                        self.state.apply(update);
                    }
                }
                event = keys.next() => match event {
                    Some(Ok(Event::Key(key))) => self.on_key(key),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn on_key(&mut self, key: KeyEvent) {
        match handle_key_event(key, &mut self.state) {
            Action::Quit => self.state.should_quit = true,
            Action::Edit => self.controller.input_changed(&self.state.input),
            Action::Submit => self.submit(),
            _ => {}
        }
    }

    /// Run the analysis off the UI loop; results come back as updates
    fn submit(&self) {
        let controller = Arc::clone(&self.controller);
        let text = self.state.input.clone();
        tokio::spawn(async move {
            controller.submit(&text).await;
        });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(12),   // Content
                Constraint::Length(1), // Footer
            ])
            .split(area);

        self.render_header(frame, main_chunks[0]);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(main_chunks[1]);

        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6), // Input
                Constraint::Length(6), // Result
                Constraint::Length(3), // Error banner
                Constraint::Min(3),    // Activity
            ])
            .split(content_chunks[0]);

        self.render_input(frame, left_chunks[0]);
        self.render_result(frame, left_chunks[1]);
        self.render_error(frame, left_chunks[2]);
        self.render_activity(frame, left_chunks[3]);
        self.render_history(frame, content_chunks[1]);

        self.render_footer(frame, main_chunks[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let link = &self.state.connectivity;
        let header = Line::from(vec![
            Span::styled(format!("{} SENTIMENT", icons::APP), self.theme.header()),
            Span::raw("  │  "),
            Span::styled(icons::LINK, self.theme.link(link.status)),
            Span::raw(" "),
            Span::styled(link.message.as_str(), self.theme.link(link.status)),
            Span::raw("  │  "),
            Span::styled(
                format!("{} analyses", self.state.history.len()),
                self.theme.text(),
            ),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.header());

        frame.render_widget(Paragraph::new(header).block(block), area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let hint = if self.state.loading {
            Span::styled(" analyzing… ", self.theme.warning())
        } else if self.state.can_submit {
            Span::styled(" [Enter] analyze ", self.theme.accent())
        } else {
            Span::styled(
                format!(" min {} characters ", MIN_TEXT_CHARS),
                self.theme.dimmed(),
            )
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.focus_style(Panel::Input))
            .title(format!(
                " {} TEXT ─ {} characters ",
                icons::INPUT,
                self.state.char_count
            ))
            .title_bottom(Line::from(hint).right_aligned());

        let text = if self.state.input.is_empty() {
            Line::from(Span::styled("Type the text to analyze…", self.theme.dimmed()))
        } else {
            Line::from(Span::styled(self.state.input.as_str(), self.theme.text()))
        };

        let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_result(&self, frame: &mut Frame, area: Rect) {
        let bar_width = area.width.saturating_sub(16) as usize;

        let lines = match (&self.state.result, self.state.loading) {
            (_, true) => {
                let frame_icon = icons::SPINNER[self.state.spinner_frame % icons::SPINNER.len()];
                vec![
                    Line::from(""),
                    Line::from(vec![
                        Span::raw("  "),
                        Span::styled(frame_icon, self.theme.warning()),
                        Span::styled(" Analyzing…", self.theme.warning()),
                    ]),
                ]
            }
            (Some(result), false) => {
                let kind = result.label.kind();
                let style = self.theme.sentiment(kind);
                vec![
                    Line::from(vec![
                        Span::raw("  "),
                        Span::styled(kind.icon(), style),
                        Span::raw(" "),
                        Span::styled(result.label.display(), style),
                    ]),
                    Line::from(vec![
                        Span::raw("  Probability: "),
                        Span::styled(result.percent_label(), self.theme.text()),
                        Span::raw("   Confidence: "),
                        Span::styled(result.percent_label(), self.theme.text()),
                    ]),
                    Line::from(vec![
                        Span::raw("  "),
                        Span::styled(
                            make_progress_bar(self.state.result_ratio(), bar_width),
                            Style::default().fg(self.theme.sentiment_color(kind)),
                        ),
                    ]),
                ]
            }
            (None, false) => vec![
                Line::from(""),
                Line::from(Span::styled("  No analysis yet", self.theme.dimmed())),
            ],
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.dimmed())
            .title(" RESULT ");

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_error(&self, frame: &mut Frame, area: Rect) {
        let (line, border) = match &self.state.error {
            Some(msg) => (
                Line::from(Span::styled(format!(" ✗ {}", msg), self.theme.error())),
                self.theme.error(),
            ),
            None => (Line::from(""), self.theme.dimmed()),
        };

        let block = Block::default().borders(Borders::ALL).border_style(border);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_activity(&self, frame: &mut Frame, area: Rect) {
        let events: Vec<Line> = self
            .state
            .events
            .iter()
            .take(area.height.saturating_sub(2) as usize)
            .map(|e| {
                let style = match e.event_type {
                    ActivityEventType::Info => self.theme.text(),
                    ActivityEventType::Error => self.theme.error(),
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {:>4}s ", e.timestamp.elapsed().as_secs()),
                        self.theme.dimmed(),
                    ),
                    Span::styled(e.icon(), style),
                    Span::raw(" "),
                    Span::styled(e.message.as_str(), style),
                ])
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.dimmed())
            .title(" ACTIVITY ");

        frame.render_widget(Paragraph::new(events).block(block), area);
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        let focused = self.state.focus == Panel::History;
        let rows: Vec<Line> = if self.state.history.is_empty() {
            vec![Line::from(Span::styled(
                "  No analyses yet",
                self.theme.dimmed(),
            ))]
        } else {
            self.state
                .history
                .iter()
                .enumerate()
                .skip(self.state.history_scroll)
                .flat_map(|(i, entry)| {
                    let kind = entry.label().kind();
                    let marker = if focused && i == self.state.history_scroll {
                        "▶ "
                    } else {
                        "  "
                    };
                    [
                        Line::from(vec![
                            Span::styled(marker, self.theme.accent()),
                            Span::styled(kind.icon(), self.theme.sentiment(kind)),
                            Span::raw(" "),
                            Span::styled(entry.label().display(), self.theme.sentiment(kind)),
                            Span::styled(
                                format!(" {}%", percent(entry.probability)),
                                self.theme.text(),
                            ),
                        ]),
                        Line::from(Span::styled(
                            format!("    {}", entry.text),
                            self.theme.dimmed(),
                        )),
                    ]
                })
                .collect()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.focus_style(Panel::History))
            .title(format!(" {} HISTORY ", icons::HISTORY));

        frame.render_widget(Paragraph::new(rows).block(block), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let help = Line::from(vec![
            Span::styled(" [Enter]", self.theme.accent()),
            Span::styled(" analyze  ", self.theme.dimmed()),
            Span::styled("[Ctrl+U]", self.theme.accent()),
            Span::styled(" clear  ", self.theme.dimmed()),
            Span::styled("[Tab]", self.theme.accent()),
            Span::styled(" focus  ", self.theme.dimmed()),
            Span::styled("[↑↓]", self.theme.accent()),
            Span::styled(" scroll  ", self.theme.dimmed()),
            Span::styled("[Esc]", self.theme.accent()),
            Span::styled(" quit", self.theme.dimmed()),
        ]);

        frame.render_widget(Paragraph::new(help), area);
    }

    fn focus_style(&self, panel: Panel) -> Style {
        if self.state.focus == panel {
            self.theme.highlight()
        } else {
            self.theme.dimmed()
        }
    }
}

/// `[██████░░░░] 60%` style meter
pub fn make_progress_bar(ratio: f64, width: usize) -> String {
    let ratio = ratio.clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let empty = width - filled;
    format!(
        "[{}{}] {}%",
        icons::BAR_FULL.to_string().repeat(filled),
        icons::BAR_EMPTY.to_string().repeat(empty),
        percent(ratio)
    )
}
