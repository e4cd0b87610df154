use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use unicode_width::UnicodeWidthStr;

use crate::analyzer::{self, AnalysisEvent, Backend};
use crate::composer::{QuestionComposer, EXAMPLE_PROMPTS};
use crate::config::AppConfig;

/// How long a status message stays in the info line
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field,
    Presets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

/// Hosts the question composer and owns everything it treats as external:
/// the loading flag and what happens to a submitted question.
pub struct App {
    pub composer: QuestionComposer,
    pub loading: bool,
    pub focus: Focus,
    pub popup: Popup,

    pub backend: Backend,
    pub config: AppConfig,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    // Result panel
    pub last_result: Option<AnalysisEvent>,
    pub result_scroll: u16,
    pub result_width: u16,  // Inner width of the result panel, set by the main loop

    // Picker mode: the question to print on exit
    pub picked: Option<String>,
    pub should_quit: bool,

    events_tx: UnboundedSender<AnalysisEvent>,
    events_rx: UnboundedReceiver<AnalysisEvent>,
}

impl App {
    pub fn new(config: AppConfig, backend: Backend) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            composer: QuestionComposer::new(),
            loading: false,
            focus: Focus::Field,
            popup: Popup::None,

            backend,
            config,

            status_message: None,
            status_message_time: None,

            last_result: None,
            result_scroll: 0,
            result_width: 0,

            picked: None,
            should_quit: false,

            events_tx,
            events_rx,
        }
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.popup != Popup::None {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter) {
                self.popup = Popup::None;
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::F(1) => self.popup = Popup::Help,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Field => Focus::Presets,
                    Focus::Presets => Focus::Field,
                };
            }
            KeyCode::PageDown => {
                self.result_scroll = self.result_scroll.saturating_add(5).min(self.max_result_scroll());
            }
            KeyCode::PageUp => self.result_scroll = self.result_scroll.saturating_sub(5),
            _ => match self.focus {
                Focus::Field => self.handle_field_key(key),
                Focus::Presets => self.handle_presets_key(key),
            },
        }
    }

    fn handle_field_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit(),
            // The field is disabled while loading
            _ if self.loading => {}
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => self.composer.clear(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.composer.insert_char(c),
            KeyCode::Backspace => self.composer.backspace(),
            _ => {}
        }
    }

    fn handle_presets_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.composer.highlight_next(),
            KeyCode::Up | KeyCode::Char('k') => self.composer.highlight_prev(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let index = self.composer.highlighted();
                self.select_preset(index);
            }
            KeyCode::Char(c) => {
                if let Some(digit) = c.to_digit(10) {
                    if digit >= 1 {
                        self.select_preset(digit as usize - 1);
                    }
                }
            }
            _ => {}
        }
    }

    fn select_preset(&mut self, index: usize) {
        if self.composer.select_preset(index, self.loading) {
            self.focus = Focus::Field;
        }
    }

    /// Submit the draft through the composer's guards
    pub fn submit(&mut self) {
        let mut dispatched = None;
        self.composer.submit(self.loading, &mut |question: &str| {
            dispatched = Some(question.to_string());
        });

        if let Some(question) = dispatched {
            self.analyze(question);
        }
    }

    /// The analyze handler: fire and forget from the composer's side
    fn analyze(&mut self, question: String) {
        match &self.backend {
            Backend::Pick => {
                tracing::info!("Picked question: {}", question);
                self.picked = Some(question);
                self.should_quit = true;
            }
            Backend::Command { command, timeout } => {
                let (command, timeout) = (command.clone(), *timeout);
                tracing::info!("Dispatching analysis: {}", question);
                self.loading = true;
                self.result_scroll = 0;
                self.set_status("Analysis started");
                analyzer::spawn_analysis(command, question, timeout, self.events_tx.clone());
            }
        }
    }

    /// Collect finished analyses and expire the status message
    pub fn tick(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.finish_analysis(event);
        }

        if let Some(time) = self.status_message_time {
            if time.elapsed() >= STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    fn finish_analysis(&mut self, event: AnalysisEvent) {
        self.loading = false;

        let summary = match &event {
            AnalysisEvent::Finished { .. } => "Analysis finished",
            AnalysisEvent::Failed { .. } => "Analysis failed",
        };
        self.set_status(summary);

        if self.config.notifications {
            if let Err(e) = notify(summary, event.question()) {
                tracing::warn!("Notification failed: {}", e);
            }
        }

        self.last_result = Some(event);
    }

    /// Last row the result panel can scroll to, counting wrapped rows
    pub fn max_result_scroll(&self) -> u16 {
        let lines: Vec<&str> = match &self.last_result {
            Some(AnalysisEvent::Finished { question, output }) => {
                [question.as_str(), ""].into_iter().chain(output.lines()).collect()
            }
            Some(AnalysisEvent::Failed { question, error }) => {
                [question.as_str(), ""].into_iter().chain(error.lines()).collect()
            }
            None => vec![""],
        };

        let rows: usize = lines
            .iter()
            .map(|line| match self.result_width {
                0 => 1,
                width => line.width().div_ceil(width as usize).max(1),
            })
            .sum();
        u16::try_from(rows.saturating_sub(1)).unwrap_or(u16::MAX)
    }

    /// Number of presets, for the footer hint
    pub fn preset_count(&self) -> usize {
        EXAMPLE_PROMPTS.len()
    }
}

fn notify(summary: &str, body: &str) -> anyhow::Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .appname("soru")
        .show()?;
    Ok(())
}
