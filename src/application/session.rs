//! Interactive session controller.
//!
//! [`Session`] owns all mutable state of a run: the active view, the input
//! line, the feedback message, the submission lock and the history. It does
//! no I/O. Events go in through [`Session::handle`]; when a measurement has
//! to be started a [`Command`] comes out and the caller runs it elsewhere,
//! reporting back with [`Event::Measured`].
//!
//! The lock is held from submit until that outcome is delivered, so at most
//! one measurement is in flight.

use crate::domain::{HistoryStore, Measurement, ResptimeError};
use super::{normalize, InputField, ParsedUrl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Request,
    History,
    Help,
    About,
}

impl View {
    pub const ALL: [View; 4] = [View::Request, View::History, View::Help, View::About];

    pub fn index(self) -> usize {
        match self {
            View::Request => 0,
            View::History => 1,
            View::Help => 2,
            View::About => 3,
        }
    }

    pub fn next(self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn previous(self) -> View {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Request => "Request",
            View::History => "History",
            View::Help => "Help",
            View::About => "About",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    None,
    Loading,
    Success,
    Error(String),
}

/// User intent, already translated from raw key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Submit,
    NextView,
    PreviousView,
    SelectUp,
    SelectDown,
    Insert(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
}

/// Outcome of a dispatched measurement, tagged with the id it was started with.
#[derive(Debug)]
pub struct Outcome {
    pub id: u32,
    pub result: Result<Measurement, ResptimeError>,
}

#[derive(Debug)]
pub enum Event {
    Key(Action),
    Resize { width: u16, height: u16 },
    Tick,
    Measured(Outcome),
}

/// Work the session asks its driver to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Measure { url: ParsedUrl, id: u32 },
    Quit,
}

#[derive(Debug)]
pub struct Session {
    view: View,
    input: InputField,
    feedback: Feedback,
    locked: bool,
    in_flight: Option<u32>,
    history: HistoryStore,
    selected: Option<usize>,
    size: (u16, u16),
    quit: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            view: View::Request,
            input: InputField::new(),
            feedback: Feedback::None,
            locked: false,
            in_flight: None,
            history: HistoryStore::new(),
            selected: None,
            size: (0, 0),
            quit: false,
        }
    }

    pub fn view(&self) -> View { self.view }
    pub fn input(&self) -> &InputField { &self.input }
    pub fn feedback(&self) -> &Feedback { &self.feedback }
    pub fn is_locked(&self) -> bool { self.locked }
    pub fn history(&self) -> &HistoryStore { &self.history }
    pub fn selected(&self) -> Option<usize> { self.selected }
    pub fn size(&self) -> (u16, u16) { self.size }
    pub fn should_quit(&self) -> bool { self.quit }

    /// The record shown in the Request view: the latest successful one.
    pub fn current(&self) -> Option<&Measurement> {
        self.history.latest()
    }

    pub fn handle(&mut self, event: Event) -> Option<Command> {
        match event {
            Event::Key(action) => self.apply(action),
            Event::Resize { width, height } => {
                self.size = (width, height);
                None
            }
            Event::Tick => None,
            Event::Measured(outcome) => {
                self.complete(outcome);
                None
            }
        }
    }

    fn apply(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::Quit => {
                self.quit = true;
                Some(Command::Quit)
            }
            Action::NextView => {
                self.view = self.view.next();
                None
            }
            Action::PreviousView => {
                self.view = self.view.previous();
                None
            }
            Action::Submit if self.view == View::Request => self.submit(),
            Action::SelectUp if self.view == View::History => {
                self.move_selection(-1);
                None
            }
            Action::SelectDown if self.view == View::History => {
                self.move_selection(1);
                None
            }
            edit if self.view == View::Request => {
                self.edit(edit);
                None
            }
            _ => None,
        }
    }

    fn edit(&mut self, action: Action) {
        match action {
            Action::Insert(c) => self.input.insert(c),
            Action::Backspace => self.input.backspace(),
            Action::Delete => self.input.delete(),
            Action::CursorLeft => self.input.left(),
            Action::CursorRight => self.input.right(),
            Action::CursorHome => self.input.home(),
            Action::CursorEnd => self.input.end(),
            _ => {}
        }
    }

    fn submit(&mut self) -> Option<Command> {
        if self.locked {
            tracing::debug!("submit ignored, measurement in flight");
            return None;
        }
        self.locked = true;
        self.feedback = Feedback::Loading;

        match normalize(self.input.value()) {
            Ok(url) => {
                let id = self.history.next_id();
                self.in_flight = Some(id);
                tracing::info!(id, %url, "dispatching measurement");
                Some(Command::Measure { url, id })
            }
            Err(e) => {
                tracing::info!(input = self.input.value(), error = %e, "rejected input");
                self.feedback = Feedback::Error(e.format_feedback());
                self.locked = false;
                None
            }
        }
    }

    fn complete(&mut self, outcome: Outcome) {
        if self.in_flight != Some(outcome.id) {
            tracing::warn!(id = outcome.id, expected = ?self.in_flight, "dropping outcome of unknown measurement");
            return;
        }
        self.in_flight = None;
        self.locked = false;

        match outcome.result {
            Ok(record) => {
                self.history.append(record);
                self.feedback = Feedback::Success;
            }
            Err(e) => {
                tracing::warn!(id = outcome.id, error = %e, "measurement failed");
                self.feedback = Feedback::Error(e.format_feedback());
            }
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.history.len();
        if len == 0 {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        self.selected = Some((current + delta).clamp(0, len as isize - 1) as usize);
    }
}
