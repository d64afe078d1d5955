// Presentation boundary: what the session hands to a UI

use crate::filter::Filter;
use crate::store::Summary;
use crate::task::Task;
use crate::theme::Theme;
use std::fmt;

/// Notification severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Danger,
    Info,
    #[default]
    Default,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
            Severity::Info => "info",
            Severity::Default => "default",
        };
        write!(f, "{}", name)
    }
}

/// Placeholder shown instead of an empty view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The whole list is empty
    NoTasks,
    NoActive,
    NoCompleted,
}

impl EmptyState {
    /// Pick the placeholder for a view, `None` when the view has tasks
    pub fn select(filter: Filter, list_empty: bool, view_empty: bool) -> Option<Self> {
        if list_empty {
            return Some(EmptyState::NoTasks);
        }
        if !view_empty {
            return None;
        }
        match filter {
            Filter::All => Some(EmptyState::NoTasks),
            Filter::Active => Some(EmptyState::NoActive),
            Filter::Completed => Some(EmptyState::NoCompleted),
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            EmptyState::NoTasks => "No tasks yet",
            EmptyState::NoActive => "No active tasks",
            EmptyState::NoCompleted => "No completed tasks yet",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            EmptyState::NoTasks => "Add your first task to get started!",
            EmptyState::NoActive => "You've completed everything!",
            EmptyState::NoCompleted => "Keep going!",
        }
    }

    /// Whether sample tasks are offered
    pub fn offers_samples(self) -> bool {
        self == EmptyState::NoTasks
    }
}

/// Everything a renderer needs to draw one view
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub filter: Filter,
    pub tasks: Vec<&'a Task>,
    pub summary: Summary,
    pub empty: Option<EmptyState>,
    pub theme: Theme,
}

/// Draws the current view
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>);
}

/// Shows transient, severity-tagged messages
pub trait Notifier {
    fn notify(&mut self, message: &str, severity: Severity);

    /// Cosmetic flourish when a task gets completed
    fn celebrate(&mut self) {}
}

/// Headless presenter that keeps what it was given
///
/// Useful for embedding the session without a UI, and in tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    pub notifications: Vec<(String, Severity)>,
    pub renders: Vec<RenderedFrame>,
    pub celebrations: usize,
}

/// Owned copy of a [`Frame`]
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub filter: Filter,
    pub texts: Vec<String>,
    pub summary: Summary,
    pub empty: Option<EmptyState>,
    pub theme: Theme,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_notification(&self) -> Option<(&str, Severity)> {
        self.notifications.last().map(|(m, s)| (m.as_str(), *s))
    }

    pub fn last_render(&self) -> Option<&RenderedFrame> {
        self.renders.last()
    }
}

impl Renderer for RecordingPresenter {
    fn render(&mut self, frame: &Frame<'_>) {
        self.renders.push(RenderedFrame {
            filter: frame.filter,
            texts: frame.tasks.iter().map(|t| t.text.clone()).collect(),
            summary: frame.summary,
            empty: frame.empty,
            theme: frame.theme,
        });
    }
}

impl Notifier for RecordingPresenter {
    fn notify(&mut self, message: &str, severity: Severity) {
        self.notifications.push((message.to_string(), severity));
    }

    fn celebrate(&mut self) {
        self.celebrations += 1;
    }
}
