// Session: drives a task store on behalf of a UI

use crate::error::TaskError;
use crate::filter::Filter;
use crate::present::{EmptyState, Frame, Notifier, Renderer, Severity};
use crate::storage::SlotStorage;
use crate::store::{EditOutcome, TaskStore};
use crate::task::{Task, TaskId};
use crate::theme::{self, Theme};
use tracing::warn;

/// How the user points at a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// 1-based position in the current view
    Position(usize),
    Id(TaskId),
}

/// A store, the UI state around it (filter and theme) and a presenter
///
/// Each action runs one store operation, reports the outcome through the
/// presenter's [`Notifier`] and redraws through its [`Renderer`]. Errors are
/// reported before they are returned, so callers may ignore them.
pub struct Session<S: SlotStorage, P: Renderer + Notifier> {
    store: TaskStore<S>,
    presenter: P,
    filter: Filter,
    theme: Theme,
}

impl<S: SlotStorage, P: Renderer + Notifier> Session<S, P> {
    pub fn new(store: TaskStore<S>, presenter: P) -> Self {
        let theme = theme::load_theme(store.storage());
        Self {
            store,
            presenter,
            filter: Filter::All,
            theme,
        }
    }

    /// Start on a view other than [`Filter::All`]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Snapshot of the current view
    pub fn frame(&self) -> Frame<'_> {
        build_frame(&self.store, self.filter, self.theme)
    }

    pub fn render(&mut self) {
        let frame = build_frame(&self.store, self.filter, self.theme);
        self.presenter.render(&frame);
    }

    /// Task id behind a selector, if it points at anything
    pub fn resolve(&self, selector: &Selector) -> Option<TaskId> {
        match selector {
            Selector::Position(0) => None,
            Selector::Position(n) => self.store.filtered_view(self.filter).nth(n - 1).map(|t| t.id.clone()),
            Selector::Id(id) => self.store.get(id).map(|t| t.id.clone()),
        }
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.render();
    }

    // ========================================================================
    // Actions
    // ========================================================================

    pub fn add(&mut self, raw: &str) -> Result<Task, TaskError> {
        let result = self.store.create(raw);
        if result.is_ok() {
            self.presenter.notify("Task added successfully!", Severity::Success);
        }
        self.finish(result)
    }

    /// Toggle the selected task; `None` when the selector matches nothing
    pub fn toggle(&mut self, selector: &Selector) -> Result<Option<Task>, TaskError> {
        let Some(id) = self.resolve(selector) else {
            return Ok(None);
        };

        let result = self.store.toggle_complete(&id);
        if let Ok(Some(task)) = &result
            && task.completed
        {
            self.presenter.notify("Task completed!", Severity::Success);
            self.presenter.celebrate();
        }
        self.finish(result)
    }

    pub fn edit(&mut self, selector: &Selector, raw: &str) -> Result<EditOutcome, TaskError> {
        let Some(id) = self.resolve(selector) else {
            return Ok(EditOutcome::NotFound);
        };

        let result = self.store.edit(&id, raw);
        match &result {
            Ok(EditOutcome::Updated(_)) => self.presenter.notify("Task updated!", Severity::Info),
            Ok(EditOutcome::Deleted(_)) => self.presenter.notify("Task deleted", Severity::Danger),
            _ => {}
        }
        self.finish(result)
    }

    pub fn delete(&mut self, selector: &Selector) -> Result<bool, TaskError> {
        let Some(id) = self.resolve(selector) else {
            return Ok(false);
        };

        let result = self.store.delete(&id);
        if let Ok(true) = result {
            self.presenter.notify("Task deleted", Severity::Danger);
        }
        self.finish(result)
    }

    pub fn clear_completed(&mut self) -> Result<usize, TaskError> {
        let result = self.store.clear_completed();
        if result.is_ok() {
            self.presenter.notify("Completed tasks cleared", Severity::Info);
        }
        self.finish(result)
    }

    pub fn add_samples(&mut self) -> Result<usize, TaskError> {
        let result = self.store.add_samples();
        if result.is_ok() {
            self.presenter.notify("Sample tasks added!", Severity::Success);
        }
        self.finish(result)
    }

    /// Retry saving after an earlier persistence failure
    pub fn flush(&mut self) -> Result<(), TaskError> {
        if !self.store.is_dirty() {
            return Ok(());
        }
        let result = self.store.flush();
        if result.is_ok() {
            self.presenter.notify("Tasks saved", Severity::Info);
        }
        self.finish(result)
    }

    /// Switch the theme and remember the choice
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(e) = theme::save_theme(self.store.storage_mut(), theme) {
            warn!(error = ?e, "Failed to save theme preference");
            self.presenter
                .notify(&format!("Could not save theme: {:#}", e), Severity::Danger);
        }
        self.render();
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.theme.toggled());
    }

    /// Report errors, then redraw when the collection may have changed
    fn finish<T>(&mut self, result: Result<T, TaskError>) -> Result<T, TaskError> {
        match &result {
            Ok(_) => self.render(),
            Err(err) => {
                self.report(err);
                if matches!(err, TaskError::PersistenceFailure { .. }) {
                    self.render();
                }
            }
        }
        result
    }

    fn report(&mut self, err: &TaskError) {
        match err {
            TaskError::EmptyInput => self.presenter.notify("Please enter a task", Severity::Warning),
            TaskError::NothingToClear => self
                .presenter
                .notify("No completed tasks to clear", Severity::Warning),
            TaskError::PersistenceFailure { reason, .. } => self
                .presenter
                .notify(&format!("Could not save tasks: {}", reason), Severity::Danger),
        }
    }
}

fn build_frame<S: SlotStorage>(store: &TaskStore<S>, filter: Filter, theme: Theme) -> Frame<'_> {
    let tasks: Vec<&Task> = store.filtered_view(filter).collect();
    Frame {
        filter,
        empty: EmptyState::select(filter, store.is_empty(), tasks.is_empty()),
        tasks,
        summary: store.summary(filter),
        theme,
    }
}
