// Task store: the ordered collection plus its persisted copy

use crate::error::TaskError;
use crate::filter::Filter;
use crate::persistence::{self, TASKS_KEY};
use crate::storage::SlotStorage;
use crate::task::{Task, TaskId, normalize_text};
use std::fmt;
use tracing::{debug, info, warn};

/// Sample tasks offered from the empty list, in display order
pub const SAMPLE_TASKS: [(&str, bool); 5] = [
    ("Complete project presentation", false),
    ("Buy groceries", false),
    ("Go for a run", false),
    ("Read 30 pages of book", true),
    ("Call mom", false),
];

/// Counts shown under a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summary {
    All { active: usize, total: usize },
    Active { active: usize },
    Completed { completed: usize },
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::All { active, total } => write!(f, "{} active of {} tasks", active, total),
            Summary::Active { active } => write!(f, "{} active tasks", active),
            Summary::Completed { completed } => write!(f, "{} completed tasks", completed),
        }
    }
}

/// Result of [`TaskStore::edit`]
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Text replaced
    Updated(Task),
    /// New text was blank, so the task was removed
    Deleted(Task),
    NotFound,
}

/// Owns the task collection, most recent first
///
/// Every mutation is applied in memory and then saved. When the save fails
/// the mutation is kept, the store is marked dirty and the operation returns
/// [`TaskError::PersistenceFailure`]; [`TaskStore::flush`] retries.
pub struct TaskStore<S: SlotStorage> {
    storage: S,
    tasks: Vec<Task>,
    dirty: bool,
}

impl<S: SlotStorage> TaskStore<S> {
    /// Open a store over `storage`, loading whatever was saved before
    pub fn open(storage: S) -> Result<Self, TaskError> {
        let tasks = persistence::load_tasks(&storage).map_err(|e| TaskError::persistence(TASKS_KEY, e))?;

        Ok(Self {
            storage,
            tasks,
            dirty: false,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// All tasks in collection order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id.refers_to(id))
    }

    /// Whether the in-memory collection has changes the last save missed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a task at the front of the list
    pub fn create(&mut self, raw: &str) -> Result<Task, TaskError> {
        let text = normalize_text(raw).ok_or(TaskError::EmptyInput)?;

        let task = Task::new(self.fresh_id(), text);
        self.tasks.insert(0, task.clone());
        debug!(id = %task.id, "Created task");

        self.persist()?;
        Ok(task)
    }

    /// Flip a task's completed flag; `None` when no task has that id
    pub fn toggle_complete(&mut self, id: &TaskId) -> Result<Option<Task>, TaskError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id.refers_to(id)) else {
            debug!(%id, "Toggle target not found");
            return Ok(None);
        };

        task.completed = !task.completed;
        let task = task.clone();
        debug!(%id, completed = task.completed, "Toggled task");

        self.persist()?;
        Ok(Some(task))
    }

    /// Replace a task's text; blank text removes the task instead
    pub fn edit(&mut self, id: &TaskId, raw: &str) -> Result<EditOutcome, TaskError> {
        let Some(index) = self.position(id) else {
            debug!(%id, "Edit target not found");
            return Ok(EditOutcome::NotFound);
        };

        let outcome = match normalize_text(raw) {
            Some(text) => {
                self.tasks[index].text = text.to_string();
                EditOutcome::Updated(self.tasks[index].clone())
            }
            None => {
                debug!(%id, "Edit left text blank, deleting task");
                EditOutcome::Deleted(self.tasks.remove(index))
            }
        };

        self.persist()?;
        Ok(outcome)
    }

    /// Remove a task; deleting an unknown id changes nothing
    pub fn delete(&mut self, id: &TaskId) -> Result<bool, TaskError> {
        let Some(index) = self.position(id) else {
            debug!(%id, "Delete target not found");
            return Ok(false);
        };

        self.tasks.remove(index);
        debug!(%id, "Deleted task");

        self.persist()?;
        Ok(true)
    }

    /// Remove every completed task, returning how many went
    pub fn clear_completed(&mut self) -> Result<usize, TaskError> {
        let before = self.tasks.len();
        if !self.tasks.iter().any(|t| t.completed) {
            return Err(TaskError::NothingToClear);
        }

        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        info!(removed, "Cleared completed tasks");

        self.persist()?;
        Ok(removed)
    }

    /// Put the sample tasks in front of the list
    pub fn add_samples(&mut self) -> Result<usize, TaskError> {
        let mut samples = Vec::with_capacity(SAMPLE_TASKS.len());
        for (text, completed) in SAMPLE_TASKS {
            let mut task = Task::new(self.fresh_id_excluding(&samples), text);
            task.completed = completed;
            samples.push(task);
        }

        let count = samples.len();
        self.tasks.splice(0..0, samples);
        info!(count, "Added sample tasks");

        self.persist()?;
        Ok(count)
    }

    /// Retry saving the current collection
    pub fn flush(&mut self) -> Result<(), TaskError> {
        self.persist()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tasks in the given view, in collection order
    pub fn filtered_view(&self, filter: Filter) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |t| filter.matches(t))
    }

    pub fn summary(&self, filter: Filter) -> Summary {
        let active = self.tasks.iter().filter(|t| t.is_active()).count();
        let total = self.tasks.len();

        match filter {
            Filter::All => Summary::All { active, total },
            Filter::Active => Summary::Active { active },
            Filter::Completed => Summary::Completed {
                completed: total - active,
            },
        }
    }

    pub fn is_empty_for(&self, filter: Filter) -> bool {
        self.filtered_view(filter).next().is_none()
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id.refers_to(id))
    }

    fn fresh_id(&self) -> TaskId {
        self.fresh_id_excluding(&[])
    }

    fn fresh_id_excluding(&self, pending: &[Task]) -> TaskId {
        loop {
            let id = TaskId::generate();
            let taken = self.tasks.iter().chain(pending).any(|t| t.id.refers_to(&id));
            if !taken {
                return id;
            }
            warn!(%id, "Generated id already in use, drawing another");
        }
    }

    fn persist(&mut self) -> Result<(), TaskError> {
        match persistence::save_tasks(&mut self.storage, &self.tasks) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                warn!(error = ?e, "Failed to save task list, keeping changes in memory");
                Err(TaskError::persistence(TASKS_KEY, e))
            }
        }
    }
}
