// tasklist - Persistent task list with filtered views

pub mod config;
pub mod error;
pub mod filter;
pub mod persistence;
pub mod present;
pub mod session;
pub mod shell;
pub mod storage;
pub mod store;
pub mod task;
pub mod terminal;
pub mod theme;

// Re-export main types for convenience
pub use error::TaskError;
pub use filter::Filter;
pub use present::{EmptyState, Frame, Notifier, RecordingPresenter, Renderer, Severity};
pub use session::{Selector, Session};
pub use storage::{FileStorage, MemoryStorage, SlotStorage, SqliteStorage};
pub use store::{EditOutcome, Summary, TaskStore};
pub use task::{Task, TaskId};
pub use theme::Theme;
