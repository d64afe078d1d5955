// Error taxonomy for task list operations

/// Errors surfaced by [`TaskStore`](crate::store::TaskStore) operations.
///
/// Every variant is recoverable; none should end the session.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Create was called with blank text.
    #[error("task text cannot be empty")]
    EmptyInput,

    /// Clear-completed was requested with no completed tasks.
    #[error("no completed tasks to clear")]
    NothingToClear,

    /// A durable slot could not be read or written.
    #[error("storage error on `{key}`: {reason}")]
    PersistenceFailure {
        /// Slot key.
        key: String,
        /// Error description, including its cause chain.
        reason: String,
    },
}

impl TaskError {
    pub(crate) fn persistence(key: &str, err: eyre::Report) -> Self {
        TaskError::PersistenceFailure {
            key: key.to_string(),
            reason: format!("{:#}", err),
        }
    }
}
