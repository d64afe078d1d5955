// Loading and saving the task collection

use crate::storage::SlotStorage;
use crate::task::Task;
use eyre::{Context, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Slot holding the serialized task collection
pub const TASKS_KEY: &str = "tasks";

/// Load the task collection
///
/// Returns an empty collection when nothing was saved yet or when the saved
/// value is not valid JSON for a task list. Records with blank text and
/// records repeating an earlier id are dropped. A storage read failure is
/// returned as an error.
pub fn load_tasks<S: SlotStorage + ?Sized>(storage: &S) -> Result<Vec<Task>> {
    let raw = match storage.read_slot(TASKS_KEY).context("Failed to read task list")? {
        Some(raw) => raw,
        None => {
            debug!("No saved task list, starting empty");
            return Ok(Vec::new());
        }
    };

    let parsed: Vec<Task> = match serde_json::from_str(&raw) {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!(
                key = TASKS_KEY,
                error = ?e,
                "Failed to parse saved task list, discarding it"
            );
            return Ok(Vec::new());
        }
    };

    // Keyed by text so `123` and `"123"` count as the same id
    let mut seen: HashSet<String> = HashSet::with_capacity(parsed.len());
    let mut tasks = Vec::with_capacity(parsed.len());

    for (index, task) in parsed.into_iter().enumerate() {
        if task.text.trim().is_empty() {
            warn!(index, id = %task.id, "Skipping saved task with empty text");
            continue;
        }
        if !seen.insert(task.id.to_string()) {
            warn!(index, id = %task.id, "Skipping saved task with duplicate id");
            continue;
        }
        tasks.push(task);
    }

    info!(count = tasks.len(), "Loaded task list");
    Ok(tasks)
}

/// Save the whole task collection, replacing what was there
pub fn save_tasks<S: SlotStorage + ?Sized>(storage: &mut S, tasks: &[Task]) -> Result<()> {
    let json = serde_json::to_string(tasks).context("Failed to serialize task list")?;
    storage.write_slot(TASKS_KEY, &json).context("Failed to write task list")?;

    debug!(count = tasks.len(), "Saved task list");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};
    use crate::task::TaskId;
    use tempfile::TempDir;

    fn sample() -> Vec<Task> {
        let mut done = Task::new(TaskId::Text("b".to_string()), "Read 30 pages of book");
        done.completed = true;
        vec![
            Task::new(TaskId::Text("a".to_string()), "Buy groceries"),
            done,
            Task {
                id: TaskId::Number(1_700_000_000_000),
                text: "Call mom".to_string(),
                completed: false,
                created_at: None,
            },
        ]
    }

    #[test]
    fn test_load_missing_slot_is_empty() {
        let storage = MemoryStorage::new();
        assert!(load_tasks(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::open(temp.path()).unwrap();
        let tasks = sample();

        save_tasks(&mut storage, &tasks).unwrap();
        let loaded = load_tasks(&storage).unwrap();

        assert_eq!(loaded, tasks);
    }

    #[test]
    fn test_load_corrupt_slot_is_empty() {
        let mut storage = MemoryStorage::new();
        storage.write_slot(TASKS_KEY, "{not json").unwrap();

        assert!(load_tasks(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let mut storage = MemoryStorage::new();
        storage.write_slot(TASKS_KEY, r#"{"id":1,"text":"x"}"#).unwrap();

        assert!(load_tasks(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_load_skips_blank_and_duplicate_records() {
        let mut storage = MemoryStorage::new();
        storage
            .write_slot(
                TASKS_KEY,
                r#"[
                    {"id":1,"text":"First","completed":false},
                    {"id":2,"text":"   ","completed":false},
                    {"id":1,"text":"Duplicate","completed":true},
                    {"id":"x","text":"Other","completed":true},
                    {"id":"1","text":"Same id as text","completed":false}
                ]"#,
            )
            .unwrap();

        let tasks = load_tasks(&storage).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text, "First");
        assert_eq!(tasks[1].id, TaskId::Text("x".to_string()));
    }

    #[test]
    fn test_load_non_utf8_slot_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::open(temp.path()).unwrap();
        std::fs::write(temp.path().join("tasks.json"), [0xff, 0xfe, b'[', b']']).unwrap();

        assert!(load_tasks(&storage).unwrap().is_empty());
    }
}
