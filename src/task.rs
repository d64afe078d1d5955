// Data model for the task list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task identifier
///
/// Older saved lists used wall-clock milliseconds as ids, newer ones use
/// UUIDv7 strings. The untagged representation keeps whichever JSON form was
/// loaded so a save writes it back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(i64),
    Text(String),
}

impl TaskId {
    /// Generate a fresh time-ordered identifier
    pub fn generate() -> Self {
        TaskId::Text(uuid::Uuid::now_v7().to_string())
    }

    /// Whether `self` names the same task as `other`
    ///
    /// A lookup key parsed from text and a stored id can disagree on
    /// representation (`123` vs `"123"`), so mixed pairs compare as text.
    pub fn refers_to(&self, other: &TaskId) -> bool {
        match (self, other) {
            (TaskId::Number(a), TaskId::Number(b)) => a == b,
            (TaskId::Text(a), TaskId::Text(b)) => a == b,
            (TaskId::Number(n), TaskId::Text(s)) | (TaskId::Text(s), TaskId::Number(n)) => n.to_string() == *s,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Number(n) => write!(f, "{}", n),
            TaskId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for TaskId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_empty()
            && s.bytes().all(|b| b.is_ascii_digit())
            && let Ok(n) = s.parse::<i64>()
        {
            return Ok(TaskId::Number(n));
        }
        Ok(TaskId::Text(s.to_string()))
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Build an active task stamped with the current time
    ///
    /// `text` is expected to be trimmed and non-empty already.
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            created_at: Some(now()),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// Trim user input, returning `None` when nothing is left
pub fn normalize_text(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

// Helper function for timestamps
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_serialization_uses_camel_case() {
        let task = Task::new(TaskId::Text("abc".to_string()), "Buy milk");

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"id\":\"abc\""));
        assert!(json.contains("\"text\":\"Buy milk\""));
        assert!(json.contains("\"completed\":false"));
        assert!(json.contains("\"createdAt\":"));

        let deserialized: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, task);
    }

    #[test]
    fn test_legacy_record_with_numeric_id() {
        let json = r#"{"id":1700000000000,"text":"Call mom","completed":true,"createdAt":"2023-11-14T22:13:20.000Z"}"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, TaskId::Number(1_700_000_000_000));
        assert!(task.completed);
        assert!(task.created_at.is_some());

        // Numeric ids are written back as numbers
        let out = serde_json::to_string(&task).unwrap();
        assert!(out.contains("\"id\":1700000000000"));
    }

    #[test]
    fn test_missing_created_at_is_omitted() {
        let json = r#"{"id":5,"text":"Go for a run","completed":false}"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.created_at.is_none());

        let out = serde_json::to_string(&task).unwrap();
        assert!(!out.contains("createdAt"));
    }

    #[test]
    fn test_task_id_from_str() {
        assert_eq!("42".parse::<TaskId>().unwrap(), TaskId::Number(42));
        assert_eq!(
            " 0192-abc ".parse::<TaskId>().unwrap(),
            TaskId::Text("0192-abc".to_string())
        );
    }

    #[test]
    fn test_task_id_from_str_only_digits_are_numbers() {
        assert_eq!("-5".parse::<TaskId>().unwrap(), TaskId::Text("-5".to_string()));
        assert_eq!("+5".parse::<TaskId>().unwrap(), TaskId::Text("+5".to_string()));
        assert_eq!(
            "99999999999999999999".parse::<TaskId>().unwrap(),
            TaskId::Text("99999999999999999999".to_string())
        );
    }

    #[test]
    fn test_refers_to_across_representations() {
        let number = TaskId::Number(123);
        let text = TaskId::Text("123".to_string());

        assert!(number.refers_to(&text));
        assert!(text.refers_to(&number));
        assert!(number.refers_to(&TaskId::Number(123)));
        assert!(!number.refers_to(&TaskId::Text("0123".to_string())));
        assert!(!text.refers_to(&TaskId::Text("124".to_string())));
    }

    #[test]
    fn test_generated_ids_differ() {
        let a = TaskId::generate();
        let b = TaskId::generate();
        assert_ne!(a, b);
        assert!(matches!(a, TaskId::Text(_)));
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  hello "), Some("hello"));
        assert_eq!(normalize_text("   "), None);
        assert_eq!(normalize_text(""), None);
    }
}
