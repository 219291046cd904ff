use serde::{Deserialize, Serialize};

/// Todo lifecycle state. Stored and serialized as its integer discriminant,
/// matching the archive wire format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl From<TodoStatus> for i32 {
    fn from(status: TodoStatus) -> i32 {
        match status {
            TodoStatus::Pending => 0,
            TodoStatus::InProgress => 1,
            TodoStatus::Completed => 2,
        }
    }
}

impl TryFrom<i32> for TodoStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TodoStatus::Pending),
            1 => Ok(TodoStatus::InProgress),
            2 => Ok(TodoStatus::Completed),
            other => Err(format!("Unknown todo status: {}", other)),
        }
    }
}

/// Todo priority. Same integer encoding rules as [`TodoStatus`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum TodoPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl From<TodoPriority> for i32 {
    fn from(priority: TodoPriority) -> i32 {
        match priority {
            TodoPriority::Low => 0,
            TodoPriority::Medium => 1,
            TodoPriority::High => 2,
        }
    }
}

impl TryFrom<i32> for TodoPriority {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TodoPriority::Low),
            1 => Ok(TodoPriority::Medium),
            2 => Ok(TodoPriority::High),
            other => Err(format!("Unknown todo priority: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_integer_encoding() {
        assert_eq!(serde_json::to_string(&TodoStatus::InProgress).unwrap(), "1");
        let decoded: TodoStatus = serde_json::from_str("2").unwrap();
        assert_eq!(decoded, TodoStatus::Completed);
    }

    #[test]
    fn test_priority_rejects_unknown_discriminant() {
        assert!(serde_json::from_str::<TodoPriority>("7").is_err());
    }
}
