use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Represents the priority of a task.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority.
    #[default]
    Medium,
    /// High priority.
    High,
}

/// Input structure for creating a task.
/// Only `title` is required; everything else falls back to a default.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[validate(schema(function = "validate_location"))]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    pub done: bool,

    #[serde(default)]
    pub priority: TaskPriority,

    #[serde(default)]
    pub lat: Option<f64>,

    #[serde(default)]
    pub lng: Option<f64>,

    #[validate(length(max = 500))]
    #[serde(default)]
    pub address: Option<String>,
}

/// Coordinates, when given, must lie on the map.
fn validate_location(input: &TaskInput) -> Result<(), ValidationError> {
    if let Some(lat) = input.lat {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::new("latitude_out_of_range"));
        }
    }
    if let Some(lng) = input.lng {
        if !(-180.0..=180.0).contains(&lng) {
            return Err(ValidationError::new("longitude_out_of_range"));
        }
    }
    Ok(())
}

impl TaskInput {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            done: false,
            priority: TaskPriority::default(),
            lat: None,
            lng: None,
            address: None,
        }
    }
}

/// A task as held in the task store and returned by the API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    /// Server-assigned identifier, unique within the store.
    pub id: i64,
    pub title: String,
    pub done: bool,
    pub priority: TaskPriority,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: Option<String>,
}

impl Task {
    pub fn new(id: i64, input: TaskInput) -> Self {
        Self {
            id,
            title: input.title,
            done: input.done,
            priority: input.priority,
            lat: input.lat,
            lng: input.lng,
            address: input.address,
        }
    }
}

/// Body returned by `POST /tasks/{id}/execute`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskExecuteResponse {
    pub id: i64,
    pub done: bool,
}
