//! In-memory state shared by all request handlers.
//!
//! Handlers only see the `CredentialStore` and `TaskStore` traits, injected as
//! `web::Data<dyn ...>`, so tests can swap in their own implementations.

pub mod tasks;
pub mod users;

use crate::error::AppError;
use crate::models::{Task, TaskExecuteResponse, TaskInput, User};

pub use tasks::InMemoryTaskStore;
pub use users::InMemoryCredentialStore;

/// Read-only lookup of user records by username.
pub trait CredentialStore: Send + Sync {
    /// Returns the user record for `username`, if any.
    fn find(&self, username: &str) -> Option<User>;

    /// Returns the user when `password` matches the stored hash, `None` for an
    /// unknown username or a wrong password.
    fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>, AppError>;
}

/// Process-lifetime task list.
pub trait TaskStore: Send + Sync {
    fn list(&self) -> Result<Vec<Task>, AppError>;

    /// Appends a task with the next free id (`max(existing) + 1`).
    fn create(&self, input: TaskInput) -> Result<Task, AppError>;

    /// Marks the task done. `AppError::NotFound` if the id is unknown.
    fn execute(&self, id: i64) -> Result<TaskExecuteResponse, AppError>;
}
