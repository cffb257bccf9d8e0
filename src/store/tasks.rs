use std::sync::{Mutex, MutexGuard};

use crate::error::AppError;
use crate::models::{Task, TaskExecuteResponse, TaskInput, TaskPriority};
use crate::store::TaskStore;

/// Task store guarded by a single mutex. Id assignment and the done flip both
/// happen while the lock is held.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: Mutex<Vec<Task>>,
}

impl InMemoryTaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
        }
    }

    /// The three demo tasks the service starts with.
    pub fn seeded() -> Self {
        Self::new(vec![
            Task {
                id: 1,
                title: "Przygotować backend API".to_string(),
                done: true,
                priority: TaskPriority::High,
                lat: Some(52.2297),
                lng: Some(21.0122),
                address: Some("Warszawa".to_string()),
            },
            Task {
                id: 2,
                title: "Zaimplementować logowanie w Angularze".to_string(),
                done: false,
                priority: TaskPriority::Medium,
                lat: Some(50.0647),
                lng: Some(19.945),
                address: Some("Kraków".to_string()),
            },
            Task {
                id: 3,
                title: "Dodać interceptor JWT".to_string(),
                done: false,
                priority: TaskPriority::High,
                lat: None,
                lng: None,
                address: None,
            },
        ])
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Task>>, AppError> {
        self.tasks
            .lock()
            .map_err(|_| AppError::InternalServerError("task store lock poisoned".into()))
    }
}

impl TaskStore for InMemoryTaskStore {
    fn list(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.lock()?.clone())
    }

    fn create(&self, input: TaskInput) -> Result<Task, AppError> {
        let mut tasks = self.lock()?;
        let id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let task = Task::new(id, input);
        tasks.push(task.clone());
        Ok(task)
    }

    fn execute(&self, id: i64) -> Result<TaskExecuteResponse, AppError> {
        let mut tasks = self.lock()?;
        match tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.done = true;
                Ok(TaskExecuteResponse { id, done: true })
            }
            None => Err(AppError::NotFound("Task not found".into())),
        }
    }
}
