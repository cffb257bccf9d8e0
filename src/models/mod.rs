pub mod task;
pub mod user;

pub use task::{Task, TaskExecuteResponse, TaskInput, TaskPriority};
pub use user::{Role, User, UserProfile};
