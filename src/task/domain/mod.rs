//! Domain model for tasks.
//!
//! Tasks reference their project by identifier only. Raw records are
//! coerced here so the registry only ever sees canonical string ids.

mod ids;
mod sort_key;
mod task;

pub use ids::TaskId;
pub use sort_key::TaskSortKey;
pub use task::{DueDate, NewTask, Task, TaskStatus};
