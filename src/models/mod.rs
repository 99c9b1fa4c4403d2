pub mod task;
pub mod user;

pub use task::{Task, TaskCreate, TaskPatch};
pub use user::User;
