pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryTodoStore;
pub use models::todo::{NewTodo, Todo, TodoChanges};
pub use repository::PgTodoStore;
pub use store::TodoStore;
