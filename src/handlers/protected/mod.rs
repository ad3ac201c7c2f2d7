pub mod todos;

// Re-export handler functions for use in routing
pub use todos::create as todo_create;
pub use todos::delete as todo_delete;
pub use todos::list as todo_list;
pub use todos::update as todo_update;
