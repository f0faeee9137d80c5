// todostore - Local to-do list store with smart sorting and JSON import/export

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod render;
pub mod session;
pub mod shell;
pub mod store;
pub mod task;
pub mod transfer;

// Re-export main types for convenience
pub use config::Config;
pub use error::ValidationError;
pub use filter::{ListFilter, PriorityFilter, StatusFilter};
pub use session::{Session, Summary};
pub use store::Store;
pub use task::{Priority, Task, TaskFields, parse_due_date};
