pub mod list;

pub use list::{Todo, TodoList};
