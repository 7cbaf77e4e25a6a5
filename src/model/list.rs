use serde::{Deserialize, Serialize};

/// A single todo item. Ids are unique within the owning list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u32,
    pub name: String,
    pub completed: bool,
}

/// A named, ordered collection of todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl TodoList {
    /// A list counts as complete once it has at least one todo and none
    /// remain open. An empty list is never complete.
    pub fn is_complete(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|t| t.completed)
    }

    /// Number of todos still open.
    pub fn remaining_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }
}
