//! In-session list store.
//!
//! Owns every list and todo for one session and enforces the validation
//! rules: names and todo text are 1-100 characters after trimming, list
//! names are unique (case-sensitive). All errors are values the caller
//! branches on.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::model::{Todo, TodoList};

/// Valid length range for list names and todo text, in characters.
const NAME_LEN: RangeInclusive<usize> = 1..=100;

pub const LIST_NOT_FOUND: &str = "The specified list was not found.";
pub const TODO_NOT_FOUND: &str = "The specified todo was not found.";

/// All lists belonging to one session. Serializes to
/// `{ "lists": [ { id, name, todos: [ { id, name, completed } ] } ] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListStore {
    #[serde(default)]
    lists: Vec<TodoList>,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lists in insertion order.
    pub fn lists(&self) -> &[TodoList] {
        &self.lists
    }

    /// Next list id: `max(existing) + 1`, or 1 when empty. Deleting the
    /// max-id list frees its id for reuse by the next create; kept as-is.
    fn next_list_id(&self) -> u32 {
        self.lists.iter().map(|l| l.id).max().unwrap_or(0) + 1
    }

    /// Validate a list name. `exclude` skips one list in the uniqueness
    /// check so a list can be renamed to its own current name.
    fn validate_list_name(&self, name: &str, exclude: Option<u32>) -> Result<()> {
        if !NAME_LEN.contains(&name.chars().count()) {
            return Err(AppError::validation(
                "List name must be between 1 and 100 characters.",
            ));
        }
        let taken = self
            .lists
            .iter()
            .any(|l| l.name == name && Some(l.id) != exclude);
        if taken {
            return Err(AppError::validation("List name must be unique."));
        }
        Ok(())
    }

    fn validate_todo_text(text: &str) -> Result<()> {
        if !NAME_LEN.contains(&text.chars().count()) {
            return Err(AppError::validation(
                "Todo must be between 1 and 100 characters.",
            ));
        }
        Ok(())
    }

    /// Create a list with the given name, appended at the end.
    pub fn create_list(&mut self, name: &str) -> Result<&TodoList> {
        let name = name.trim();
        self.validate_list_name(name, None)?;

        let list = TodoList {
            id: self.next_list_id(),
            name: name.to_string(),
            todos: Vec::new(),
        };
        self.lists.push(list);
        Ok(self.lists.last().expect("non-empty after push"))
    }

    /// Linear search by id.
    pub fn find_list(&self, id: u32) -> Result<&TodoList> {
        self.lists
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::not_found(LIST_NOT_FOUND))
    }

    fn find_list_mut(&mut self, id: u32) -> Result<&mut TodoList> {
        self.lists
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::not_found(LIST_NOT_FOUND))
    }

    /// Rename a list. Renaming to the current name is allowed.
    pub fn rename_list(&mut self, id: u32, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        self.find_list(id)?;
        self.validate_list_name(new_name, Some(id))?;

        let list = self.find_list_mut(id)?;
        list.name = new_name.to_string();
        Ok(())
    }

    /// Remove a list. Silently succeeds when the id is already gone.
    pub fn delete_list(&mut self, id: u32) {
        self.lists.retain(|l| l.id != id);
    }

    /// Append a new open todo to a list.
    pub fn add_todo(&mut self, list_id: u32, text: &str) -> Result<&Todo> {
        let text = text.trim();
        self.find_list(list_id)?;
        Self::validate_todo_text(text)?;

        let list = self.find_list_mut(list_id)?;
        let id = list.todos.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        list.todos.push(Todo {
            id,
            name: text.to_string(),
            completed: false,
        });
        Ok(list.todos.last().expect("non-empty after push"))
    }

    /// Remove a todo. No-op when the todo id is already gone.
    pub fn delete_todo(&mut self, list_id: u32, todo_id: u32) -> Result<()> {
        let list = self.find_list_mut(list_id)?;
        list.todos.retain(|t| t.id != todo_id);
        Ok(())
    }

    /// Set the completion flag on one todo.
    pub fn set_todo_completed(&mut self, list_id: u32, todo_id: u32, completed: bool) -> Result<()> {
        let list = self.find_list_mut(list_id)?;
        let todo = list
            .todos
            .iter_mut()
            .find(|t| t.id == todo_id)
            .ok_or_else(|| AppError::not_found(TODO_NOT_FOUND))?;
        todo.completed = completed;
        Ok(())
    }

    /// Mark every todo in a list complete.
    pub fn complete_all(&mut self, list_id: u32) -> Result<()> {
        let list = self.find_list_mut(list_id)?;
        for todo in &mut list.todos {
            todo.completed = true;
        }
        Ok(())
    }
}

/// Stable display partition: open items first, completed items last,
/// relative order preserved within each group. Render-time only; the
/// stored order never changes.
pub fn display_order<T>(items: &[T], done: impl Fn(&T) -> bool) -> Vec<&T> {
    let (complete, open): (Vec<&T>, Vec<&T>) = items.iter().partition(|item| done(item));
    open.into_iter().chain(complete).collect()
}
