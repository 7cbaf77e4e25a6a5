//! HTTP handlers, one module per resource.

pub mod assets;
pub mod lists;
pub mod todos;

use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;

use crate::api::state::AppState;
use crate::model::{Todo, TodoList};
use crate::session::{Flash, SessionToken};
use crate::store;

// ============================================================================
// View models
// ============================================================================

/// List row for the index page.
#[derive(Debug, Serialize)]
pub(crate) struct ListView {
    pub id: u32,
    pub name: String,
    pub complete: bool,
    pub remaining: usize,
    pub total: usize,
}

impl From<&TodoList> for ListView {
    fn from(list: &TodoList) -> Self {
        Self {
            id: list.id,
            name: list.name.clone(),
            complete: list.is_complete(),
            remaining: list.remaining_count(),
            total: list.todos.len(),
        }
    }
}

/// Todo row on the single-list page.
#[derive(Debug, Serialize)]
pub(crate) struct TodoView {
    pub id: u32,
    pub name: String,
    pub completed: bool,
}

/// Single list with its todos in display order (open before complete).
#[derive(Debug, Serialize)]
pub(crate) struct ListDetail {
    pub id: u32,
    pub name: String,
    pub complete: bool,
    pub todos: Vec<TodoView>,
}

impl From<&TodoList> for ListDetail {
    fn from(list: &TodoList) -> Self {
        let todos = store::display_order(&list.todos, |t: &Todo| t.completed)
            .into_iter()
            .map(|t| TodoView {
                id: t.id,
                name: t.name.clone(),
                completed: t.completed,
            })
            .collect();
        Self {
            id: list.id,
            name: list.name.clone(),
            complete: list.is_complete(),
            todos,
        }
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// True when the request came from fetch/XHR rather than a plain form post.
pub(crate) fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
        .unwrap_or(false)
}

/// Split a flash message into the success/error slots templates expect.
pub(crate) fn flash_pair(flash: Option<Flash>) -> (Option<String>, Option<String>) {
    match flash {
        Some(Flash::Success(msg)) => (Some(msg), None),
        Some(Flash::Error(msg)) => (None, Some(msg)),
        None => (None, None),
    }
}

/// Stale id: flash the message and send the user back to the index. The
/// link may reference a list deleted through another tab.
pub(crate) fn not_found_redirect(state: &AppState, token: &SessionToken, msg: String) -> Response {
    state
        .sessions
        .with_session(&token.0, |session| session.set_flash(Flash::Error(msg)));
    Redirect::to("/lists").into_response()
}
