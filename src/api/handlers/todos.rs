//! Todo handlers: add, toggle, delete.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form};
use minijinja::context;
use serde::Deserialize;

use super::{is_xhr, not_found_redirect, ListDetail};
use crate::api::state::AppState;
use crate::api::templates;
use crate::error::{AppError, Result};
use crate::session::{Flash, SessionToken};

#[derive(Debug, Deserialize)]
pub struct TodoForm {
    pub todo: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletedForm {
    pub completed: bool,
}

enum AddOutcome {
    Done,
    Invalid { msg: String, list: ListDetail },
    Missing(String),
}

/// POST /lists/{id}/todos
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Path(id): Path<u32>,
    Form(form): Form<TodoForm>,
) -> Result<Response> {
    let outcome = state.sessions.with_session(&token.0, |session| {
        match session.store.add_todo(id, &form.todo) {
            Ok(todo) => {
                let todo_id = todo.id;
                tracing::debug!(list = id, todo = todo_id, "added todo");
                session.set_flash(Flash::Success("The todo was added.".to_string()));
                AddOutcome::Done
            }
            Err(AppError::Validation(msg)) => match session.store.find_list(id) {
                Ok(list) => AddOutcome::Invalid {
                    msg,
                    list: ListDetail::from(list),
                },
                Err(e) => AddOutcome::Missing(e.to_string()),
            },
            Err(e) => AddOutcome::Missing(e.to_string()),
        }
    });

    match outcome {
        AddOutcome::Done => Ok(Redirect::to(&format!("/lists/{}", id)).into_response()),
        AddOutcome::Invalid { msg, list } => {
            let html = templates::render(
                "list.html",
                context! { list, error => msg, todo_text => form.todo.trim() },
            )?;
            Ok(Html(html).into_response())
        }
        AddOutcome::Missing(msg) => Ok(not_found_redirect(&state, &token, msg)),
    }
}

/// POST /lists/{id}/todos/{todo_id}
pub async fn set_completed(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Path((id, todo_id)): Path<(u32, u32)>,
    Form(form): Form<CompletedForm>,
) -> Response {
    let outcome = state.sessions.with_session(&token.0, |session| {
        session
            .store
            .set_todo_completed(id, todo_id, form.completed)
            .map(|()| {
                session.set_flash(Flash::Success("The todo has been updated.".to_string()));
            })
    });

    match outcome {
        Ok(()) => Redirect::to(&format!("/lists/{}", id)).into_response(),
        Err(e) => not_found_redirect(&state, &token, e.to_string()),
    }
}

/// POST /lists/{id}/todos/{todo_id}/delete
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Path((id, todo_id)): Path<(u32, u32)>,
    headers: HeaderMap,
) -> Response {
    let xhr = is_xhr(&headers);
    let outcome = state.sessions.with_session(&token.0, |session| {
        session.store.delete_todo(id, todo_id).map(|()| {
            if !xhr {
                session.set_flash(Flash::Success("The todo has been deleted.".to_string()));
            }
        })
    });

    match outcome {
        Ok(()) if xhr => StatusCode::NO_CONTENT.into_response(),
        Ok(()) => Redirect::to(&format!("/lists/{}", id)).into_response(),
        Err(e) => not_found_redirect(&state, &token, e.to_string()),
    }
}
