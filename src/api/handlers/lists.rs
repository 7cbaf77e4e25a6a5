//! List handlers: index, create, rename, delete, complete-all.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form};
use minijinja::context;
use serde::Deserialize;

use super::{flash_pair, is_xhr, not_found_redirect, ListDetail, ListView};
use crate::api::state::AppState;
use crate::api::templates;
use crate::error::{AppError, Result};
use crate::model::TodoList;
use crate::session::{Flash, SessionToken};
use crate::store;

#[derive(Debug, Deserialize)]
pub struct ListForm {
    pub list_name: String,
}

/// GET /
pub async fn home() -> Redirect {
    Redirect::to("/lists")
}

/// GET /lists
pub async fn index(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
) -> Result<Response> {
    let (lists, flash) = state.sessions.with_session(&token.0, |session| {
        let lists: Vec<ListView> =
            store::display_order(session.store.lists(), TodoList::is_complete)
                .into_iter()
                .map(ListView::from)
                .collect();
        (lists, session.take_flash())
    });

    let (flash_success, flash_error) = flash_pair(flash);
    let html = templates::render(
        "lists.html",
        context! { lists, flash_success, flash_error },
    )?;
    Ok(Html(html).into_response())
}

/// GET /lists/new
pub async fn new_form(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
) -> Result<Response> {
    let flash = state
        .sessions
        .with_session(&token.0, |session| session.take_flash());
    let (flash_success, flash_error) = flash_pair(flash);

    let html = templates::render("new_list.html", context! { flash_success, flash_error })?;
    Ok(Html(html).into_response())
}

/// POST /lists
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Form(form): Form<ListForm>,
) -> Result<Response> {
    let outcome = state.sessions.with_session(&token.0, |session| {
        match session.store.create_list(&form.list_name) {
            Ok(list) => {
                let id = list.id;
                tracing::info!(list = id, "created list");
                session.set_flash(Flash::Success("The list has been created.".to_string()));
                Ok(())
            }
            Err(e) => Err(e),
        }
    });

    match outcome {
        Ok(()) => Ok(Redirect::to("/lists").into_response()),
        Err(AppError::Validation(msg)) => {
            let html = templates::render(
                "new_list.html",
                context! { error => msg, list_name => form.list_name.trim() },
            )?;
            Ok(Html(html).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /lists/{id}
pub async fn show(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Path(id): Path<u32>,
) -> Result<Response> {
    let outcome = state.sessions.with_session(&token.0, |session| {
        match session.store.find_list(id) {
            Ok(list) => {
                let detail = ListDetail::from(list);
                Ok((detail, session.take_flash()))
            }
            Err(e) => Err(e),
        }
    });

    match outcome {
        Ok((list, flash)) => {
            let (flash_success, flash_error) = flash_pair(flash);
            let html = templates::render(
                "list.html",
                context! { list, flash_success, flash_error },
            )?;
            Ok(Html(html).into_response())
        }
        Err(e) => Ok(not_found_redirect(&state, &token, e.to_string())),
    }
}

/// GET /lists/{id}/edit
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Path(id): Path<u32>,
) -> Result<Response> {
    let outcome = state.sessions.with_session(&token.0, |session| {
        match session.store.find_list(id) {
            Ok(list) => {
                let view = ListView::from(list);
                Ok((view, session.take_flash()))
            }
            Err(e) => Err(e),
        }
    });

    match outcome {
        Ok((list, flash)) => {
            let (flash_success, flash_error) = flash_pair(flash);
            let html = templates::render(
                "edit_list.html",
                context! { list, flash_success, flash_error },
            )?;
            Ok(Html(html).into_response())
        }
        Err(e) => Ok(not_found_redirect(&state, &token, e.to_string())),
    }
}

enum RenameOutcome {
    Done,
    Invalid { msg: String, list: ListView },
    Missing(String),
}

/// POST /lists/{id}
pub async fn rename(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Path(id): Path<u32>,
    Form(form): Form<ListForm>,
) -> Result<Response> {
    let outcome = state.sessions.with_session(&token.0, |session| {
        match session.store.rename_list(id, &form.list_name) {
            Ok(()) => {
                session.set_flash(Flash::Success("The list has been updated.".to_string()));
                RenameOutcome::Done
            }
            Err(AppError::Validation(msg)) => match session.store.find_list(id) {
                Ok(list) => RenameOutcome::Invalid {
                    msg,
                    list: ListView::from(list),
                },
                Err(e) => RenameOutcome::Missing(e.to_string()),
            },
            Err(e) => RenameOutcome::Missing(e.to_string()),
        }
    });

    match outcome {
        RenameOutcome::Done => Ok(Redirect::to(&format!("/lists/{}", id)).into_response()),
        RenameOutcome::Invalid { msg, list } => {
            let html = templates::render(
                "edit_list.html",
                context! { list, error => msg, list_name => form.list_name.trim() },
            )?;
            Ok(Html(html).into_response())
        }
        RenameOutcome::Missing(msg) => Ok(not_found_redirect(&state, &token, msg)),
    }
}

/// POST /lists/{id}/delete
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Path(id): Path<u32>,
    headers: HeaderMap,
) -> Response {
    let xhr = is_xhr(&headers);
    state.sessions.with_session(&token.0, |session| {
        session.store.delete_list(id);
        if !xhr {
            session.set_flash(Flash::Success("The list has been deleted.".to_string()));
        }
    });
    tracing::info!(list = id, "deleted list");

    if xhr {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Redirect::to("/lists").into_response()
    }
}

/// POST /lists/{id}/complete_all
pub async fn complete_all(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
    Path(id): Path<u32>,
) -> Response {
    let outcome = state.sessions.with_session(&token.0, |session| {
        session.store.complete_all(id).map(|()| {
            session.set_flash(Flash::Success("All todos have been completed.".to_string()));
        })
    });

    match outcome {
        Ok(()) => Redirect::to(&format!("/lists/{}", id)).into_response(),
        Err(e) => not_found_redirect(&state, &token, e.to_string()),
    }
}
