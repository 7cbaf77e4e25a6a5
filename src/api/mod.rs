//! Web server: router assembly and startup.

pub mod handlers;
pub mod state;
pub mod templates;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::session;
use state::AppState;

/// Build the application router. Every route runs behind the session
/// middleware, which resolves the caller's session before handlers run.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::lists::home))
        .route(
            "/lists",
            get(handlers::lists::index).post(handlers::lists::create),
        )
        .route("/lists/new", get(handlers::lists::new_form))
        .route(
            "/lists/{id}",
            get(handlers::lists::show).post(handlers::lists::rename),
        )
        .route("/lists/{id}/edit", get(handlers::lists::edit_form))
        .route("/lists/{id}/delete", post(handlers::lists::delete))
        .route(
            "/lists/{id}/complete_all",
            post(handlers::lists::complete_all),
        )
        .route("/lists/{id}/todos", post(handlers::todos::create))
        .route(
            "/lists/{id}/todos/{todo_id}",
            post(handlers::todos::set_completed),
        )
        .route(
            "/lists/{id}/todos/{todo_id}/delete",
            post(handlers::todos::delete),
        )
        .route("/assets/{*path}", get(handlers::assets::serve))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::session_middleware,
        ))
        .with_state(state)
}

/// Start the web server. Blocks until the listener fails or the process
/// is terminated.
pub async fn start_server(host: &str, port: u16) -> std::io::Result<()> {
    let state = Arc::new(AppState::new());
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app).await.map_err(std::io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(Arc::new(AppState::new()))
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Grab the bare `name=value` pair out of a Set-Cookie header.
    fn session_cookie(response: &axum::response::Response) -> String {
        response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_root_redirects_to_index() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/lists");
    }

    #[tokio::test]
    async fn test_every_response_carries_a_session_cookie() {
        let response = app()
            .oneshot(Request::get("/lists").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response);
        assert!(cookie.starts_with("checklist_session="));
    }

    #[tokio::test]
    async fn test_create_list_and_see_it_on_the_index() {
        let app = app();

        let response = app
            .clone()
            .oneshot(form_post("/lists", "list_name=Groceries"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/lists");
        let cookie = session_cookie(&response);

        let response = app
            .oneshot(
                Request::get("/lists")
                    .header(header::COOKIE, cookie.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Groceries"));
        assert!(html.contains("The list has been created."));
    }

    #[tokio::test]
    async fn test_invalid_list_name_re_renders_the_form() {
        let response = app()
            .oneshot(form_post("/lists", "list_name="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("List name must be between 1 and 100 characters."));
    }

    #[tokio::test]
    async fn test_stale_list_id_redirects_to_index() {
        let response = app()
            .oneshot(Request::get("/lists/999").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/lists");
    }

    #[tokio::test]
    async fn test_xhr_delete_returns_no_content() {
        let app = app();

        let response = app
            .clone()
            .oneshot(form_post("/lists", "list_name=Groceries"))
            .await
            .unwrap();
        let cookie = session_cookie(&response);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/lists/1/delete")
                    .header(header::COOKIE, cookie.as_str())
                    .header("x-requested-with", "XMLHttpRequest")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_todo_toggle_round_trip() {
        let app = app();

        let response = app
            .clone()
            .oneshot(form_post("/lists", "list_name=Groceries"))
            .await
            .unwrap();
        let cookie = session_cookie(&response);

        let with_cookie = |req: Request<Body>| {
            let (mut parts, body) = req.into_parts();
            parts
                .headers
                .insert(header::COOKIE, cookie.parse().unwrap());
            Request::from_parts(parts, body)
        };

        let response = app
            .clone()
            .oneshot(with_cookie(form_post("/lists/1/todos", "todo=Milk")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/lists/1");

        let response = app
            .clone()
            .oneshot(with_cookie(form_post("/lists/1/todos/1", "completed=true")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app
            .oneshot(with_cookie(
                Request::get("/lists/1").body(Body::empty()).unwrap(),
            ))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Milk"));
        // A completed todo offers the Undo action
        assert!(html.contains("Undo"));
    }

    #[tokio::test]
    async fn test_embedded_stylesheet_is_served() {
        let response = app()
            .oneshot(
                Request::get("/assets/styles.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    }
}
