pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::layout::handlers as layout;
use crate::preview::handlers as preview;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Layout API
        .route("/api/v1/layout/plan", post(layout::handle_plan))
        .route("/api/v1/layout/print", post(layout::handle_print))
        .route("/api/v1/layout/style", post(layout::handle_resolve_style))
        .route("/api/v1/layout/fit", post(layout::handle_fit))
        .route(
            "/api/v1/layout/consistency",
            post(layout::handle_consistency),
        )
        // Preview API
        .route("/api/v1/preview/sessions", post(preview::handle_open_session))
        .route(
            "/api/v1/preview/sessions/:id",
            get(preview::handle_get_session).delete(preview::handle_close_session),
        )
        .route(
            "/api/v1/preview/sessions/:id/evaluations",
            post(preview::handle_begin_evaluation),
        )
        .route(
            "/api/v1/preview/sessions/:id/evaluations/:generation",
            post(preview::handle_complete_evaluation),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;

    fn app() -> Router {
        build_router(AppState::new(Config::default()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn work_items(n: usize, points: usize) -> Vec<Value> {
        (0..n)
            .map(|i| {
                json!({
                    "company": format!("Company {i}"),
                    "position": "Engineer",
                    "points": vec!["x"; points],
                    "displayOrder": i
                })
            })
            .collect()
    }

    // ── health ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    // ── layout ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_plan_ten_items_two_pages() {
        let doc = json!({
            "personal": { "name": "Ada", "title": "Engineer" },
            "work": work_items(10, 3)
        });
        let (status, body) = send(&app(), Method::POST, "/api/v1/layout/plan", Some(doc)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pageModel"]["pages"].as_array().unwrap().len(), 2);
        assert_eq!(body["budget"]["capacity"], 5.0);
        assert_eq!(body["pageFill"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_plan_rejects_invalid_sections() {
        let doc = json!({ "activeSections": ["work", "personal"] });
        let (status, body) = send(&app(), Method::POST, "/api/v1/layout/plan", Some(doc)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_plan_rejects_oversized_section() {
        let doc = json!({ "work": work_items(101, 0) });
        let (status, _) = send(&app(), Method::POST, "/api/v1/layout/plan", Some(doc)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_print_document_pages() {
        let doc = json!({ "summary": "Hello", "work": work_items(6, 3) });
        let (status, body) = send(&app(), Method::POST, "/api/v1/layout/print", Some(doc)).await;
        assert_eq!(status, StatusCode::OK);
        let pages = body["pages"].as_array().unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0]["nodes"][0]["node"], "identity");
        assert_eq!(pages[1]["nodes"][0]["node"], "entry");
    }

    #[tokio::test]
    async fn test_style_resolution() {
        let style = json!({ "fontSize": 12.0, "template": "modern" });
        let (status, body) = send(&app(), Method::POST, "/api/v1/layout/style", Some(style)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["domVars"]["--resume-font-size"], "12pt");
        assert_eq!(body["printStyles"]["fontSizePt"], 12.0);

        let bad = json!({ "fontSize": 30.0 });
        let (status, _) = send(&app(), Method::POST, "/api/v1/layout/style", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_fit_boundary() {
        let (_, body) = send(
            &app(),
            Method::POST,
            "/api/v1/layout/fit",
            Some(json!({ "renderedHeightPx": 2000.0 })),
        )
        .await;
        assert_eq!(body["fits"], false);
        assert_eq!(body["cssClass"], "allow-pagination");

        let (_, body) = send(
            &app(),
            Method::POST,
            "/api/v1/layout/fit",
            Some(json!({ "renderedHeightPx": 400.0 })),
        )
        .await;
        assert_eq!(body["fits"], true);
        assert_eq!(body["mode"], "single_page");
    }

    #[tokio::test]
    async fn test_consistency_endpoint() {
        let req = json!({
            "document": { "work": work_items(2, 0) },
            "measuredHeights": {
                "units": [
                    { "key": { "unit": "personal" }, "heightPx": 120.0 },
                    { "key": { "unit": "block", "section": "work", "index": 0 }, "heightPx": 100.0 },
                    { "key": { "unit": "block", "section": "work", "index": 1 }, "heightPx": 100.0 }
                ]
            }
        });
        let (status, body) =
            send(&app(), Method::POST, "/api/v1/layout/consistency", Some(req)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["plannedPages"], 1);
        assert_eq!(body["measuredPages"], 1);
        assert_eq!(body["consistent"], true);
        assert_eq!(body["tolerance"], 1);
    }

    // ── preview sessions ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_preview_session_last_write_wins() {
        let app = app();
        let (status, session) = send(&app, Method::POST, "/api/v1/preview/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = session["sessionId"].as_str().unwrap().to_string();
        let evals = format!("/api/v1/preview/sessions/{id}/evaluations");

        let (_, first) = send(
            &app,
            Method::POST,
            &evals,
            Some(json!({ "trigger": "content_changed" })),
        )
        .await;
        let (_, second) = send(&app, Method::POST, &evals, Some(json!({ "trigger": "resize" }))).await;
        let first_gen = first["generation"].as_u64().unwrap();
        let second_gen = second["generation"].as_u64().unwrap();
        assert!(second_gen > first_gen);

        let (status, verdict) = send(
            &app,
            Method::POST,
            &format!("{evals}/{second_gen}"),
            Some(json!({ "renderedHeightPx": 1500.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(verdict["fits"], false);

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("{evals}/{first_gen}"),
            Some(json!({ "renderedHeightPx": 10.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "STALE_EVALUATION");

        let (_, state) = send(
            &app,
            Method::GET,
            &format!("/api/v1/preview/sessions/{id}"),
            None,
        )
        .await;
        assert_eq!(state["latest"]["fits"], false);
        assert_eq!(state["generation"], second_gen);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/preview/sessions/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_idle_session_expires() {
        let app = build_router(AppState::new(Config {
            preview_session_ttl_secs: 0,
            ..Config::default()
        }));
        let (status, session) = send(&app, Method::POST, "/api/v1/preview/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = session["sessionId"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/preview/sessions/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let uri = format!("/api/v1/preview/sessions/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app(), Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
