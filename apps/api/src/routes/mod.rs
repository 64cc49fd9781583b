pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::matching::handlers as ai;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Candidates API
        .route("/api/v1/candidates", get(candidates::handle_list))
        .route(
            "/api/v1/candidates/search",
            get(candidates::handle_search_get).post(candidates::handle_search_post),
        )
        .route(
            "/api/v1/candidates/compare",
            post(candidates::handle_compare),
        )
        .route(
            "/api/v1/candidates/insight",
            post(candidates::handle_insight),
        )
        .route(
            "/api/v1/candidates/:id",
            get(candidates::handle_get_candidate),
        )
        // Writing assists
        .route("/api/v1/ai/summary", post(ai::handle_generate_summary))
        .route("/api/v1/ai/bullet", post(ai::handle_improve_bullet))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::TextGenerator;
    use crate::matching::interpreter::DEFAULT_SUMMARY;
    use crate::matching::scoring::tests::StubGenerator;
    use crate::matching::AiService;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Router whose pool never connects; only routes that skip the database are exercised.
    fn app(llm: Arc<dyn TextGenerator>) -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://talentmatch@localhost/talentmatch")
            .unwrap();
        build_router(AppState {
            db,
            ai: AiService::new(llm),
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(StubGenerator::replying(""))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_compare_rejects_empty_id_list() {
        let response = app(StubGenerator::replying("[]"))
            .oneshot(post_json(
                "/api/v1/candidates/compare",
                json!({ "roleDescription": "Rust engineer", "candidateIds": [] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_compare_blank_role_is_empty_without_model_call() {
        let stub = StubGenerator::replying("[]");
        let response = app(stub.clone())
            .oneshot(post_json(
                "/api/v1/candidates/compare",
                json!({ "roleDescription": "   ", "candidateIds": [1, 2] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!([]));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_summary_endpoint_returns_interpreted_summary() {
        let stub = StubGenerator::replying("{\"summary\": \"Pragmatic systems engineer.\"}");
        let response = app(stub)
            .oneshot(post_json(
                "/api/v1/ai/summary",
                json!({ "title": "Engineer", "skills": ["Rust"] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({ "summary": "Pragmatic systems engineer." })
        );
    }

    #[tokio::test]
    async fn test_summary_endpoint_gateway_failure_returns_default_summary() {
        let stub = StubGenerator::failing();
        let response = app(stub.clone())
            .oneshot(post_json("/api/v1/ai/summary", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({ "summary": DEFAULT_SUMMARY })
        );
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_bullet_endpoint_gateway_failure_returns_original_bullet() {
        let stub = StubGenerator::failing();
        let response = app(stub.clone())
            .oneshot(post_json(
                "/api/v1/ai/bullet",
                json!({ "bullet": "made deploys faster", "roleContext": "DevOps" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({ "bullet": "made deploys faster" })
        );
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_bullet_endpoint_rejects_blank_bullet() {
        let stub = StubGenerator::replying("{\"bullet\": \"x\"}");
        let response = app(stub.clone())
            .oneshot(post_json("/api/v1/ai/bullet", json!({ "bullet": "  " })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_bullet_endpoint_returns_rewrite() {
        let stub = StubGenerator::replying("{\"bullet\": \"Reduced deploy time by 60%.\"}");
        let response = app(stub)
            .oneshot(post_json(
                "/api/v1/ai/bullet",
                json!({ "bullet": "made deploys faster", "roleContext": "DevOps" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({ "bullet": "Reduced deploy time by 60%." })
        );
    }
}
