pub mod health;

use std::any::Any;

use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
};

use crate::errors::INTERNAL_ERROR_MESSAGE;
use crate::screening::handlers;
use crate::state::AppState;

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Answers every OPTIONS request with an empty 204 carrying the CORS headers.
async fn preflight(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }

    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
        ],
    )
        .into_response()
}

/// Turns a handler panic into the same generic 500 as any other internal error.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("Handler panicked: {detail}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler).fallback(not_found))
        .route(
            "/analyze",
            post(handlers::handle_analyze).fallback(not_found),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer())
        .layer(middleware::from_fn(preflight))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request as HttpRequest;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::testing::{tagged_reply, ScriptedModel};
    use crate::llm_client::{LlmError, ModelInvoker};

    fn test_state(model: Arc<dyn ModelInvoker>) -> AppState {
        AppState {
            model,
            config: Config {
                anthropic_api_key: "test-key".to_string(),
                port: 0,
                rust_log: "info".to_string(),
                llm_timeout: Duration::from_secs(5),
            },
        }
    }

    fn app_with(replies: Vec<Result<String, LlmError>>) -> (Router, Arc<ScriptedModel>) {
        let model = Arc::new(ScriptedModel::new(replies));
        (build_router(test_state(model.clone())), model)
    }

    fn post_json(uri: &str, body: &str) -> Request {
        HttpRequest::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn assert_json_with_cors(response: &Response) {
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_returns_parsed_results() {
        let (app, model) = app_with(vec![Ok(
            "FIT_SCORE: 9\nRISK_SCORE: 2\nVERDICT: Strong match.\nREPORT:\nAlignment: ...\n"
                .to_string(),
        )]);
        let body = r#"{"jd": "Backend engineer, Go, 3+ yrs",
                       "resumes": [{"id": "A", "text": "5 years Go, built a job scheduler"}]}"#;

        let response = app.oneshot(post_json("/analyze", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(
            json_body(response).await,
            json!({"results": [{
                "id": "A",
                "fitScore": 9,
                "riskScore": 2,
                "verdict": "Strong match.",
                "report": "Alignment: ..."
            }]})
        );
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_partial_failure_is_still_ok() {
        let (app, _) = app_with(vec![
            Ok(tagged_reply(7, 2, "Good", "Alignment: yes")),
            Err(LlmError::EmptyContent),
        ]);
        let body = r#"{"jd": "SRE", "resumes": [{"id": "A", "text": "a"}, {"id": "B", "text": "b"}]}"#;

        let response = app.oneshot(post_json("/analyze", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["results"][0]["fitScore"], 7);
        assert!(json["results"][1]["fitScore"].is_null());
        assert_eq!(json["results"][1]["verdict"], "Analysis failed");
    }

    #[tokio::test]
    async fn test_missing_jd_is_bad_request() {
        let (app, model) = app_with(vec![]);
        let body = r#"{"resumes": [{"id": "A", "text": "a"}]}"#;

        let response = app.oneshot(post_json("/analyze", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_json_with_cors(&response);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Missing 'jd' in request body"})
        );
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_null_jd_is_bad_request() {
        let (app, model) = app_with(vec![]);
        let body = r#"{"jd": null, "resumes": [{"id": "A", "text": "a"}]}"#;

        let response = app.oneshot(post_json("/analyze", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_json_with_cors(&response);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Missing 'jd' in request body"})
        );
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_null_resumes_is_bad_request() {
        let (app, _) = app_with(vec![]);

        let response = app
            .oneshot(post_json("/analyze", r#"{"jd": "x", "resumes": null}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Provide at least one resume"})
        );
    }

    #[tokio::test]
    async fn test_empty_resumes_is_bad_request() {
        let (app, _) = app_with(vec![]);

        let response = app
            .oneshot(post_json("/analyze", r#"{"jd": "SRE", "resumes": []}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Provide at least one resume"})
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_generic_server_error() {
        let (app, _) = app_with(vec![]);

        let response = app
            .oneshot(post_json("/analyze", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_json_with_cors(&response);
        assert_eq!(
            json_body(response).await,
            json!({"error": INTERNAL_ERROR_MESSAGE})
        );
    }

    #[tokio::test]
    async fn test_preflight_is_no_content_with_cors_headers() {
        let (app, _) = app_with(vec![]);
        let request = HttpRequest::builder()
            .method(Method::OPTIONS)
            .uri("/anything")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOWED_HEADERS);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_path_and_method_are_not_found() {
        for (method, uri) in [(Method::GET, "/nope"), (Method::GET, "/analyze")] {
            let (app, _) = app_with(vec![]);
            let request = HttpRequest::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();

            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&bytes[..], b"Not found");
        }
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let (app, _) = app_with(vec![]);
        let request = HttpRequest::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    /// A programming fault escaping the handler, not a model-call failure.
    struct PanickingModel;

    #[async_trait]
    impl ModelInvoker for PanickingModel {
        async fn invoke(&self, _prompt: &str, _timeout: Duration) -> Result<String, LlmError> {
            panic!("model client bug");
        }
    }

    #[tokio::test]
    async fn test_panic_escaping_handler_is_caught_as_server_error() {
        let app = build_router(test_state(Arc::new(PanickingModel)));
        let body = r#"{"jd": "SRE", "resumes": [{"id": "A", "text": "a"}]}"#;

        let response = app.oneshot(post_json("/analyze", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": INTERNAL_ERROR_MESSAGE})
        );
    }
}
