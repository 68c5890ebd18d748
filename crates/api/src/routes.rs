use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Instrument;
use uuid::Uuid;

use umls::RelationType;

use crate::metrics::{Metrics, MetricsSnapshot, TimedOperation};
use crate::render;
use crate::shell::{SearchInputs, SearchOutcome, Shell};

#[derive(Clone)]
pub struct AppState {
    /// Locked for a whole trigger, so searches run one at a time.
    shell: Arc<Mutex<Shell>>,
    metrics: Arc<Metrics>,
    key_configured: bool,
    umls_base_url: String,
}

impl AppState {
    pub fn new(shell: Shell, metrics: Arc<Metrics>, umls_base_url: String) -> Self {
        Self {
            key_configured: shell.has_default_api_key(),
            shell: Arc::new(Mutex::new(shell)),
            metrics,
            umls_base_url,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    umls_base_url: String,
    api_key_configured: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search", post(search_page))
        .route("/api/search", post(search_api))
        .route("/api/relation-types", get(relation_types))
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn run_search(state: &AppState, inputs: &SearchInputs) -> SearchOutcome {
    let span = tracing::info_span!(
        "search",
        request_id = %Uuid::new_v4(),
        relation = %inputs.relation_type
    );

    async {
        let shell = state.shell.lock().await;
        let timer = TimedOperation::start();

        let outcome = shell.run(inputs).await;

        state.metrics.record_search(&outcome, timer.elapsed());
        tracing::debug!(status = outcome.status(), "Search trigger finished");
        outcome
    }
    .instrument(span)
    .await
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render::page(&SearchInputs::default(), None, state.key_configured))
}

async fn search_page(
    State(state): State<AppState>,
    Form(inputs): Form<SearchInputs>,
) -> Html<String> {
    let outcome = run_search(&state, &inputs).await;
    Html(render::page(&inputs, Some(&outcome), state.key_configured))
}

async fn search_api(
    State(state): State<AppState>,
    Json(inputs): Json<SearchInputs>,
) -> Json<SearchOutcome> {
    Json(run_search(&state, &inputs).await)
}

async fn relation_types() -> Json<[RelationType; 6]> {
    Json(RelationType::ALL)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        umls_base_url: state.umls_base_url.clone(),
        api_key_configured: state.key_configured,
    })
}

async fn get_stats(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use umls::mock::{MockReplies, MockUts};

    async fn app_for(mock: &MockUts, default_api_key: Option<&str>) -> Router {
        let shell = Shell::new(
            reqwest::Client::new(),
            mock.endpoints(),
            default_api_key.map(str::to_string),
        );
        router(AppState::new(shell, Metrics::new(), mock.base_url().to_string()))
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_renders_form() {
        let mock = MockUts::start(MockReplies::default()).await;
        let app = app_for(&mock, Some("test-key")).await;

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<form method=\"post\" action=\"/search\">"));
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_form_search_renders_tables() {
        let mock = MockUts::start(MockReplies::default()).await;
        let app = app_for(&mock, Some("test-key")).await;

        let request = Request::post("/search")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("term=diabetes&relation_type=children&api_key="))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<td>C0011849</td>"));
        assert!(html.contains("<td>Diabetes mellitus type 2</td>"));
        assert!(html.contains("<h2>children of C0011849</h2>"));
    }

    #[tokio::test]
    async fn test_api_search_blank_term_warns() {
        let mock = MockUts::start(MockReplies::default()).await;
        let app = app_for(&mock, Some("test-key")).await;

        let request = Request::post("/api/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"term": "", "relation_type": "parents"}).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "warning");
        assert_eq!(body["message"], "Please enter both the API Key and the search term.");
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_api_search_found() {
        let mock = MockUts::start(MockReplies::default()).await;
        let app = app_for(&mock, Some("test-key")).await;

        let request = Request::post("/api/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"term": "diabetes", "relation_type": "ancestors"}).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "found");
        assert_eq!(body["cui"], "C0011849");
        assert_eq!(body["relation_type"], "ancestors");
        assert_eq!(body["results"]["columns"], json!(["name", "ui", "rootSource"]));
        assert_eq!(body["hierarchy"]["kind"], "table");
        assert!(mock.requests()[2].path.ends_with("/ancestors"));
    }

    #[tokio::test]
    async fn test_stats_count_triggers() {
        let mock = MockUts::start(MockReplies::default()).await;
        let app = app_for(&mock, None).await;

        let request = Request::post("/api/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"term": "diabetes"}).to_string()))
            .unwrap();
        app.clone().oneshot(request).await.unwrap();

        let response = app
            .oneshot(Request::get("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let stats: Value = serde_json::from_str(&body_text(response).await).unwrap();

        assert_eq!(stats["total_searches"], 1);
        assert_eq!(stats["warnings"], 1);
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_relation_types_and_health() {
        let mock = MockUts::start(MockReplies::default()).await;
        let app = app_for(&mock, None).await;

        let response = app
            .clone()
            .oneshot(Request::get("/api/relation-types").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let relations: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(
            relations,
            json!(["children", "parents", "ancestors", "descendants", "relations", "attributes"])
        );

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let health: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["api_key_configured"], false);
    }
}
