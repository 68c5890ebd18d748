//! In-process stand-in for the UTS REST API, for tests.
//!
//! Serves the three endpoints the client uses on `127.0.0.1:0` with canned
//! replies, and records every request so tests can assert call counts.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::client::{UmlsEndpoints, DEFAULT_VERSION};

#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
}

impl MockReply {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: json!({"status": status, "error": "mock failure"}).to_string(),
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockReplies {
    pub search: MockReply,
    pub atoms: MockReply,
    pub hierarchy: MockReply,
}

/// Diabetes mellitus: one MSH atom ahead of its SNOMEDCT_US atom, two children.
impl Default for MockReplies {
    fn default() -> Self {
        Self {
            search: MockReply::ok(json!({
                "pageSize": 25,
                "pageNumber": 1,
                "result": {
                    "classType": "searchResults",
                    "results": [
                        {
                            "ui": "C0011849",
                            "rootSource": "MTH",
                            "uri": "https://uts-ws.nlm.nih.gov/rest/content/current/CUI/C0011849",
                            "name": "Diabetes Mellitus"
                        },
                        {
                            "ui": "C0011847",
                            "rootSource": "MTH",
                            "uri": "https://uts-ws.nlm.nih.gov/rest/content/current/CUI/C0011847",
                            "name": "Diabetes"
                        }
                    ]
                }
            })),
            atoms: MockReply::ok(json!({
                "pageSize": 25,
                "pageNumber": 1,
                "result": [
                    {
                        "classType": "Atom",
                        "rootSource": "MSH",
                        "code": "https://uts-ws.nlm.nih.gov/rest/content/current/source/MSH/D003920",
                        "name": "Diabetes Mellitus"
                    },
                    {
                        "classType": "Atom",
                        "rootSource": "SNOMEDCT_US",
                        "code": "https://uts-ws.nlm.nih.gov/rest/content/current/source/SNOMEDCT_US/73211009",
                        "name": "Diabetes mellitus"
                    }
                ]
            })),
            hierarchy: MockReply::ok(json!({
                "pageSize": 25,
                "pageNumber": 1,
                "result": [
                    {
                        "classType": "SourceAtomCluster",
                        "ui": "44054006",
                        "rootSource": "SNOMEDCT_US",
                        "name": "Diabetes mellitus type 2"
                    },
                    {
                        "classType": "SourceAtomCluster",
                        "ui": "46635009",
                        "rootSource": "SNOMEDCT_US",
                        "name": "Diabetes mellitus type 1",
                        "obsolete": false
                    }
                ]
            })),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
}

struct MockState {
    replies: MockReplies,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockState {
    fn record(&self, uri: &Uri, query: HashMap<String, String>) {
        let request = RecordedRequest {
            path: uri.path().to_string(),
            query,
        };
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .push(request);
    }
}

pub struct MockUts {
    base_url: String,
    state: Arc<MockState>,
}

impl MockUts {
    pub async fn start(replies: MockReplies) -> Self {
        let state = Arc::new(MockState {
            replies,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/rest/search/:version", get(search))
            .route("/rest/content/:version/CUI/:cui/atoms", get(atoms))
            .route(
                "/rest/content/:version/source/SNOMEDCT_US/:code/:relation",
                get(hierarchy),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock UTS listener");
        let addr = listener.local_addr().expect("mock UTS address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock UTS server");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoints(&self) -> UmlsEndpoints {
        UmlsEndpoints::new(&self.base_url, DEFAULT_VERSION)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("mock request log poisoned")
            .clone()
    }

    pub fn total_calls(&self) -> usize {
        self.requests().len()
    }

    pub fn search_calls(&self) -> usize {
        self.count(|path| path.starts_with("/rest/search/"))
    }

    pub fn atoms_calls(&self) -> usize {
        self.count(|path| path.ends_with("/atoms"))
    }

    pub fn hierarchy_calls(&self) -> usize {
        self.count(|path| path.contains("/source/SNOMEDCT_US/"))
    }

    fn count(&self, matches: impl Fn(&str) -> bool) -> usize {
        self.requests()
            .iter()
            .filter(|request| matches(&request.path))
            .count()
    }
}

fn reply(reply: &MockReply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body.clone(),
    )
        .into_response()
}

async fn search(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.record(&uri, query);
    reply(&state.replies.search)
}

async fn atoms(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.record(&uri, query);
    reply(&state.replies.atoms)
}

async fn hierarchy(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.record(&uri, query);
    reply(&state.replies.hierarchy)
}
