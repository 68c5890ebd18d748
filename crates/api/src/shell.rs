//! The search workflow behind the page's Search button.
//!
//! One trigger runs validate → search → hierarchy to completion. UMLS failures
//! come back from the client as values and are turned into user-facing messages
//! here, and only here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use projector::{first_cui, project_hierarchy, project_search_results, HierarchyView, Table};
use umls::{RelationType, UmlsClient, UmlsEndpoints, UmlsError};

use crate::config::AppConfig;

pub const MISSING_INPUT: &str = "Please enter both the API Key and the search term.";
pub const CONNECTION_FAILED: &str = "Failed to connect to UMLS API. Review API key and see logs.";
pub const NO_RESULTS: &str = "Failed to find a relevant source for the CUI.";
pub const NO_HIERARCHY: &str = "No hierarchy data available for this item.";

/// Inputs of one trigger. Never kept past the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchInputs {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub relation_type: RelationType,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Missing input; no request was sent.
    Warning { message: String },
    Error {
        message: String,
        results: Option<Table>,
    },
    Found {
        cui: String,
        relation_type: RelationType,
        results: Table,
        hierarchy: HierarchyPanel,
    },
}

impl SearchOutcome {
    fn warning(message: &str) -> Self {
        SearchOutcome::Warning {
            message: message.to_string(),
        }
    }

    fn error(message: &str, results: Option<Table>) -> Self {
        SearchOutcome::Error {
            message: message.to_string(),
            results,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            SearchOutcome::Warning { .. } => "warning",
            SearchOutcome::Error { .. } => "error",
            SearchOutcome::Found { .. } => "found",
        }
    }
}

/// Hierarchy section of a found concept: a table, or an informational note.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HierarchyPanel {
    Table { table: Table },
    Info { message: String },
}

impl HierarchyPanel {
    fn info(message: impl Into<String>) -> Self {
        HierarchyPanel::Info {
            message: message.into(),
        }
    }
}

impl From<HierarchyView> for HierarchyPanel {
    fn from(view: HierarchyView) -> Self {
        match view {
            HierarchyView::Table(table) => HierarchyPanel::Table { table },
            HierarchyView::NoData => HierarchyPanel::info(NO_HIERARCHY),
        }
    }
}

pub struct Shell {
    http: reqwest::Client,
    endpoints: UmlsEndpoints,
    default_api_key: Option<String>,
}

impl Shell {
    pub fn new(http: reqwest::Client, endpoints: UmlsEndpoints, default_api_key: Option<String>) -> Self {
        Self {
            http,
            endpoints,
            default_api_key,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(http, config.endpoints(), config.umls.api_key.clone()))
    }

    pub fn has_default_api_key(&self) -> bool {
        self.default_api_key.is_some()
    }

    /// A key typed into the page wins over the configured one.
    fn api_key_for<'a>(&'a self, inputs: &'a SearchInputs) -> Option<&'a str> {
        inputs
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .or(self.default_api_key.as_deref())
    }

    pub async fn run(&self, inputs: &SearchInputs) -> SearchOutcome {
        // Blank only fails the presence check; the term itself goes out as typed.
        let term = inputs.term.as_str();
        let api_key = match self.api_key_for(inputs) {
            Some(key) if !term.trim().is_empty() => key,
            _ => {
                warn!("Search triggered without API key or search term");
                return SearchOutcome::warning(MISSING_INPUT);
            }
        };

        let client = UmlsClient::new(self.endpoints.clone(), api_key, self.http.clone());

        let body = match client.query(term).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, status = ?e.status(), "Search request failed");
                return SearchOutcome::error(CONNECTION_FAILED, None);
            }
        };

        let results = project_search_results(&body);
        let Some(cui) = first_cui(&body) else {
            info!(term, "Search returned no concepts");
            return SearchOutcome::error(NO_RESULTS, Some(results));
        };

        let relation_type = inputs.relation_type;
        let hierarchy = match client.get_hierarchy(&cui, relation_type).await {
            Ok(body) => HierarchyPanel::from(project_hierarchy(Some(&body))),
            Err(UmlsError::NoSourceCode { cui }) => HierarchyPanel::info(format!(
                "No SNOMEDCT_US source code found for CUI {}.",
                cui
            )),
            Err(e) => {
                warn!(error = %e, status = ?e.status(), "Hierarchy lookup failed");
                HierarchyPanel::from(project_hierarchy(None))
            }
        };

        info!(
            term,
            cui = %cui,
            relation = %relation_type,
            results = results.len(),
            "Search completed"
        );

        SearchOutcome::Found {
            cui,
            relation_type,
            results,
            hierarchy,
        }
    }
}
