use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Call, UmlsError, UmlsResult};
use crate::relation::RelationType;
use crate::schema::{source_code_from_atoms, AtomsResponse, SNOMEDCT_US};

pub const DEFAULT_BASE_URL: &str = "https://uts-ws.nlm.nih.gov";
pub const DEFAULT_VERSION: &str = "current";

/// Precomputed search and content endpoints for one UTS release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UmlsEndpoints {
    search: String,
    content: String,
}

impl UmlsEndpoints {
    pub fn new(base_url: &str, version: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            search: format!("{}/rest/search/{}", base, version),
            content: format!("{}/rest/content/{}", base, version),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    fn atoms(&self, cui: &str) -> String {
        format!("{}/CUI/{}/atoms", self.content, cui)
    }

    fn relation(&self, source_code: &str, relation: RelationType) -> String {
        format!(
            "{}/source/{}/{}/{}",
            self.content, SNOMEDCT_US, source_code, relation
        )
    }
}

impl Default for UmlsEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_VERSION)
    }
}

/// Read-only client for the UTS REST API.
///
/// Every failure (transport, non-200, undecodable body) is logged here and
/// handed back as an [`UmlsError`] value; nothing panics.
#[derive(Clone)]
pub struct UmlsClient {
    endpoints: UmlsEndpoints,
    api_key: String,
    client: reqwest::Client,
}

impl UmlsClient {
    pub fn new(endpoints: UmlsEndpoints, api_key: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoints,
            api_key: api_key.into(),
            client,
        }
    }

    pub fn endpoints(&self) -> &UmlsEndpoints {
        &self.endpoints
    }

    /// Search concepts by free text. Returns the raw response body.
    pub async fn query(&self, term: &str) -> UmlsResult<Value> {
        let request = self
            .client
            .get(self.endpoints.search())
            .query(&[("string", term), ("apiKey", self.api_key.as_str())]);

        let body: Value = self.fetch(Call::Search, request).await?;
        debug!(term, "Search succeeded");
        Ok(body)
    }

    /// Resolve a CUI to its SNOMEDCT_US source code via the concept's atoms.
    pub async fn resolve_source_code(&self, cui: &str) -> UmlsResult<String> {
        let request = self
            .client
            .get(self.endpoints.atoms(cui))
            .query(&[("apiKey", self.api_key.as_str())]);

        let atoms: AtomsResponse = self.fetch(Call::Source, request).await?;

        match source_code_from_atoms(&atoms.result) {
            Some(code) => {
                debug!(cui, code = %code, "Resolved SNOMEDCT_US code");
                Ok(code)
            }
            None => {
                warn!(
                    cui,
                    atoms = atoms.result.len(),
                    "Failed to find SNOMEDCT_US ID for the given CUI"
                );
                Err(UmlsError::NoSourceCode {
                    cui: cui.to_string(),
                })
            }
        }
    }

    /// Fetch a relation of the concept's SNOMEDCT_US code.
    ///
    /// The relation request is only sent once the source code resolved.
    pub async fn get_hierarchy(&self, cui: &str, relation: RelationType) -> UmlsResult<Value> {
        let source_code = self.resolve_source_code(cui).await?;

        let request = self
            .client
            .get(self.endpoints.relation(&source_code, relation))
            .query(&[("apiKey", self.api_key.as_str())]);

        let body: Value = self.fetch(Call::Hierarchy, request).await?;
        debug!(cui, source_code = %source_code, relation = %relation, "Hierarchy fetched");
        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        call: Call,
        request: reqwest::RequestBuilder,
    ) -> UmlsResult<T> {
        // Request URLs carry the api key, so it is stripped from logged errors.
        let response = request.send().await.map_err(|e| {
            let source = e.without_url();
            warn!(call = %call, error = %source, "Error querying the UMLS API");
            UmlsError::Transport { call, source }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(
                call = %call,
                status = status.as_u16(),
                "Error querying the UMLS API"
            );
            return Err(UmlsError::Status {
                call,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            let source = e.without_url();
            warn!(call = %call, error = %source, "Failed to decode UMLS API response");
            UmlsError::Decode { call, source }
        })
    }
}
