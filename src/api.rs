//! n8n REST API client.
//!
//! A thin blocking wrapper over the n8n public API. The host is expected
//! to include the API base path (e.g. `https://n8n.example.com/api/v1`);
//! endpoints are appended to it directly. Authentication is the
//! `X-N8N-API-KEY` header on every request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::{Error, Result};

/// A node within a workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// A tag attached to a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTag {
    pub id: String,
    pub name: String,
}

/// A workflow as returned by the n8n API.
///
/// List responses omit the heavyweight fields (nodes, connections), so
/// they are all optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<WorkflowNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<WorkflowTag>>,
}

/// Paged envelope around workflow lists.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListWorkflowsResponse {
    data: Vec<Workflow>,
    #[serde(default)]
    #[allow(dead_code)]
    next_cursor: Option<String>,
}

/// Filters for listing workflows.
#[derive(Debug, Clone, Default)]
pub struct ListWorkflowsOptions {
    /// Filter by activation state
    pub active: Option<bool>,
    /// Maximum number of results
    pub limit: Option<u32>,
    /// Comma-separated tag names
    pub tags: Option<String>,
    /// Pagination cursor from a previous response
    pub cursor: Option<String>,
}

/// Outcome of a connection test.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConnectionResult {
    pub success: bool,
    pub workflow_count: usize,
    pub message: String,
}

/// Blocking client for the n8n API.
#[derive(Debug, Clone)]
pub struct N8nClient {
    base_url: String,
    api_key: String,
}

impl N8nClient {
    /// Construct a client from resolved connection settings.
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            base_url: config.host.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Perform one request and parse the response body.
    ///
    /// 204 and empty bodies come back as `Value::Null`. Non-2xx statuses
    /// map to the crate error taxonomy: 401 is an authentication error,
    /// anything else carries the status plus the body's `message` field
    /// when the server provides one.
    fn request(
        &self,
        method: &str,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut req = ureq::request(method, &url)
            .set("X-N8N-API-KEY", &self.api_key)
            .set("Accept", "application/json");
        for (name, value) in query {
            req = req.query(name, value);
        }

        let response = match body {
            Some(json) => req.send_json(json),
            None => req.call(),
        };

        match response {
            Ok(resp) => {
                if resp.status() == 204 {
                    return Ok(serde_json::Value::Null);
                }
                let text = resp.into_string()?;
                if text.trim().is_empty() {
                    return Ok(serde_json::Value::Null);
                }
                Ok(serde_json::from_str(&text)?)
            }
            Err(ureq::Error::Status(401, _)) => Err(Error::Authentication),
            Err(ureq::Error::Status(code, resp)) => {
                let message = resp
                    .into_string()
                    .ok()
                    .and_then(|body| serde_json::from_str::<serde_json::Value>(&body).ok())
                    .and_then(|value| {
                        value
                            .get("message")
                            .and_then(serde_json::Value::as_str)
                            .map(str::to_string)
                    })
                    .unwrap_or_else(|| format!("Request failed with status {}", code));
                Err(Error::Api {
                    status: code,
                    message,
                })
            }
            Err(err) => Err(Error::Connection {
                host: self.base_url.clone(),
                detail: err.to_string(),
            }),
        }
    }

    /// List workflows, optionally filtered.
    pub fn list_workflows(&self, options: &ListWorkflowsOptions) -> Result<Vec<Workflow>> {
        let query = query_params(options);
        let value = self.request("GET", "/workflows", &query, None)?;
        let response: ListWorkflowsResponse = serde_json::from_value(value)?;
        Ok(response.data)
    }

    /// Fetch a single workflow by ID.
    pub fn get_workflow(&self, id: &str) -> Result<Workflow> {
        let value = self.request("GET", &format!("/workflows/{}", id), &[], None)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Create a workflow from a JSON definition.
    pub fn create_workflow(&self, definition: &serde_json::Value) -> Result<Workflow> {
        let value = self.request("POST", "/workflows", &[], Some(definition))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Update an existing workflow.
    pub fn update_workflow(&self, id: &str, definition: &serde_json::Value) -> Result<Workflow> {
        let value = self.request("PUT", &format!("/workflows/{}", id), &[], Some(definition))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Delete a workflow.
    pub fn delete_workflow(&self, id: &str) -> Result<()> {
        self.request("DELETE", &format!("/workflows/{}", id), &[], None)?;
        Ok(())
    }

    /// Activate a workflow.
    pub fn activate_workflow(&self, id: &str) -> Result<Workflow> {
        let value = self.request("POST", &format!("/workflows/{}/activate", id), &[], None)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Deactivate a workflow.
    pub fn deactivate_workflow(&self, id: &str) -> Result<Workflow> {
        let value = self.request("POST", &format!("/workflows/{}/deactivate", id), &[], None)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Probe the API with a minimal list request.
    ///
    /// Failures are folded into the result rather than returned as errors,
    /// so callers can render the outcome either way.
    pub fn test_connection(&self) -> TestConnectionResult {
        match self.list_workflows(&ListWorkflowsOptions {
            limit: Some(1),
            ..Default::default()
        }) {
            Ok(workflows) => TestConnectionResult {
                success: true,
                workflow_count: workflows.len(),
                message: "Successfully connected to n8n API".to_string(),
            },
            Err(Error::Authentication) => TestConnectionResult {
                success: false,
                workflow_count: 0,
                message: "Authentication failed. Check your API key.".to_string(),
            },
            Err(err @ Error::Connection { .. }) => TestConnectionResult {
                success: false,
                workflow_count: 0,
                message: format!("Connection failed: {}", err),
            },
            Err(err) => TestConnectionResult {
                success: false,
                workflow_count: 0,
                message: err.to_string(),
            },
        }
    }
}

/// Build the query string pairs for a list request.
fn query_params(options: &ListWorkflowsOptions) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(active) = options.active {
        query.push(("active", active.to_string()));
    }
    if let Some(limit) = options.limit {
        query.push(("limit", limit.to_string()));
    }
    if let Some(ref tags) = options.tags {
        query.push(("tags", tags.clone()));
    }
    if let Some(ref cursor) = options.cursor {
        query.push(("cursor", cursor.clone()));
    }
    query
}
