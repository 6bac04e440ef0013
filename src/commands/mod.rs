//! Command implementations for the n8ncli CLI.
//!
//! Each command returns a result struct implementing [`Output`], which the
//! binary renders as JSON or human-readable text depending on `--json`.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::api::{ListWorkflowsOptions, N8nClient, TestConnectionResult, Workflow};
use crate::cli::ListFormat;
use crate::config::{
    CliOverrides, ConfigKey, ConfigSource, ConfigStore, ResolvedConfig, mask_api_key,
    resolve_config, validate_host,
};
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

// ==================== Workflow Commands ====================

/// Result of `workflows list`.
pub struct WorkflowList {
    pub workflows: Vec<Workflow>,
    pub format: ListFormat,
}

/// List workflows with the given filters.
pub fn workflows_list(
    client: &N8nClient,
    options: &ListWorkflowsOptions,
    format: ListFormat,
) -> Result<WorkflowList> {
    Ok(WorkflowList {
        workflows: client.list_workflows(options)?,
        format,
    })
}

impl Output for WorkflowList {
    fn to_json(&self) -> String {
        pretty(&serde_json::to_value(&self.workflows).unwrap_or_default())
    }

    fn to_human(&self) -> String {
        match self.format {
            ListFormat::Minimal => self
                .workflows
                .iter()
                .map(|w| w.id.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            ListFormat::Table => format_table(&self.workflows),
        }
    }
}

fn format_table(workflows: &[Workflow]) -> String {
    if workflows.is_empty() {
        return "No workflows found.".to_string();
    }

    let header = format!(
        "{:<26} {:<35} {:<10} {}",
        "ID", "Name", "Status", "Updated"
    );
    let separator = "\u{2500}".repeat(85);
    let rows = workflows.iter().map(|w| {
        let status = if w.active { "active" } else { "inactive" };
        let name: String = w.name.chars().take(33).collect();
        format!(
            "{:<26} {:<35} {:<10} {}",
            w.id,
            name,
            status,
            w.updated_at.format("%Y-%m-%d")
        )
    });

    std::iter::once(header)
        .chain(std::iter::once(separator))
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result of `workflows get`.
pub struct WorkflowDetail {
    pub workflow: Workflow,
}

/// Fetch a single workflow.
pub fn workflows_get(client: &N8nClient, id: &str) -> Result<WorkflowDetail> {
    Ok(WorkflowDetail {
        workflow: client.get_workflow(id)?,
    })
}

impl Output for WorkflowDetail {
    fn to_json(&self) -> String {
        pretty(&serde_json::to_value(&self.workflow).unwrap_or_default())
    }

    fn to_human(&self) -> String {
        let w = &self.workflow;
        let status = if w.active { "active" } else { "inactive" };
        let node_count = w.nodes.as_ref().map_or(0, Vec::len);
        let mut lines = vec![
            "Workflow Details".to_string(),
            "\u{2500}".repeat(40),
            format!("ID:          {}", w.id),
            format!("Name:        {}", w.name),
            format!("Status:      {}", status),
            format!("Created:     {}", w.created_at.format("%Y-%m-%d %H:%M:%S")),
            format!("Updated:     {}", w.updated_at.format("%Y-%m-%d %H:%M:%S")),
            format!("Nodes:       {}", node_count),
        ];
        if let Some(tags) = &w.tags {
            if !tags.is_empty() {
                let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
                lines.push(format!("Tags:        {}", names.join(", ")));
            }
        }
        lines.join("\n")
    }
}

/// Result of a workflow mutation (create/update/activate/deactivate).
pub struct WorkflowChanged {
    pub verb: &'static str,
    pub workflow: Workflow,
}

impl Output for WorkflowChanged {
    fn to_json(&self) -> String {
        pretty(&serde_json::to_value(&self.workflow).unwrap_or_default())
    }

    fn to_human(&self) -> String {
        format!(
            "{} workflow {} ({})",
            self.verb, self.workflow.id, self.workflow.name
        )
    }
}

/// Create a workflow from `--name` or a JSON file.
pub fn workflows_create(
    client: &N8nClient,
    name: Option<String>,
    file: Option<&Path>,
) -> Result<WorkflowChanged> {
    let definition = create_definition(name, file)?;
    Ok(WorkflowChanged {
        verb: "Created",
        workflow: client.create_workflow(&definition)?,
    })
}

/// Update a workflow from `--name` or a JSON file.
pub fn workflows_update(
    client: &N8nClient,
    id: &str,
    name: Option<String>,
    file: Option<&Path>,
) -> Result<WorkflowChanged> {
    let definition = update_definition(name, file)?;
    Ok(WorkflowChanged {
        verb: "Updated",
        workflow: client.update_workflow(id, &definition)?,
    })
}

/// Activate a workflow.
pub fn workflows_activate(client: &N8nClient, id: &str) -> Result<WorkflowChanged> {
    Ok(WorkflowChanged {
        verb: "Activated",
        workflow: client.activate_workflow(id)?,
    })
}

/// Deactivate a workflow.
pub fn workflows_deactivate(client: &N8nClient, id: &str) -> Result<WorkflowChanged> {
    Ok(WorkflowChanged {
        verb: "Deactivated",
        workflow: client.deactivate_workflow(id)?,
    })
}

/// Result of `workflows delete`.
pub struct WorkflowDeleted {
    pub id: String,
}

/// Delete a workflow.
pub fn workflows_delete(client: &N8nClient, id: &str) -> Result<WorkflowDeleted> {
    client.delete_workflow(id)?;
    Ok(WorkflowDeleted { id: id.to_string() })
}

impl Output for WorkflowDeleted {
    fn to_json(&self) -> String {
        pretty(&json!({ "deleted": self.id }))
    }

    fn to_human(&self) -> String {
        format!("Deleted workflow {}", self.id)
    }
}

/// Build a create payload. The n8n API requires nodes/connections/settings
/// even for an empty workflow.
fn create_definition(name: Option<String>, file: Option<&Path>) -> Result<serde_json::Value> {
    match (name, file) {
        (_, Some(path)) => read_definition(path),
        (Some(name), None) => Ok(json!({
            "name": name,
            "nodes": [],
            "connections": {},
            "settings": {},
        })),
        (None, None) => Err(Error::InvalidInput(
            "pass --name or --file to describe the workflow".to_string(),
        )),
    }
}

/// Build an update payload.
fn update_definition(name: Option<String>, file: Option<&Path>) -> Result<serde_json::Value> {
    match (name, file) {
        (_, Some(path)) => read_definition(path),
        (Some(name), None) => Ok(json!({ "name": name })),
        (None, None) => Err(Error::InvalidInput(
            "pass --name or --file with the fields to change".to_string(),
        )),
    }
}

fn read_definition(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|err| {
        Error::InvalidInput(format!("{} is not valid JSON: {}", path.display(), err))
    })
}

// ==================== Test Command ====================

/// Result of `test`.
pub struct ConnectionTest {
    pub result: TestConnectionResult,
}

/// Probe the API connection.
pub fn test_connection(client: &N8nClient) -> ConnectionTest {
    ConnectionTest {
        result: client.test_connection(),
    }
}

impl Output for ConnectionTest {
    fn to_json(&self) -> String {
        pretty(&serde_json::to_value(&self.result).unwrap_or_default())
    }

    fn to_human(&self) -> String {
        if self.result.success {
            format!(
                "\u{2713} Connection successful\n  Message: {}",
                self.result.message
            )
        } else {
            format!(
                "\u{2717} Connection failed\n  Message: {}",
                self.result.message
            )
        }
    }
}

// ==================== Config Commands ====================

fn display_value(key: ConfigKey, value: &str) -> String {
    if value.is_empty() {
        return "(not set)".to_string();
    }
    match key {
        ConfigKey::Host => value.to_string(),
        ConfigKey::ApiKey => mask_api_key(value),
    }
}

/// Result of `config` / `config show`.
pub struct ConfigShow {
    pub resolved: ResolvedConfig,
}

/// Show the resolved configuration. Works with incomplete config.
pub fn config_show(store: &ConfigStore, overrides: &CliOverrides) -> ConfigShow {
    ConfigShow {
        resolved: resolve_config(store, overrides),
    }
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        let r = &self.resolved;
        pretty(&json!({
            "host": display_value(ConfigKey::Host, &r.host),
            "apiKey": display_value(ConfigKey::ApiKey, &r.api_key),
            "hostSource": r.host_source.as_str(),
            "apiKeySource": r.api_key_source.as_str(),
        }))
    }

    fn to_human(&self) -> String {
        let r = &self.resolved;
        [
            "Current Configuration".to_string(),
            "\u{2500}".repeat(40),
            format!("Host:     {}", display_value(ConfigKey::Host, &r.host)),
            format!("API Key:  {}", display_value(ConfigKey::ApiKey, &r.api_key)),
            String::new(),
            "Sources:".to_string(),
            format!("  Host:    {}", r.host_source),
            format!("  API Key: {}", r.api_key_source),
        ]
        .join("\n")
    }
}

/// Result of `config get`.
pub struct ConfigValue {
    pub key: ConfigKey,
    pub value: String,
    pub source: ConfigSource,
}

/// Get one resolved configuration value.
pub fn config_get(store: &ConfigStore, overrides: &CliOverrides, key: &str) -> Result<ConfigValue> {
    let key = ConfigKey::parse(key).map_err(Error::InvalidInput)?;
    let resolved = resolve_config(store, overrides);
    let (value, source) = match key {
        ConfigKey::Host => (resolved.host, resolved.host_source),
        ConfigKey::ApiKey => (resolved.api_key, resolved.api_key_source),
    };
    Ok(ConfigValue { key, value, source })
}

impl Output for ConfigValue {
    fn to_json(&self) -> String {
        pretty(&json!({
            "key": self.key.as_str(),
            "value": display_value(self.key, &self.value),
            "source": self.source.as_str(),
        }))
    }

    fn to_human(&self) -> String {
        if self.value.is_empty() {
            format!("{} is not set", self.key)
        } else {
            format!(
                "{} (from {})",
                display_value(self.key, &self.value),
                self.source
            )
        }
    }
}

/// Result of `config set`.
#[derive(Debug)]
pub struct ConfigSet {
    pub key: ConfigKey,
    pub value: String,
}

/// Validate and persist one configuration value.
pub fn config_set(store: &ConfigStore, key: &str, value: &str) -> Result<ConfigSet> {
    let key = ConfigKey::parse(key).map_err(Error::InvalidInput)?;
    if value.is_empty() {
        return Err(Error::InvalidInput(format!(
            "value for {} must not be empty",
            key
        )));
    }
    if key == ConfigKey::Host {
        validate_host(value).map_err(Error::InvalidInput)?;
    }
    store.set(key, value)?;
    Ok(ConfigSet {
        key,
        value: value.to_string(),
    })
}

impl Output for ConfigSet {
    fn to_json(&self) -> String {
        pretty(&json!({
            "key": self.key.as_str(),
            "value": display_value(self.key, &self.value),
        }))
    }

    fn to_human(&self) -> String {
        format!("Set {} to {}", self.key, display_value(self.key, &self.value))
    }
}

/// Result of `config clear`.
pub struct ConfigCleared {
    pub removed: bool,
    pub path: String,
}

/// Delete the persisted config file.
pub fn config_clear(store: &ConfigStore) -> Result<ConfigCleared> {
    let removed = store.clear()?;
    Ok(ConfigCleared {
        removed,
        path: store.path().display().to_string(),
    })
}

impl Output for ConfigCleared {
    fn to_json(&self) -> String {
        pretty(&json!({ "removed": self.removed, "path": self.path }))
    }

    fn to_human(&self) -> String {
        if self.removed {
            format!("Removed {}", self.path)
        } else {
            "No configuration file to remove".to_string()
        }
    }
}

/// Result of `config path`.
pub struct ConfigPath {
    pub path: String,
}

/// Report the persisted config file path.
pub fn config_file_path(store: &ConfigStore) -> ConfigPath {
    ConfigPath {
        path: store.path().display().to_string(),
    }
}

impl Output for ConfigPath {
    fn to_json(&self) -> String {
        pretty(&json!({ "path": self.path }))
    }

    fn to_human(&self) -> String {
        self.path.clone()
    }
}
