//! Workflow loader for agent workflow config files.

use crate::types::WorkflowDefinition;
use railguard_core::{AppError, AppResult};
use std::path::Path;

/// Load a workflow definition from a `config.yml`.
///
/// # Arguments
/// * `path` - Path to the workflow config file
///
/// # Returns
/// A parsed and validated `WorkflowDefinition`.
///
/// # Example
/// ```no_run
/// use railguard_workflow::load_workflow;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let workflow = load_workflow(Path::new("workflow_config/config.yml"))?;
/// println!("Agent: {}", workflow.workflow.kind);
/// # Ok(())
/// # }
/// ```
pub fn load_workflow(path: &Path) -> AppResult<WorkflowDefinition> {
    tracing::debug!("Loading workflow from: {:?}", path);

    if !path.exists() {
        return Err(AppError::Workflow(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Workflow(format!("Failed to read workflow config {:?}: {}", path, e))
    })?;

    let definition: WorkflowDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Workflow(format!("Failed to parse workflow config {:?}: {}", path, e))
    })?;

    validate_workflow(&definition)?;

    tracing::debug!(
        "Loaded workflow: {} with {} tool(s)",
        definition.workflow.kind,
        definition.workflow.tool_names.len()
    );

    Ok(definition)
}

/// Validate a workflow definition.
fn validate_workflow(def: &WorkflowDefinition) -> AppResult<()> {
    if def.workflow.kind.trim().is_empty() {
        return Err(AppError::Workflow(
            "Workflow _type cannot be empty".to_string(),
        ));
    }

    let undeclared: Vec<&str> = def
        .workflow
        .tool_names
        .iter()
        .filter(|name| !def.functions.contains_key(name.as_str()))
        .map(|name| name.as_str())
        .collect();

    if !undeclared.is_empty() {
        return Err(AppError::Workflow(format!(
            "Workflow references undeclared function(s): {}",
            undeclared.join(", ")
        )));
    }

    if let Some(ref llm) = def.workflow.llm_name {
        if !def.llms.is_empty() && !def.llms.contains_key(llm) {
            return Err(AppError::Workflow(format!(
                "Workflow references undeclared LLM: {}",
                llm
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("config.yml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_valid_workflow() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"
functions:
  webpage_query:
    _type: webpage_query
    webpage_url: https://docs.example.com
    description: "Search the product docs"
  tavily_search:
    _type: tavily_search
llms:
  nim_llm:
    _type: nim
    model_name: meta/llama-3.1-70b-instruct
workflow:
  _type: react_agent
  tool_names: [webpage_query, tavily_search]
  llm_name: nim_llm
"#,
        );

        let workflow = load_workflow(&path).unwrap();
        assert_eq!(workflow.workflow.kind, "react_agent");
        assert_eq!(workflow.functions.len(), 2);
    }

    #[test]
    fn test_load_nonexistent_workflow() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_workflow(&temp_dir.path().join("config.yml")).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "invalid: yaml: content:");
        assert!(load_workflow(&path).is_err());
    }

    #[test]
    fn test_undeclared_tool() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            "workflow:\n  _type: react_agent\n  tool_names: [wikipedia]\n",
        );
        let err = load_workflow(&path).unwrap_err();
        assert!(err.to_string().contains("wikipedia"));
    }

    #[test]
    fn test_undeclared_llm() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            "llms:\n  a:\n    _type: nim\nworkflow:\n  _type: react_agent\n  llm_name: b\n",
        );
        assert!(load_workflow(&path).is_err());
    }
}
