use std::path::Path;

use anyhow::{Context, Result};

use crate::project::{ProjectConfig, ProjectLayout};

/// Load the project config from disk for a given layout.
///
/// JSON is preferred; `.motif/project.yaml` is read when no JSON config exists.
pub fn load_project_config(layout: &ProjectLayout) -> Result<ProjectConfig> {
    let path = layout.existing_config_path().unwrap_or(&layout.project_config_path);
    read_config_file(path)
}

/// Load the project config if present, otherwise fall back to defaults named after the root.
pub fn load_or_default_config(layout: &ProjectLayout) -> Result<ProjectConfig> {
    match layout.existing_config_path() {
        Some(path) => read_config_file(path),
        None => {
            let name = layout
                .root
                .file_name()
                .and_then(|os| os.to_str())
                .unwrap_or("unnamed-project");
            Ok(ProjectConfig::new(name))
        }
    }
}

fn read_config_file(path: &Path) -> Result<ProjectConfig> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read project config at {}", path.display()))?;
    let is_yaml = matches!(path.extension().and_then(|e| e.to_str()), Some("yaml" | "yml"));
    let config = if is_yaml {
        serde_yaml::from_str(&body).context("Failed to parse project config YAML")?
    } else {
        serde_json::from_str(&body).context("Failed to parse project config JSON")?
    };
    Ok(config)
}
