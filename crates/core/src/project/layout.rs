use std::path::{Path, PathBuf};

/// Logical layout of a project on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
/// The CLI or other frontends are responsible for actually creating directories
/// and files based on this layout.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Root directory of the project.
    pub root: PathBuf,
    /// Directory for internal metadata (.motif).
    pub meta_dir: PathBuf,
    /// Path to the project config file (JSON).
    pub project_config_path: PathBuf,
    /// Alternate YAML project config path.
    pub project_config_yaml_path: PathBuf,
    /// Metadata written after a successful fetch.
    pub fetch_metadata_path: PathBuf,
    /// Directory for fetched and annotated tables (data).
    pub data_dir: PathBuf,
    /// Raw archive response written by the fetch stage.
    pub results_path: PathBuf,
    /// Annotated table written by the annotate stage.
    pub annotated_path: PathBuf,
    /// Directory for country geometry (mapdata).
    pub mapdata_dir: PathBuf,
    /// Directory for rendered figures (figures).
    pub figures_dir: PathBuf,
}

impl ProjectLayout {
    /// Compute the default layout for a project rooted at `root`.
    ///
    /// This does *not* touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".motif");
        let project_config_path = meta_dir.join("project.json");
        let project_config_yaml_path = meta_dir.join("project.yaml");
        let fetch_metadata_path = meta_dir.join("fetch.json");
        let data_dir = root.join("data");
        let results_path = data_dir.join("results.json");
        let annotated_path = data_dir.join("filtered_data.json");
        let mapdata_dir = root.join("mapdata");
        let figures_dir = root.join("figures");

        Self {
            root,
            meta_dir,
            project_config_path,
            project_config_yaml_path,
            fetch_metadata_path,
            data_dir,
            results_path,
            annotated_path,
            mapdata_dir,
            figures_dir,
        }
    }

    /// Resolve a config-relative path against the project root.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// The config file that exists on disk, preferring JSON over YAML.
    pub fn existing_config_path(&self) -> Option<&Path> {
        if self.project_config_path.is_file() {
            Some(&self.project_config_path)
        } else if self.project_config_yaml_path.is_file() {
            Some(&self.project_config_yaml_path)
        } else {
            None
        }
    }
}
