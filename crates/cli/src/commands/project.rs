use std::fs;

use anyhow::{Context, Result};
use motif_core::fetch::FetchMetadata;
use motif_core::project::{load_project_config, ProjectConfig, ProjectContext, ProjectLayout};
use serde::Serialize;

use crate::commands::{print_dir_status, print_file_status};
use crate::{canonicalize_or_current, infer_project_name};

#[derive(Serialize)]
pub struct ProjectInfoSnapshot {
    pub name: String,
    pub root: String,
    pub config_file: String,
    pub config: ProjectConfig,
    pub layout: ProjectInfoLayout,
    pub resources: ProjectResources,
    pub last_fetch: Option<FetchMetadata>,
}

#[derive(Serialize)]
pub struct ProjectInfoLayout {
    pub meta_dir: String,
    pub data_dir: String,
    pub results: String,
    pub annotated: String,
    pub mapdata_dir: String,
    pub figures_dir: String,
}

#[derive(Serialize)]
pub struct ProjectResources {
    pub keywords: ResourceStatus,
    pub keyword_groups: ResourceStatus,
    pub baseforms: Option<ResourceStatus>,
    pub lexicon: Option<ResourceStatus>,
    pub shapefile: ResourceStatus,
}

#[derive(Serialize)]
pub struct ResourceStatus {
    pub path: String,
    pub exists: bool,
}

impl ResourceStatus {
    fn of(path: &std::path::Path) -> Self {
        Self { path: path.display().to_string(), exists: path.is_file() }
    }
}

/// Initialize a new project at `root`.
pub fn init_project_command(root: &str, name: Option<String>) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ProjectLayout::new(&root_path);

    // Derive project name if not provided.
    let project_name = match name {
        Some(n) => n,
        None => infer_project_name(&root_path),
    };

    // Ensure directories exist.
    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;
    fs::create_dir_all(&layout.data_dir)
        .with_context(|| format!("Failed to create data dir: {}", layout.data_dir.display()))?;
    fs::create_dir_all(&layout.mapdata_dir).with_context(|| {
        format!("Failed to create mapdata dir: {}", layout.mapdata_dir.display())
    })?;
    fs::create_dir_all(&layout.figures_dir).with_context(|| {
        format!("Failed to create figures dir: {}", layout.figures_dir.display())
    })?;

    let existing = layout.existing_config_path().map(|p| p.to_path_buf());
    let config = match &existing {
        Some(_) => load_project_config(&layout)?,
        None => {
            let config = ProjectConfig::new(&project_name);
            let json = serde_json::to_string_pretty(&config)?;
            fs::write(&layout.project_config_path, json).with_context(|| {
                format!("Failed to write project config: {}", layout.project_config_path.display())
            })?;
            config
        }
    };

    println!("Initialized motif-tagger project:");
    println!("  Name: {}", config.name);
    println!("  Root: {}", layout.root.display());
    match existing {
        Some(path) => println!("  Config: {} (kept existing)", path.display()),
        None => println!("  Config: {}", layout.project_config_path.display()),
    }
    println!("  Data dir: {}", layout.data_dir.display());
    println!("  Mapdata dir: {}", layout.mapdata_dir.display());
    println!("  Figures dir: {}", layout.figures_dir.display());
    println!("  Keywords: {}", layout.resolve(&config.annotate.keywords).display());
    println!("  Keyword groups: {}", layout.resolve(&config.annotate.keyword_groups).display());

    Ok(())
}

/// Show basic information about an existing project.
pub fn project_info_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ProjectLayout::new(&root_path);
    let config = load_project_config(&layout)?;
    let ctx = ProjectContext { layout, config };
    let layout = &ctx.layout;

    let last_fetch: Option<FetchMetadata> = fs::read_to_string(&layout.fetch_metadata_path)
        .ok()
        .and_then(|body| serde_json::from_str(&body).ok());
    let config_file = layout
        .existing_config_path()
        .unwrap_or(&layout.project_config_path)
        .display()
        .to_string();

    if json {
        let snapshot = ProjectInfoSnapshot {
            name: ctx.config.name.clone(),
            root: layout.root.display().to_string(),
            config_file,
            config: ctx.config.clone(),
            layout: ProjectInfoLayout {
                meta_dir: layout.meta_dir.display().to_string(),
                data_dir: layout.data_dir.display().to_string(),
                results: layout.results_path.display().to_string(),
                annotated: layout.annotated_path.display().to_string(),
                mapdata_dir: layout.mapdata_dir.display().to_string(),
                figures_dir: layout.figures_dir.display().to_string(),
            },
            resources: ProjectResources {
                keywords: ResourceStatus::of(&ctx.keywords_path()),
                keyword_groups: ResourceStatus::of(&ctx.keyword_groups_path()),
                baseforms: ctx.baseforms_path().as_deref().map(ResourceStatus::of),
                lexicon: ctx.lexicon_path().as_deref().map(ResourceStatus::of),
                shapefile: ResourceStatus::of(&ctx.shapefile_path()),
            },
            last_fetch,
        };
        let serialized = serde_json::to_string_pretty(&snapshot)?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("motif-tagger Project Info");
    println!("=========================");
    println!("Name: {}", ctx.config.name);
    println!("Root: {}", layout.root.display());
    println!("Config file: {}", config_file);
    println!("Config version: {}", ctx.config.config_version);
    println!("Endpoint: {}", ctx.config.fetch.endpoint);
    println!(
        "Query: inschriftgattung={} jahr_a={} jahr_b={} limit={}",
        ctx.config.fetch.inscription_type,
        ctx.config.fetch.year_from,
        ctx.config.fetch.year_to,
        ctx.config.fetch.limit
    );
    println!("Lemmatizer: {}", ctx.config.lemmatizer.backend);
    println!("Strategy: {}", ctx.config.annotate.strategy);
    println!();

    println!("Directories:");
    print_dir_status("Meta dir (.motif)", &layout.meta_dir);
    print_dir_status("Data dir", &layout.data_dir);
    print_dir_status("Mapdata dir", &layout.mapdata_dir);
    print_dir_status("Figures dir", &layout.figures_dir);
    println!();

    println!("Files:");
    print_file_status("Keywords", &ctx.keywords_path());
    print_file_status("Keyword groups", &ctx.keyword_groups_path());
    if let Some(path) = ctx.baseforms_path() {
        print_file_status("Baseform overrides", &path);
    }
    if let Some(path) = ctx.lexicon_path() {
        print_file_status("Lexicon", &path);
    }
    print_file_status("Shapefile", &ctx.shapefile_path());
    print_file_status("Fetched results", &layout.results_path);
    print_file_status("Annotated table", &layout.annotated_path);

    if let Some(fetch) = last_fetch {
        println!();
        println!("Last fetch: {} ({} items, sha256 {})", fetch.fetched_at, fetch.item_count, fetch.sha256);
    }

    Ok(())
}
