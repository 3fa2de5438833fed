use motif_core::fetch::{ArchiveClient, ArchiveResponse, FetchError, SearchQuery};
use motif_core::project::ProjectLayout;
use motif_tagger::commands::{
    analyze_command, annotate_command, fetch_with_client, init_project_command,
    project_info_command, tag_command, AnalyzeArgs, AnnotateArgs,
};
use tempfile::tempdir;

struct NotFound;

impl ArchiveClient for NotFound {
    fn search(&self, _endpoint: &str, _query: &SearchQuery) -> Result<ArchiveResponse, FetchError> {
        Ok(ArchiveResponse { status: 404, body: "Not Found".into() })
    }
}

#[test]
fn project_info_errors_when_config_missing() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_string_lossy().to_string();
    let err = project_info_command(&root, false).unwrap_err();
    assert!(err.to_string().contains("Failed to read project config"), "unexpected error: {err}");
}

#[test]
fn project_info_errors_when_config_corrupt() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_string_lossy().to_string();
    init_project_command(&root, Some("CorruptProj".into())).unwrap();
    let layout = ProjectLayout::new(&root);
    std::fs::write(&layout.project_config_path, "not-json").unwrap();
    let err = project_info_command(&root, true).unwrap_err();
    assert!(err.to_string().contains("Failed to parse project config JSON"));
}

#[test]
fn fetch_non_200_fails_without_writing() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_string_lossy().to_string();
    init_project_command(&root, None).unwrap();

    let err = fetch_with_client(&root, None, &NotFound).unwrap_err();
    assert!(err.to_string().contains("404"), "unexpected error: {err}");
    let layout = ProjectLayout::new(temp.path());
    assert!(!layout.results_path.exists());
    assert!(!layout.fetch_metadata_path.exists());
}

#[test]
fn annotate_errors_when_keywords_missing() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_string_lossy().to_string();
    init_project_command(&root, None).unwrap();
    let err = annotate_command(&AnnotateArgs { root, ..Default::default() }).unwrap_err();
    assert!(format!("{err:#}").contains("keywords.txt"), "unexpected error: {err:#}");
}

#[test]
fn annotate_rejects_unknown_strategy() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_string_lossy().to_string();
    let err = annotate_command(&AnnotateArgs {
        root,
        strategy: Some("stanza".into()),
        ..Default::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("Invalid strategy"));
}

#[test]
fn tag_rejects_unconfigured_command_lemmatizer() {
    let temp = tempdir().unwrap();
    std::fs::write(temp.path().join("keywords.txt"), "Kreuz\n").unwrap();
    std::fs::write(temp.path().join("keyword_groups.txt"), "Symbole: Kreuz\n").unwrap();
    let root = temp.path().to_string_lossy().to_string();
    let err = tag_command(&root, "Kreuz", Some("command"), false).unwrap_err();
    assert!(format!("{err:#}").contains("not configured"), "unexpected error: {err:#}");
}

#[test]
fn analyze_requires_shapefile_unless_skipped() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_string_lossy().to_string();
    init_project_command(&root, None).unwrap();
    let err = analyze_command(&AnalyzeArgs { root, ..Default::default() }).unwrap_err();
    assert!(err.to_string().contains("--skip-maps"), "unexpected error: {err}");
}

#[test]
fn analyze_errors_when_annotated_table_missing() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_string_lossy().to_string();
    let err = analyze_command(&AnalyzeArgs { root, skip_maps: true, ..Default::default() })
        .unwrap_err();
    assert!(err.to_string().contains("Failed to analyze"), "unexpected error: {err}");
}
