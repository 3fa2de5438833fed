use motif_core::annotate::{AnnotationResources, ExtractionStrategy};
use motif_core::project::{
    load_or_default_config, load_project_config, ProjectConfig, ProjectContext, ProjectLayout,
};

#[test]
fn layout_paths_hang_off_the_root() {
    let layout = ProjectLayout::new("/tmp/epitaphs");
    assert!(layout.project_config_path.ends_with(".motif/project.json"));
    assert!(layout.results_path.ends_with("data/results.json"));
    assert!(layout.annotated_path.ends_with("data/filtered_data.json"));
    assert!(layout.figures_dir.ends_with("figures"));
    assert_eq!(layout.resolve("keywords.txt"), layout.root.join("keywords.txt"));
    assert!(layout.existing_config_path().is_none());
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let temp = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(temp.path());
    assert!(load_project_config(&layout).is_err());

    let config = load_or_default_config(&layout).unwrap();
    assert_eq!(config.fetch.inscription_type, "titsep");
    assert_eq!(config.lemmatizer.backend, "builtin");
    assert_eq!(config.analyze.year_threshold, 350);
}

#[test]
fn json_config_round_trips_through_context() {
    let temp = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(temp.path());
    std::fs::create_dir_all(&layout.meta_dir).unwrap();

    let mut config = ProjectConfig::new("CtxProject");
    config.annotate.keywords = "resources/keywords.txt".into();
    config.annotate.strategy = ExtractionStrategy::Nouns;
    std::fs::write(&layout.project_config_path, serde_json::to_string_pretty(&config).unwrap())
        .unwrap();

    let ctx = ProjectContext::from_root(temp.path()).expect("context");
    assert_eq!(ctx.config, config);
    assert_eq!(ctx.keywords_path(), temp.path().join("resources/keywords.txt"));
    assert_eq!(ctx.baseforms_path(), None);
}

#[test]
fn yaml_config_is_read_when_no_json_exists() {
    let temp = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(temp.path());
    std::fs::create_dir_all(&layout.meta_dir).unwrap();
    std::fs::write(
        &layout.project_config_yaml_path,
        "name: YamlProject\nconfig_version: 0.1.0\nfetch:\n  year_to: 450\nlemmatizer:\n  backend: command\n  command: [python3, lemmatize.py]\n",
    )
    .unwrap();

    let config = load_project_config(&layout).unwrap();
    assert_eq!(config.name, "YamlProject");
    assert_eq!(config.fetch.year_to, 450);
    assert_eq!(config.fetch.year_from, 200);
    assert_eq!(
        config.lemmatizer.command,
        Some(vec!["python3".to_string(), "lemmatize.py".to_string()])
    );
}

#[test]
fn malformed_config_reports_parse_failure() {
    let temp = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(temp.path());
    std::fs::create_dir_all(&layout.meta_dir).unwrap();
    std::fs::write(&layout.project_config_path, "{ nope").unwrap();

    let err = load_project_config(&layout).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse project config JSON"));
}

#[test]
fn resources_load_from_project_paths() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("keywords.txt"), "Delphin\nKreuz\n").unwrap();
    std::fs::write(temp.path().join("keyword_groups.txt"), "Tiere: Delphine\n").unwrap();
    std::fs::write(temp.path().join("baseforms.txt"), "Delphin: Delphin\n").unwrap();

    let mut ctx = ProjectContext::from_root(temp.path()).unwrap();
    ctx.config.annotate.baseforms = Some("baseforms.txt".into());
    let res = AnnotationResources::load(&ctx).unwrap();
    assert_eq!(res.keywords.len(), 2);
    assert_eq!(res.groups.group_of("Delphine"), Some("Tiere"));
    assert_eq!(res.baseforms.canonicalize("Delphin"), "Delphin");
}

#[test]
fn missing_group_file_is_fatal() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("keywords.txt"), "Delphin\n").unwrap();
    let ctx = ProjectContext::from_root(temp.path()).unwrap();
    let err = AnnotationResources::load(&ctx).unwrap_err();
    assert!(err.to_string().contains("keyword_groups.txt"));
}
