use std::path::Path;

use motif_core::resources::{BaseformMap, KeywordGroups, KeywordList, ResourceError};

#[test]
fn keyword_list_trims_skips_blanks_and_dedups() {
    let list = KeywordList::parse("  Delphin \n\nKreuz\nDelphin\n\t\nTaube\n");
    let words: Vec<&str> = list.iter().collect();
    assert_eq!(words, ["Delphin", "Kreuz", "Taube"]);
    assert!(list.contains("Kreuz"));
    assert_eq!(list.find_ignore_case("kreuz"), Some("Kreuz"));
}

#[test]
fn case_folded_lookup_prefers_first_listed_keyword() {
    let list = KeywordList::new(["Anker", "ANKER", "Taube"]);
    assert_eq!(list.len(), 3);
    assert!(list.contains("ANKER"));
    assert!(!list.contains("anker"));
    assert_eq!(list.find_ignore_case("anker"), Some("Anker"));
    assert_eq!(list.find_ignore_case("TAUBE"), Some("Taube"));
    assert_eq!(list.find_ignore_case("Tauben"), None);
    assert_eq!(KeywordList::default().find_ignore_case("Anker"), None);
}

#[test]
fn keyword_list_load_reports_missing_file() {
    let temp = tempfile::tempdir().unwrap();
    let missing = temp.path().join("keywords.txt");
    let err = KeywordList::load(&missing).unwrap_err();
    assert!(matches!(err, ResourceError::Io { .. }));
    assert!(err.to_string().contains("keywords.txt"));
}

#[test]
fn builtin_baseforms_fold_variants() {
    let map = BaseformMap::builtin();
    assert_eq!(map.canonicalize("Delphin"), "Delphine");
    assert_eq!(map.canonicalize("Delfinen"), "Delphine");
    assert_eq!(map.canonicalize("Delfins"), "Delphine");
    assert_eq!(map.canonicalize("Christogramm"), "Christusmonogramm");
    assert_eq!(map.canonicalize("ω"), "Alpha & Omega");
    assert_eq!(map.canonicalize("Kreuzzeichen"), "Kreuz");
}

#[test]
fn baseform_miss_passes_lemma_through() {
    let map = BaseformMap::builtin();
    assert_eq!(map.get("Schiff"), None);
    assert_eq!(map.canonicalize("Schiff"), "Schiff");
    assert_eq!(BaseformMap::empty().canonicalize("Delphin"), "Delphin");
}

#[test]
fn baseform_overrides_merge_over_builtin() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("baseforms.txt");
    std::fs::write(&path, "Delphin: Delphin\nSchiffe: Schiff\n\n").unwrap();

    let map = BaseformMap::builtin_with_overrides(&path).unwrap();
    assert_eq!(map.canonicalize("Delphin"), "Delphin");
    assert_eq!(map.canonicalize("Schiffe"), "Schiff");
    assert_eq!(map.canonicalize("Delfin"), "Delphine");
}

#[test]
fn keyword_groups_invert_to_motif_lookup() {
    let body = "Tiere: Delphine, Taube\n\nChristliche Symbole: Kreuz, Christusmonogramm\n";
    let groups = KeywordGroups::parse(Path::new("keyword_groups.txt"), body).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups.group_of("Delphine"), Some("Tiere"));
    assert_eq!(groups.group_of("Kreuz"), Some("Christliche Symbole"));
    assert_eq!(groups.group_of("Anker"), None);
    let names: Vec<&str> = groups.names().collect();
    assert_eq!(names, ["Christliche Symbole", "Tiere"]);
}

#[test]
fn keyword_groups_last_listed_group_wins() {
    let body = "Tiere: Taube\nVögel: Taube\n";
    let groups = KeywordGroups::parse(Path::new("groups.txt"), body).unwrap();
    assert_eq!(groups.group_of("Taube"), Some("Vögel"));
    assert_eq!(groups.members("Tiere").unwrap(), ["Taube".to_string()]);
}

#[test]
fn keyword_groups_parse_error_names_line() {
    let body = "Tiere: Taube\n\nno colon here\n";
    let err = KeywordGroups::parse(Path::new("groups.txt"), body).unwrap_err();
    match &err {
        ResourceError::Malformed { line, content, .. } => {
            assert_eq!(*line, 3);
            assert_eq!(content, "no colon here");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("groups.txt:3"));
}
