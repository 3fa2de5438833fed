//! Motif annotation pipeline.
//!
//! Per record: filter (pagan religion, blank commentary) -> candidate spans via
//! one keyword alternation regex -> lemmatizer -> baseform canonicalization ->
//! group roll-up -> Christian classification. Records without any motif are
//! dropped from the output table.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::lemma::{LemmaError, Lemmatizer};
use crate::model::{self, AnnotatedRecord, Christian, ModelError, Record};
use crate::project::ProjectContext;
use crate::resources::{BaseformMap, KeywordGroups, KeywordList, ResourceError};

/// Religion value of records excluded from annotation.
pub const PAGAN_RELIGION: &str = "names of pagan deities; cult functions, pagan";

/// Religion values that mark a record as Christian on their own.
pub const CHRISTIAN_RELIGIONS: [&str; 2] = ["cult functions, Jewish/Christian", "Judaism / Christianity"];

/// Canonical motifs that mark a record as Christian.
pub const CHRISTIAN_MOTIFS: [&str; 4] = ["Christusmonogramm", "Kreuz", "Alpha & Omega", "Staurogramm"];

/// Inflectional endings accepted after a keyword.
pub const KEYWORD_SUFFIXES: [&str; 5] = ["e", "es", "en", "n", "s"];

/// Keys written by annotation; stale copies on an input record are replaced.
const DERIVED_FIELDS: [&str; 3] = ["motifs", "motif_group", "christian"];

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Lemma(#[from] LemmaError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Keyword list is empty; nothing to match")]
    EmptyKeywords,
    #[error("Failed to build keyword pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// How candidate lemmas are pulled out of a commentary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// Keyword regex over the commentary; each match is lemmatized.
    #[default]
    Regex,
    /// Lemmatize the whole commentary and keep nouns whose lemma is a keyword.
    Nouns,
}

impl ExtractionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStrategy::Regex => "regex",
            ExtractionStrategy::Nouns => "nouns",
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regex" => Ok(ExtractionStrategy::Regex),
            "nouns" => Ok(ExtractionStrategy::Nouns),
            other => Err(format!("Invalid strategy '{other}'. Allowed: regex, nouns")),
        }
    }
}

/// Build the case-insensitive, word-bounded alternation over all keywords.
pub fn keyword_pattern(keywords: &KeywordList) -> Result<Regex, AnnotateError> {
    if keywords.is_empty() {
        return Err(AnnotateError::EmptyKeywords);
    }
    let suffixes = KEYWORD_SUFFIXES.join("|");
    let alternation = keywords
        .iter()
        .map(|k| format!(r"\b{}(?:{suffixes})?\b", regex::escape(k)))
        .collect::<Vec<_>>()
        .join("|");
    Ok(Regex::new(&format!("(?i){alternation}"))?)
}

/// Motifs and groups found in one commentary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MotifTags {
    pub motifs: BTreeSet<String>,
    pub groups: BTreeSet<String>,
}

impl MotifTags {
    pub fn is_empty(&self) -> bool {
        self.motifs.is_empty()
    }

    pub fn motifs_joined(&self) -> String {
        join_sorted(&self.motifs)
    }

    pub fn groups_joined(&self) -> String {
        join_sorted(&self.groups)
    }
}

fn join_sorted(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Christian if the religion says so or an indicator motif was tagged.
///
/// Indicators are matched as whole motif names, not as substrings of the
/// joined motif string, so a longer motif that merely contains `Kreuz` does
/// not count. Records where the two rules disagree are caught by
/// [`indicator_substring_match`] and logged by the annotator.
pub fn classify_christian(religion: Option<&str>, motifs: &BTreeSet<String>) -> Christian {
    let by_religion = religion.is_some_and(|r| CHRISTIAN_RELIGIONS.contains(&r));
    let by_motif = CHRISTIAN_MOTIFS.iter().any(|m| motifs.contains(*m));
    Christian::from(by_religion || by_motif)
}

/// Whether any indicator name occurs as a substring of the joined motif string.
///
/// This is looser than [`classify_christian`]; a disagreement between the two
/// means some tagged motif merely contains an indicator name.
pub fn indicator_substring_match(motifs_joined: &str) -> bool {
    CHRISTIAN_MOTIFS.iter().any(|m| motifs_joined.contains(m))
}

/// Counters reported after an annotation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSummary {
    pub input: usize,
    pub dropped_pagan: usize,
    pub dropped_no_commentary: usize,
    pub dropped_no_motif: usize,
    pub retained: usize,
    pub christian: usize,
    /// Records where substring matching would have disagreed with the classification.
    pub flagged_substring_mismatch: usize,
}

/// Static lookups needed by [`MotifAnnotator`].
#[derive(Debug, Clone)]
pub struct AnnotationResources {
    pub keywords: KeywordList,
    pub baseforms: BaseformMap,
    pub groups: KeywordGroups,
}

impl AnnotationResources {
    /// Load keyword list, keyword groups and baseform overrides named in the project config.
    pub fn load(ctx: &ProjectContext) -> Result<Self, AnnotateError> {
        let keywords = KeywordList::load(&ctx.keywords_path())?;
        let groups = KeywordGroups::load(&ctx.keyword_groups_path())?;
        let baseforms = match ctx.baseforms_path() {
            Some(path) => BaseformMap::builtin_with_overrides(&path)?,
            None => BaseformMap::builtin(),
        };
        info!(
            keywords = keywords.len(),
            groups = groups.len(),
            baseforms = baseforms.len(),
            "loaded annotation resources"
        );
        Ok(Self { keywords, baseforms, groups })
    }
}

/// Tags commentaries with canonical motifs using a pluggable lemmatizer.
pub struct MotifAnnotator<'a> {
    resources: &'a AnnotationResources,
    lemmatizer: &'a dyn Lemmatizer,
    pattern: Regex,
    strategy: ExtractionStrategy,
}

impl<'a> MotifAnnotator<'a> {
    pub fn new(
        resources: &'a AnnotationResources,
        lemmatizer: &'a dyn Lemmatizer,
    ) -> Result<Self, AnnotateError> {
        let pattern = keyword_pattern(&resources.keywords)?;
        Ok(Self { resources, lemmatizer, pattern, strategy: ExtractionStrategy::Regex })
    }

    pub fn with_strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Keyword spans in `commentary`, in order of appearance.
    pub fn candidate_spans<'t>(&self, commentary: &'t str) -> Vec<&'t str> {
        self.pattern.find_iter(commentary).map(|m| m.as_str()).collect()
    }

    fn candidate_lemmas(&self, commentary: &str) -> Result<Vec<String>, AnnotateError> {
        let mut lemmas = Vec::new();
        match self.strategy {
            ExtractionStrategy::Regex => {
                for span in self.candidate_spans(commentary) {
                    let tokens = self.lemmatizer.lemmatize(span)?;
                    debug!(span, lemmas = ?tokens.iter().map(|t| &t.lemma).collect::<Vec<_>>(), "lemmatized span");
                    lemmas.extend(tokens.into_iter().map(|t| t.lemma));
                }
            }
            ExtractionStrategy::Nouns => {
                let tokens = self.lemmatizer.lemmatize(commentary)?;
                lemmas.extend(
                    tokens
                        .into_iter()
                        .filter(|t| t.is_noun() && self.resources.keywords.contains(&t.lemma))
                        .map(|t| t.lemma),
                );
            }
        }
        Ok(lemmas)
    }

    /// Canonical motifs and their groups for one commentary.
    pub fn tag(&self, commentary: &str) -> Result<MotifTags, AnnotateError> {
        let mut tags = MotifTags::default();
        for lemma in self.candidate_lemmas(commentary)? {
            let motif = self.resources.baseforms.canonicalize(&lemma).to_string();
            if let Some(group) = self.resources.groups.group_of(&motif) {
                tags.groups.insert(group.to_string());
            }
            tags.motifs.insert(motif);
        }
        Ok(tags)
    }

    /// Annotate one record, or `None` when it is filtered out or carries no motif.
    pub fn annotate(&self, record: &Record) -> Result<Option<AnnotatedRecord>, AnnotateError> {
        let mut summary = AnnotationSummary::default();
        self.annotate_counted(record, &mut summary)
    }

    fn annotate_counted(
        &self,
        record: &Record,
        summary: &mut AnnotationSummary,
    ) -> Result<Option<AnnotatedRecord>, AnnotateError> {
        if record.religion() == Some(PAGAN_RELIGION) {
            summary.dropped_pagan += 1;
            return Ok(None);
        }
        let Some(commentary) = record.trimmed_commentary() else {
            summary.dropped_no_commentary += 1;
            return Ok(None);
        };

        let tags = self.tag(commentary)?;
        if tags.is_empty() {
            summary.dropped_no_motif += 1;
            return Ok(None);
        }

        let motifs = tags.motifs_joined();
        let christian = classify_christian(record.religion(), &tags.motifs);
        if christian == Christian::No && indicator_substring_match(&motifs) {
            summary.flagged_substring_mismatch += 1;
            warn!(
                id = ?record.id(),
                motifs = %motifs,
                "motif string contains a Christian indicator only as a substring; classified as not Christian"
            );
        }
        if christian == Christian::Yes {
            summary.christian += 1;
        }
        summary.retained += 1;

        let mut source = record.clone();
        for key in DERIVED_FIELDS {
            source.remove(key);
        }
        Ok(Some(AnnotatedRecord {
            record: source,
            motifs,
            motif_group: tags.groups_joined(),
            christian,
        }))
    }

    /// Annotate a whole table, dropping filtered and motif-less records.
    pub fn annotate_all(
        &self,
        records: &[Record],
    ) -> Result<(Vec<AnnotatedRecord>, AnnotationSummary), AnnotateError> {
        let mut summary = AnnotationSummary { input: records.len(), ..Default::default() };
        let mut out = Vec::new();
        for record in records {
            if let Some(annotated) = self.annotate_counted(record, &mut summary)? {
                out.push(annotated);
            }
        }
        info!(
            input = summary.input,
            retained = summary.retained,
            christian = summary.christian,
            "annotation finished"
        );
        Ok((out, summary))
    }
}

/// Load `input`, annotate, and write the retained records to `output`.
pub fn annotate_file(
    annotator: &MotifAnnotator<'_>,
    input: &Path,
    output: &Path,
) -> Result<AnnotationSummary, AnnotateError> {
    let records = model::load_records(input)?;
    info!(records = records.len(), input = %input.display(), "loaded records");
    let (annotated, summary) = annotator.annotate_all(&records)?;
    model::write_json_pretty(output, &annotated)?;
    info!(output = %output.display(), "wrote annotated table");
    Ok(summary)
}
