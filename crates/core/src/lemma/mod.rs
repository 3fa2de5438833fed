//! Lemmatizer seam.
//!
//! Annotation only needs "submit a text span, receive ordered tokens with their
//! lemma and part of speech". Anything honouring that contract can be plugged
//! in through [`Lemmatizer`]; implementations are selected by name from a
//! [`LemmatizerRegistry`].

pub mod builtin;
pub mod command;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::project::LemmatizerConfig;
use crate::resources::KeywordList;

pub use builtin::{Lexicon, StemLemmatizer};
pub use command::CommandLemmatizer;

/// One token of lemmatizer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface form as it appeared in the input.
    pub text: String,
    pub lemma: String,
    /// Universal part-of-speech tag (`NOUN`, `VERB`, ...).
    #[serde(default)]
    pub upos: String,
}

impl Token {
    pub fn new(text: impl Into<String>, lemma: impl Into<String>, upos: impl Into<String>) -> Self {
        Self { text: text.into(), lemma: lemma.into(), upos: upos.into() }
    }

    pub fn is_noun(&self) -> bool {
        self.upos == "NOUN"
    }
}

#[derive(Debug, Error)]
pub enum LemmaError {
    #[error("Unknown lemmatizer '{name}'. Available: {available}")]
    Unknown { name: String, available: String },
    #[error("Lemmatizer '{0}' is not configured: {1}")]
    NotConfigured(String, String),
    #[error("Failed to read lexicon {}: {source}", path.display())]
    Lexicon {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Lemmatizer process error: {0}")]
    Process(String),
    #[error("Lemmatizer returned invalid output: {0}")]
    Output(String),
}

/// Anything that turns a text span into lemmatized tokens.
pub trait Lemmatizer {
    fn lemmatize(&self, text: &str) -> Result<Vec<Token>, LemmaError>;
    fn name(&self) -> &'static str;
}

/// Registry for lemmatizers; callers select by name.
#[derive(Default)]
pub struct LemmatizerRegistry {
    lemmatizers: HashMap<String, Box<dyn Lemmatizer>>,
}

impl LemmatizerRegistry {
    pub fn new() -> Self {
        Self { lemmatizers: HashMap::new() }
    }

    pub fn register<L: Lemmatizer + 'static>(&mut self, lemmatizer: L) -> &mut Self {
        self.lemmatizers.insert(lemmatizer.name().to_string(), Box::new(lemmatizer));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Lemmatizer> {
        self.lemmatizers.get(name).map(|l| &**l)
    }

    /// Take ownership of a registered lemmatizer.
    pub fn take(&mut self, name: &str) -> Result<Box<dyn Lemmatizer>, LemmaError> {
        let available = self.names().join(", ");
        self.lemmatizers
            .remove(name)
            .ok_or_else(|| LemmaError::Unknown { name: name.to_string(), available })
    }

    /// Return a sorted list of registered names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lemmatizers.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Names of every lemmatizer this build knows how to construct.
pub fn known_lemmatizers() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            builtin::NAME,
            "Keyword-aware German suffix stripper with optional TSV lexicon (no external deps)",
        ),
        (
            command::NAME,
            "External program reading a span on stdin and printing JSON tokens (e.g. a Stanza wrapper)",
        ),
    ]
}

/// Build a registry from config: `builtin` is always present, `command` only when configured.
pub fn default_lemmatizer_registry(
    config: &LemmatizerConfig,
    keywords: &KeywordList,
    lexicon_path: Option<&Path>,
) -> Result<LemmatizerRegistry, LemmaError> {
    let lexicon = match lexicon_path {
        Some(path) => Lexicon::load(path)?,
        None => Lexicon::default(),
    };
    let mut registry = LemmatizerRegistry::new();
    registry.register(StemLemmatizer::new(keywords.clone()).with_lexicon(lexicon));
    if let Some(argv) = config.command.as_ref().filter(|argv| !argv.is_empty()) {
        registry.register(CommandLemmatizer::new(argv.clone()));
    }
    Ok(registry)
}

/// Resolve the configured lemmatizer, failing with a clear message when it is unavailable.
pub fn build_lemmatizer(
    config: &LemmatizerConfig,
    keywords: &KeywordList,
    lexicon_path: Option<&Path>,
) -> Result<Box<dyn Lemmatizer>, LemmaError> {
    let mut registry = default_lemmatizer_registry(config, keywords, lexicon_path)?;
    if config.backend == command::NAME && registry.get(command::NAME).is_none() {
        return Err(LemmaError::NotConfigured(
            command::NAME.to_string(),
            "set lemmatizer.command to the program and its arguments".to_string(),
        ));
    }
    registry.take(&config.backend)
}
