use std::collections::HashMap;
use std::path::Path;

use crate::lemma::{LemmaError, Lemmatizer, Token};
use crate::resources::KeywordList;

pub const NAME: &str = "builtin";

/// German inflectional endings, longest first so `-es`/`-en` win over `-e`/`-n`/`-s`.
const SUFFIXES: &[&str] = &["es", "en", "e", "n", "s"];

#[derive(Debug, Clone, PartialEq, Eq)]
struct LexiconEntry {
    lemma: String,
    upos: Option<String>,
}

/// Surface form -> lemma overrides, loaded from `surface<TAB>lemma[<TAB>upos]` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    entries: HashMap<String, LexiconEntry>,
}

impl Lexicon {
    pub fn parse(body: &str) -> Self {
        let mut entries = HashMap::new();
        for line in body.lines() {
            let line = line.trim_end();
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut cols = line.split('\t');
            let (Some(surface), Some(lemma)) = (cols.next(), cols.next()) else {
                continue;
            };
            let upos = cols.next().map(str::trim).filter(|u| !u.is_empty()).map(str::to_string);
            entries.insert(
                surface.trim().to_string(),
                LexiconEntry { lemma: lemma.trim().to_string(), upos },
            );
        }
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, LemmaError> {
        let body = std::fs::read_to_string(path)
            .map_err(|source| LemmaError::Lexicon { path: path.to_path_buf(), source })?;
        Ok(Self::parse(&body))
    }

    pub fn insert(&mut self, surface: &str, lemma: &str, upos: Option<&str>) {
        self.entries.insert(
            surface.to_string(),
            LexiconEntry { lemma: lemma.to_string(), upos: upos.map(str::to_string) },
        );
    }

    fn lookup(&self, surface: &str) -> Option<&LexiconEntry> {
        self.entries.get(surface).or_else(|| self.entries.get(&surface.to_lowercase()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Dependency-free lemmatizer that folds inflected keyword forms back onto the keyword.
///
/// Resolution order per token: lexicon entry, exact keyword (any case), keyword
/// after stripping one inflectional suffix, otherwise the token itself.
#[derive(Debug, Clone)]
pub struct StemLemmatizer {
    keywords: KeywordList,
    lexicon: Lexicon,
}

impl StemLemmatizer {
    pub fn new(keywords: KeywordList) -> Self {
        Self { keywords, lexicon: Lexicon::default() }
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    fn resolve(&self, surface: &str) -> (String, Option<String>) {
        if let Some(entry) = self.lexicon.lookup(surface) {
            return (entry.lemma.clone(), entry.upos.clone());
        }
        if let Some(keyword) = self.keywords.find_ignore_case(surface) {
            return (keyword.to_string(), None);
        }
        for suffix in SUFFIXES {
            let Some(stem) = strip_suffix_ignore_case(surface, suffix) else {
                continue;
            };
            if let Some(keyword) = self.keywords.find_ignore_case(stem) {
                return (keyword.to_string(), None);
            }
        }
        (surface.to_string(), None)
    }
}

fn strip_suffix_ignore_case<'a>(word: &'a str, suffix: &str) -> Option<&'a str> {
    if word.chars().count() <= suffix.chars().count() {
        return None;
    }
    let split = word.len().checked_sub(suffix.len())?;
    if !word.is_char_boundary(split) {
        return None;
    }
    let (stem, tail) = word.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(stem)
}

fn guess_upos(surface: &str) -> &'static str {
    match surface.chars().next() {
        Some(c) if c.is_uppercase() => "NOUN",
        _ => "X",
    }
}

/// Split on anything that is not alphanumeric; keeps umlauts and Greek letters together.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty())
}

impl Lemmatizer for StemLemmatizer {
    fn lemmatize(&self, text: &str) -> Result<Vec<Token>, LemmaError> {
        Ok(tokenize(text)
            .map(|surface| {
                let (lemma, upos) = self.resolve(surface);
                let upos = upos.unwrap_or_else(|| guess_upos(surface).to_string());
                Token::new(surface, lemma, upos)
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemmatizer() -> StemLemmatizer {
        StemLemmatizer::new(KeywordList::new(["Delphin", "Kreuz", "Taube"]))
    }

    #[test]
    fn strips_plural_suffix_back_to_keyword() {
        let tokens = lemmatizer().lemmatize("Delphine").unwrap();
        assert_eq!(tokens, vec![Token::new("Delphine", "Delphin", "NOUN")]);
    }

    #[test]
    fn matches_keywords_case_insensitively() {
        let tokens = lemmatizer().lemmatize("kreuzes").unwrap();
        assert_eq!(tokens[0].lemma, "Kreuz");
        assert_eq!(tokens[0].upos, "X");
    }

    #[test]
    fn unknown_tokens_are_their_own_lemma() {
        let tokens = lemmatizer().lemmatize("zwei Schiffe").unwrap();
        let lemmas: Vec<_> = tokens.iter().map(|t| t.lemma.as_str()).collect();
        assert_eq!(lemmas, ["zwei", "Schiffe"]);
    }

    #[test]
    fn lexicon_overrides_keyword_resolution() {
        let mut lexicon = Lexicon::default();
        lexicon.insert("Tauben", "Taube", Some("NOUN"));
        lexicon.insert("Vögel", "Vogel", None);
        let lem = lemmatizer().with_lexicon(lexicon);
        let tokens = lem.lemmatize("Tauben und Vögel").unwrap();
        assert_eq!(tokens[0].lemma, "Taube");
        assert_eq!(tokens[2].lemma, "Vogel");
        assert_eq!(tokens[2].upos, "NOUN");
    }

    #[test]
    fn lexicon_parse_skips_comments_and_short_lines() {
        let lexicon = Lexicon::parse("# header\nBäume\tBaum\tNOUN\nbroken\n\n");
        assert_eq!(lexicon.len(), 1);
    }

    #[test]
    fn suffix_strip_respects_char_boundaries() {
        assert_eq!(strip_suffix_ignore_case("Ωs", "s"), Some("Ω"));
        assert_eq!(strip_suffix_ignore_case("e", "e"), None);
    }
}
