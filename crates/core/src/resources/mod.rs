//! Static lookup tables used by annotation.
//!
//! All three are immutable once loaded. Lookups return `Option` and the caller
//! decides what a miss means; for baseforms a miss passes the lemma through.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}: expected `Name: value, value`, got {content:?}", path.display())]
    Malformed { path: PathBuf, line: usize, content: String },
}

fn read_resource(path: &Path) -> Result<String, ResourceError> {
    std::fs::read_to_string(path)
        .map_err(|source| ResourceError::Io { path: path.to_path_buf(), source })
}

/// Motif surface forms searched for in commentaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordList {
    keywords: Vec<String>,
    index: HashSet<String>,
    /// Lowercased keyword to its position in `keywords`; first listed wins.
    folded: HashMap<String, usize>,
}

impl KeywordList {
    /// Build from an iterator of keywords; blanks are skipped and duplicates collapsed.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = HashSet::new();
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .filter(|k| index.insert(k.clone()))
            .collect();
        let mut folded = HashMap::with_capacity(keywords.len());
        for (position, keyword) in keywords.iter().enumerate() {
            folded.entry(keyword.to_lowercase()).or_insert(position);
        }
        Self { keywords, index, folded }
    }

    /// Parse one keyword per line.
    pub fn parse(body: &str) -> Self {
        Self::new(body.lines())
    }

    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        Ok(Self::parse(&read_resource(path)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    /// Case-insensitive lookup returning the keyword as listed.
    pub fn find_ignore_case(&self, word: &str) -> Option<&str> {
        self.folded
            .get(&word.to_lowercase())
            .map(|&position| self.keywords[position].as_str())
    }
}

/// Variant spellings and inflections folded onto canonical motif names.
const BUILTIN_BASEFORMS: &[(&str, &str)] = &[
    ("Delfin", "Delphine"),
    ("Delfine", "Delphine"),
    ("Delfinen", "Delphine"),
    ("Delfins", "Delphine"),
    ("Delphin", "Delphine"),
    ("Delphins", "Delphine"),
    ("Vögel", "Vogel"),
    ("Bäume", "Baum"),
    ("Früchte", "Frucht"),
    ("Lämmer", "Lamm"),
    ("Kantharoi", "Kantharos"),
    ("Orant", "Orans"),
    ("Orans", "Orans"),
    ("Orantin", "Orans"),
    ("Oranten", "Orans"),
    ("Orante", "Orans"),
    ("Christusmonogram", "Christusmonogramm"),
    ("Christusmonogramms", "Christusmonogramm"),
    ("Christusmonogramme", "Christusmonogramm"),
    ("Christogram", "Christusmonogramm"),
    ("Christograms", "Christusmonogramm"),
    ("Christogramm", "Christusmonogramm"),
    ("Christogramme", "Christusmonogramm"),
    ("Staurogram", "Staurogramm"),
    ("Kreuzzeichen", "Kreuz"),
    ("ascia", "Ascia"),
    ("Ω", "Alpha & Omega"),
    ("ω", "Alpha & Omega"),
    ("Alpha", "Alpha & Omega"),
    ("Omega", "Alpha & Omega"),
    ("alpha", "Alpha & Omega"),
    ("omega", "Alpha & Omega"),
    ("Girland", "Girlande"),
    ("Efeurank", "Efeuranke"),
    ("Weinrank", "Weinranke"),
    ("Zang", "Zange"),
    ("Zimmermanns", "Zimmermann"),
    ("Olivenbaums", "Olivenbaum"),
    ("Olivenbaumes", "Olivenbaum"),
];

/// Many-to-one mapping from lemma variants to canonical motif names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseformMap {
    map: HashMap<String, String>,
}

impl BaseformMap {
    pub fn empty() -> Self {
        Self { map: HashMap::new() }
    }

    pub fn builtin() -> Self {
        Self::empty().with_entries(BUILTIN_BASEFORMS.iter().copied())
    }

    /// Add or replace entries.
    pub fn with_entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.map.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Parse `Variant: Canonical` lines.
    pub fn parse_overrides(path: &Path, body: &str) -> Result<Vec<(String, String)>, ResourceError> {
        let mut entries = Vec::new();
        for (idx, line) in body.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (variant, canonical) = split_pair(path, idx + 1, line)?;
            entries.push((variant.to_string(), canonical.to_string()));
        }
        Ok(entries)
    }

    /// Built-in table with overrides from `path` merged on top.
    pub fn builtin_with_overrides(path: &Path) -> Result<Self, ResourceError> {
        let body = read_resource(path)?;
        Ok(Self::builtin().with_entries(Self::parse_overrides(path, &body)?))
    }

    pub fn get(&self, lemma: &str) -> Option<&str> {
        self.map.get(lemma).map(String::as_str)
    }

    /// Mapped canonical name, or the lemma itself when it has no entry.
    pub fn canonicalize<'a>(&'a self, lemma: &'a str) -> &'a str {
        self.get(lemma).unwrap_or(lemma)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for BaseformMap {
    fn default() -> Self {
        Self::builtin()
    }
}

fn split_pair<'a>(
    path: &Path,
    line_no: usize,
    line: &'a str,
) -> Result<(&'a str, &'a str), ResourceError> {
    line.split_once(':').map(|(a, b)| (a.trim(), b.trim())).ok_or_else(|| {
        ResourceError::Malformed {
            path: path.to_path_buf(),
            line: line_no,
            content: line.to_string(),
        }
    })
}

/// Named groups of canonical motifs, with the motif -> group inverse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordGroups {
    groups: BTreeMap<String, Vec<String>>,
    motif_to_group: HashMap<String, String>,
}

impl KeywordGroups {
    /// Build from `(group, members)` pairs in file order.
    ///
    /// A motif listed under several groups resolves to the last one.
    pub fn new<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut out = Self::default();
        for (name, members) in groups {
            for motif in &members {
                out.motif_to_group.insert(motif.clone(), name.clone());
            }
            out.groups.insert(name, members);
        }
        out
    }

    /// Parse `GroupName: motif1, motif2, ...` lines. `path` is only used in errors.
    pub fn parse(path: &Path, body: &str) -> Result<Self, ResourceError> {
        let mut groups = Vec::new();
        for (idx, line) in body.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (name, members) = split_pair(path, idx + 1, line)?;
            let members = members
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
            groups.push((name.to_string(), members));
        }
        Ok(Self::new(groups))
    }

    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let body = read_resource(path)?;
        Self::parse(path, &body)
    }

    pub fn group_of(&self, motif: &str) -> Option<&str> {
        self.motif_to_group.get(motif).map(String::as_str)
    }

    pub fn members(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Group names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
