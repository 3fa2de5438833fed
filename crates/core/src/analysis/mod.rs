//! Descriptive analysis over annotated tables.
//!
//! Aggregation lives here (frequency counts, 50-year binning, cross tabs,
//! per-country statistics); `plots` and `geo` render SVG figures from these
//! aggregates and `report` runs the fixed battery.

pub mod geo;
pub mod plots;
pub mod report;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::model::{AnnotatedRecord, Christian, ModelError};

pub use geo::{CountryShape, GeoError};
pub use report::{analyze_file, render_report, ReportOptions, ReportOutcome};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Geo(#[from] GeoError),
    #[error("Failed to render figure: {0}")]
    Render(String),
    #[error("Failed to create figures dir {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Nothing to plot for '{0}'")]
    EmptyData(String),
}

/// First year of the first bin.
pub const BIN_START: i32 = 200;
/// End (exclusive) of the last bin.
pub const BIN_END: i32 = 650;
pub const BIN_WIDTH: i32 = 50;

/// Class break points for per-country find counts.
pub const FIND_BREAKS: [usize; 9] = [1, 5, 10, 15, 20, 50, 100, 200, 600];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frequency {
    pub name: String,
    pub count: usize,
}

/// Count occurrences, most frequent first; ties ordered by name.
pub fn value_counts<'a, I>(items: I) -> Vec<Frequency>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(item).or_default() += 1;
    }
    let mut out: Vec<Frequency> =
        counts.into_iter().map(|(name, count)| Frequency { name: name.to_string(), count }).collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    out
}

pub fn motif_counts(records: &[AnnotatedRecord]) -> Vec<Frequency> {
    value_counts(records.iter().flat_map(|r| r.motif_list()))
}

/// Group counts; records whose motifs map to no group contribute nothing.
pub fn motif_group_counts(records: &[AnnotatedRecord]) -> Vec<Frequency> {
    value_counts(records.iter().flat_map(|r| r.motif_group_list()))
}

pub fn top_n(counts: &[Frequency], n: usize) -> Vec<Frequency> {
    counts.iter().take(n).cloned().collect()
}

/// A half-open 50-year interval `[start, start + 50)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateBin {
    pub start: i32,
}

impl DateBin {
    pub fn end(&self) -> i32 {
        self.start + BIN_WIDTH
    }

    pub fn label(&self) -> String {
        format!("{} to {}", self.start, self.end() - 1)
    }
}

/// All bins in chronological order.
pub fn date_bins() -> Vec<DateBin> {
    (BIN_START..BIN_END).step_by(BIN_WIDTH as usize).map(|start| DateBin { start }).collect()
}

/// Bin for an average date; `None` outside `[BIN_START, BIN_END)`.
pub fn date_bin(average_date: f64) -> Option<DateBin> {
    if !average_date.is_finite() || average_date < BIN_START as f64 || average_date >= BIN_END as f64
    {
        return None;
    }
    let offset = ((average_date - BIN_START as f64) / BIN_WIDTH as f64).floor() as i32;
    Some(DateBin { start: BIN_START + offset * BIN_WIDTH })
}

/// Counts indexed by (row label, column label), dense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossTab {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `counts[row][column]`.
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    fn from_pairs<'a, I>(rows: Vec<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        let mut cells: BTreeMap<&str, BTreeMap<usize, usize>> = BTreeMap::new();
        for (row, column) in pairs {
            *cells.entry(column).or_default().entry(row).or_default() += 1;
        }
        let columns: Vec<String> = cells.keys().map(|c| c.to_string()).collect();
        let mut counts = vec![vec![0; columns.len()]; rows.len()];
        for (col_idx, per_row) in cells.values().enumerate() {
            for (row, count) in per_row {
                counts[*row][col_idx] = *count;
            }
        }
        Self { rows, columns, counts }
    }

    pub fn get(&self, row: usize, column: usize) -> usize {
        self.counts.get(row).and_then(|r| r.get(column)).copied().unwrap_or(0)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column_totals(&self) -> Vec<Frequency> {
        let mut totals: Vec<Frequency> = self
            .columns
            .iter()
            .enumerate()
            .map(|(j, name)| Frequency {
                name: name.clone(),
                count: (0..self.rows.len()).map(|i| self.get(i, j)).sum(),
            })
            .collect();
        totals.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        totals
    }

    /// Keep only `names`, in that order. Unknown names become all-zero columns.
    pub fn select_columns(&self, names: &[String]) -> CrossTab {
        let indices: Vec<Option<usize>> = names.iter().map(|n| self.column_index(n)).collect();
        let counts = (0..self.rows.len())
            .map(|i| indices.iter().map(|j| j.map_or(0, |j| self.get(i, j))).collect())
            .collect();
        CrossTab { rows: self.rows.clone(), columns: names.to_vec(), counts }
    }

    /// The `n` columns with the highest totals, most frequent first.
    pub fn top_columns(&self, n: usize) -> CrossTab {
        let names: Vec<String> =
            self.column_totals().into_iter().take(n).map(|f| f.name).collect();
        self.select_columns(&names)
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }
}

fn binned_table<'a, F>(records: &'a [AnnotatedRecord], entries: F) -> CrossTab
where
    F: Fn(&'a AnnotatedRecord) -> Vec<&'a str>,
{
    let bins = date_bins();
    let rows = bins.iter().map(DateBin::label).collect();
    let pairs = records.iter().flat_map(|record| {
        let row = record
            .record
            .average_date()
            .and_then(date_bin)
            .and_then(|bin| bins.iter().position(|b| *b == bin));
        let values = if row.is_some() { entries(record) } else { Vec::new() };
        values.into_iter().filter_map(move |v| row.map(|r| (r, v)))
    });
    CrossTab::from_pairs(rows, pairs)
}

/// Motif frequency per 50-year bin (rows: bins, columns: motifs).
pub fn binned_motif_table(records: &[AnnotatedRecord]) -> CrossTab {
    binned_table(records, |r| r.motif_list())
}

/// Motif-group frequency per 50-year bin.
pub fn binned_group_table(records: &[AnnotatedRecord]) -> CrossTab {
    binned_table(records, |r| r.motif_group_list())
}

/// Per-motif record counts split by Christian label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChristianSplit {
    pub motif: String,
    pub yes: usize,
    pub no: usize,
}

/// Among the `top` most common motifs, those seen on at least one Christian
/// record, ordered by ascending Christian count.
pub fn christian_motif_split(records: &[AnnotatedRecord], top: usize) -> Vec<ChristianSplit> {
    let top_motifs: BTreeSet<String> =
        motif_counts(records).into_iter().take(top).map(|f| f.name).collect();
    let mut splits: BTreeMap<&str, ChristianSplit> = BTreeMap::new();
    for record in records {
        for motif in record.motif_list() {
            if !top_motifs.contains(motif) {
                continue;
            }
            let entry = splits.entry(motif).or_insert_with(|| ChristianSplit {
                motif: motif.to_string(),
                yes: 0,
                no: 0,
            });
            match record.christian {
                Christian::Yes => entry.yes += 1,
                Christian::No => entry.no += 1,
            }
        }
    }
    let mut out: Vec<ChristianSplit> = splits.into_values().filter(|s| s.yes > 0).collect();
    out.sort_by(|a, b| a.yes.cmp(&b.yes).then_with(|| a.motif.cmp(&b.motif)));
    out
}

/// One (record, motif) pair with the record's location and date.
#[derive(Debug, Clone, PartialEq)]
pub struct MotifRow<'a> {
    pub country: Option<&'a str>,
    pub motif: &'a str,
    pub average_date: Option<f64>,
}

pub fn explode_motifs(records: &[AnnotatedRecord]) -> Vec<MotifRow<'_>> {
    records
        .iter()
        .flat_map(|record| {
            let country = record.record.country().filter(|c| !c.is_empty());
            let average_date = record.record.average_date();
            record.motif_list().into_iter().map(move |motif| MotifRow { country, motif, average_date })
        })
        .collect()
}

/// Date window applied before per-country aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YearFilter {
    All,
    /// Average date strictly before the year.
    Before(f64),
    /// Average date at or after the year.
    After(f64),
}

impl YearFilter {
    /// Rows without a date only pass the `All` filter.
    pub fn accepts(&self, average_date: Option<f64>) -> bool {
        match (self, average_date) {
            (YearFilter::All, _) => true,
            (YearFilter::Before(year), Some(date)) => date < *year,
            (YearFilter::After(year), Some(date)) => date >= *year,
            (_, None) => false,
        }
    }
}

/// Most common motif per country; ties go to the alphabetically first motif.
pub fn most_common_motif_by_country(
    rows: &[MotifRow<'_>],
    filter: YearFilter,
) -> BTreeMap<String, String> {
    let mut per_country: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for row in rows.iter().filter(|r| filter.accepts(r.average_date)) {
        let Some(country) = row.country else { continue };
        *per_country.entry(country).or_default().entry(row.motif).or_default() += 1;
    }
    per_country
        .into_iter()
        .filter_map(|(country, motifs)| {
            // max_by keeps the last maximum; iterate in reverse so the first name wins.
            motifs
                .into_iter()
                .rev()
                .max_by_key(|(_, count)| *count)
                .map(|(motif, _)| (country.to_string(), motif.to_string()))
        })
        .collect()
}

/// Number of (record, motif) rows per country.
pub fn finds_by_country(rows: &[MotifRow<'_>], filter: YearFilter) -> BTreeMap<String, usize> {
    let mut out: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows.iter().filter(|r| filter.accepts(r.average_date)) {
        if let Some(country) = row.country {
            *out.entry(country.to_string()).or_default() += 1;
        }
    }
    out
}

/// Class index for a find count: `None` for zero, values past the last break clip
/// into the last class.
pub fn find_class(count: usize) -> Option<usize> {
    if count < FIND_BREAKS[0] {
        return None;
    }
    let last = FIND_BREAKS.len() - 2;
    Some(FIND_BREAKS.windows(2).position(|w| count < w[1]).unwrap_or(last))
}

/// Legend label for a class index returned by [`find_class`].
pub fn find_class_label(class: usize) -> String {
    let last = FIND_BREAKS.len() - 2;
    if class >= last {
        format!("{} or more", FIND_BREAKS[last])
    } else {
        format!("{} to {}", FIND_BREAKS[class], FIND_BREAKS[class + 1] - 1)
    }
}

pub fn find_class_count() -> usize {
    FIND_BREAKS.len() - 1
}
