//! The fixed figure battery.

use std::path::{Path, PathBuf};

use plotters::style::RGBColor;
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::geo::{self, CountryShape, MapFallback};
use crate::analysis::{
    binned_group_table, binned_motif_table, christian_motif_split, explode_motifs,
    finds_by_country, motif_counts, motif_group_counts, most_common_motif_by_country, plots,
    top_n, AnalysisError, Frequency, YearFilter,
};
use crate::model::{self, AnnotatedRecord};

/// Where figures go and whether/how maps are drawn.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub figures_dir: PathBuf,
    /// Country geometry; `None` skips the six map figures.
    pub shapefile: Option<PathBuf>,
    pub name_field: String,
    pub year_threshold: i32,
}

/// What a report run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportOutcome {
    pub records: usize,
    pub figures: Vec<PathBuf>,
    /// Figure names not rendered because their data was empty.
    pub skipped: Vec<String>,
    pub top_motifs: Vec<Frequency>,
    pub top_motif_groups: Vec<Frequency>,
}

struct Figures<'a> {
    dir: &'a Path,
    outcome: ReportOutcome,
}

impl Figures<'_> {
    /// Render one figure, turning empty data into a logged skip.
    fn render<F>(&mut self, file: &str, draw: F) -> Result<(), AnalysisError>
    where
        F: FnOnce(&Path) -> Result<(), AnalysisError>,
    {
        let path = self.dir.join(file);
        match draw(&path) {
            Ok(()) => {
                info!(figure = %path.display(), "rendered figure");
                self.outcome.figures.push(path);
                Ok(())
            }
            Err(AnalysisError::EmptyData(title)) => {
                warn!(figure = file, "no data for '{title}', skipping");
                self.outcome.skipped.push(file.to_string());
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

/// Render every figure for `records` into `options.figures_dir`.
pub fn render_report(
    records: &[AnnotatedRecord],
    options: &ReportOptions,
) -> Result<ReportOutcome, AnalysisError> {
    std::fs::create_dir_all(&options.figures_dir)
        .map_err(|source| AnalysisError::Io { path: options.figures_dir.clone(), source })?;

    let motifs = motif_counts(records);
    let groups = motif_group_counts(records);
    let mut figs = Figures {
        dir: &options.figures_dir,
        outcome: ReportOutcome {
            records: records.len(),
            top_motifs: top_n(&motifs, 25),
            top_motif_groups: top_n(&groups, 10),
            ..Default::default()
        },
    };

    let top_motifs = figs.outcome.top_motifs.clone();
    let top_groups = figs.outcome.top_motif_groups.clone();
    figs.render("top_motifs.svg", |p| {
        plots::bar_chart(p, "Top 25 Most Common Motifs", "Frequency", "Motifs", &top_motifs)
    })?;
    figs.render("top_motif_groups.svg", |p| {
        plots::bar_chart(p, "Top 10 Most Common Motif Groups", "Frequency", "Motif Groups", &top_groups)
    })?;

    let split = christian_motif_split(records, 15);
    figs.render("christian_motifs.svg", |p| {
        plots::christian_stacked_chart(p, "Most common Motifs on proven Christian Epitaphs", &split)
    })?;

    let binned_motifs = binned_motif_table(records);
    let group_names: Vec<String> = top_groups.iter().map(|f| f.name.clone()).collect();
    let binned_groups = binned_group_table(records).select_columns(&group_names);

    let motifs_top10 = binned_motifs.top_columns(10);
    figs.render("motif_trends.svg", |p| {
        plots::line_chart(
            p,
            "Chronological Trends of Top 10 Motifs",
            "50-Year Time Bin",
            "Frequency",
            &motifs_top10,
        )
    })?;
    figs.render("motif_group_trends.svg", |p| {
        plots::line_chart(
            p,
            "Chronological Trends of Top 10 Motif Groups",
            "50-Year Time Bin",
            "Frequency",
            &binned_groups,
        )
    })?;

    let motifs_top25 = binned_motifs.top_columns(25);
    figs.render("motif_heatmap.svg", |p| {
        plots::heatmap(p, "Chronological Trends of Top 25 Motifs", "Average Date", "Motifs", &motifs_top25)
    })?;
    figs.render("motif_group_heatmap.svg", |p| {
        plots::heatmap(
            p,
            "Chronological Trends of Top 10 Motif Groups",
            "Average Date",
            "Motif Groups",
            &binned_groups,
        )
    })?;

    if let Some(shapefile) = &options.shapefile {
        let countries = geo::load_countries(shapefile, &options.name_field)?;
        render_maps(&mut figs, records, &countries, options.year_threshold)?;
    } else {
        info!("map figures disabled");
    }

    Ok(figs.outcome)
}

fn render_maps(
    figs: &mut Figures<'_>,
    records: &[AnnotatedRecord],
    countries: &[CountryShape],
    threshold: i32,
) -> Result<(), AnalysisError> {
    let rows = explode_motifs(records);
    let year = threshold as f64;
    let windows = [
        (String::new(), String::new(), YearFilter::All),
        (
            format!("_before_{threshold}"),
            format!(" (Before Year {threshold})"),
            YearFilter::Before(year),
        ),
        (format!("_after_{threshold}"), format!(" (After Year {threshold})"), YearFilter::After(year)),
    ];
    let white = MapFallback { label: "Not in Dataset".to_string(), color: RGBColor(255, 255, 255) };
    let grey = MapFallback { label: "No finds".to_string(), color: RGBColor(211, 211, 211) };

    for (suffix, title_suffix, filter) in &windows {
        let common = most_common_motif_by_country(&rows, *filter);
        let title = format!("Most Common Motif by Country{title_suffix}");
        figs.render(&format!("common_motif_map{suffix}.svg"), |p| {
            if common.is_empty() {
                return Err(AnalysisError::EmptyData(title.clone()));
            }
            geo::render_choropleth(p, &title, countries, &geo::motif_categories(&common), &white)
        })?;
    }

    for (suffix, title_suffix, filter) in &windows {
        let finds = finds_by_country(&rows, *filter);
        let title = match filter {
            YearFilter::All => "Total Finds by Country (All Years)".to_string(),
            _ => format!("Total Finds by Country{title_suffix}"),
        };
        figs.render(&format!("finds_map{suffix}.svg"), |p| {
            geo::render_choropleth(p, &title, countries, &geo::find_categories(&finds), &grey)
        })?;
    }
    Ok(())
}

/// Load an annotated table and render the battery.
pub fn analyze_file(input: &Path, options: &ReportOptions) -> Result<ReportOutcome, AnalysisError> {
    let records = model::load_annotated(input)?;
    info!(records = records.len(), input = %input.display(), "loaded annotated table");
    render_report(&records, options)
}
