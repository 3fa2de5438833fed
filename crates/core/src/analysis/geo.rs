//! Country geometry and choropleth rendering.
//!
//! Geometry comes from a polygon shapefile whose attribute table carries the
//! country name (Natural Earth's `ADMIN` column by default). Counts join onto it
//! by exact name match.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use shapefile::dbase::FieldValue;
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::plots::{render_err, viridis, FONT};
use crate::analysis::{find_class, find_class_count, find_class_label, AnalysisError};

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Failed to read shapefile {}: {message}", path.display())]
    Shapefile { path: PathBuf, message: String },
    #[error("Shapefile {} has no `{field}` attribute", path.display())]
    MissingField { path: PathBuf, field: String },
}

/// One country's outer rings as (longitude, latitude) points.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    pub name: String,
    pub rings: Vec<Vec<(f64, f64)>>,
}

/// Read polygons and their `name_field` attribute. Records with an empty name are skipped.
pub fn load_countries(path: &Path, name_field: &str) -> Result<Vec<CountryShape>, GeoError> {
    let shapes = shapefile::read_as::<_, shapefile::Polygon, shapefile::dbase::Record>(path)
        .map_err(|e| GeoError::Shapefile { path: path.to_path_buf(), message: e.to_string() })?;

    let mut countries = Vec::with_capacity(shapes.len());
    for (polygon, record) in shapes {
        let name = match record.get(name_field) {
            Some(FieldValue::Character(Some(name))) if !name.trim().is_empty() => {
                name.trim().to_string()
            }
            Some(_) => {
                debug!("skipping shape without a {name_field} value");
                continue;
            }
            None => {
                return Err(GeoError::MissingField {
                    path: path.to_path_buf(),
                    field: name_field.to_string(),
                })
            }
        };
        let rings = polygon
            .rings()
            .iter()
            .filter_map(|ring| match ring {
                shapefile::PolygonRing::Outer(points) => {
                    Some(points.iter().map(|p| (p.x, p.y)).collect())
                }
                shapefile::PolygonRing::Inner(_) => None,
            })
            .collect();
        countries.push(CountryShape { name, rings });
    }
    info!(countries = countries.len(), path = %path.display(), "loaded country geometry");
    Ok(countries)
}

/// A legend entry and the countries filled with its colour.
#[derive(Debug, Clone, PartialEq)]
pub struct MapCategory {
    pub label: String,
    pub color: RGBColor,
    pub countries: Vec<String>,
}

/// Countries not named by any category.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFallback {
    pub label: String,
    pub color: RGBColor,
}

/// Fill every country by category, with country borders and a legend.
pub fn render_choropleth(
    path: &Path,
    title: &str,
    countries: &[CountryShape],
    categories: &[MapCategory],
    fallback: &MapFallback,
) -> Result<(), AnalysisError> {
    let mut assignment: BTreeMap<&str, usize> = BTreeMap::new();
    for (idx, category) in categories.iter().enumerate() {
        for name in &category.countries {
            assignment.insert(name.as_str(), idx);
        }
    }

    let root = SVGBackend::new(path, (1500, 1000)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 26))
        .margin(20)
        .build_cartesian_2d(-180f64..180f64, -90f64..90f64)
        .map_err(render_err)?;

    let unassigned =
        countries.iter().filter(|c| !assignment.contains_key(c.name.as_str())).collect::<Vec<_>>();
    let fallback_color = fallback.color;
    chart
        .draw_series(
            unassigned
                .iter()
                .flat_map(|c| c.rings.iter())
                .map(|ring| Polygon::new(ring.clone(), fallback_color.filled())),
        )
        .map_err(render_err)?
        .label(fallback.label.clone())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], fallback_color.filled()));

    for (idx, category) in categories.iter().enumerate() {
        let color = category.color;
        let members = countries
            .iter()
            .filter(|c| assignment.get(c.name.as_str()) == Some(&idx))
            .flat_map(|c| c.rings.iter());
        chart
            .draw_series(members.map(|ring| Polygon::new(ring.clone(), color.filled())))
            .map_err(render_err)?
            .label(category.label.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    chart
        .draw_series(
            countries
                .iter()
                .flat_map(|c| c.rings.iter())
                .map(|ring| PathElement::new(ring.clone(), BLACK.stroke_width(1))),
        )
        .map_err(render_err)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerLeft)
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Categories for a "most common motif per country" map, one colour per distinct motif.
pub fn motif_categories(common: &BTreeMap<String, String>) -> Vec<MapCategory> {
    let mut by_motif: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (country, motif) in common {
        by_motif.entry(motif.as_str()).or_default().push(country.clone());
    }
    by_motif
        .into_iter()
        .enumerate()
        .map(|(idx, (motif, countries))| MapCategory {
            label: motif.to_string(),
            color: crate::analysis::plots::tab10(idx),
            countries,
        })
        .collect()
}

/// Categories for a finds map using the fixed class breaks; zero-count countries stay unassigned.
pub fn find_categories(finds: &BTreeMap<String, usize>) -> Vec<MapCategory> {
    let classes = find_class_count();
    let mut categories: Vec<MapCategory> = (0..classes)
        .map(|class| MapCategory {
            label: find_class_label(class),
            // Reversed viridis: more finds, darker.
            color: viridis(1.0 - class as f64 / (classes - 1) as f64),
            countries: Vec::new(),
        })
        .collect();
    for (country, count) in finds {
        if let Some(class) = find_class(*count) {
            categories[class].countries.push(country.clone());
        }
    }
    categories
}
