use anyhow::{Context, Result};
use motif_core::analysis::{analyze_file, ReportOptions, ReportOutcome};
use motif_core::project::ProjectContext;
use tracing::info;

use crate::commands::{annotate_command, fetch_command, open_context, resolve_or, AnnotateArgs};

/// Arguments for `analyze`, mirroring the CLI flags.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeArgs {
    pub root: String,
    pub input: Option<String>,
    pub figures_dir: Option<String>,
    pub skip_maps: bool,
    pub json: bool,
}

fn report_options(ctx: &ProjectContext, figures_dir: Option<&str>, skip_maps: bool) -> ReportOptions {
    let layout = &ctx.layout;
    ReportOptions {
        figures_dir: resolve_or(layout, figures_dir, &layout.figures_dir),
        shapefile: (!skip_maps).then(|| ctx.shapefile_path()),
        name_field: ctx.config.analyze.name_field.clone(),
        year_threshold: ctx.config.analyze.year_threshold,
    }
}

/// Render the figure battery from the annotated table.
pub fn analyze_command(args: &AnalyzeArgs) -> Result<ReportOutcome> {
    let ctx = open_context(&args.root)?;
    let layout = &ctx.layout;
    let input = resolve_or(layout, args.input.as_deref(), &layout.annotated_path);
    let options = report_options(&ctx, args.figures_dir.as_deref(), args.skip_maps);

    if let Some(shapefile) = &options.shapefile {
        if !shapefile.is_file() {
            anyhow::bail!(
                "Shapefile not found at {} (place country geometry there or pass --skip-maps)",
                shapefile.display()
            );
        }
    }

    let outcome = analyze_file(&input, &options)
        .with_context(|| format!("Failed to analyze {}", input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(outcome);
    }

    println!("Analyzed {} annotated records", outcome.records);
    println!("Figures ({}):", outcome.figures.len());
    for figure in &outcome.figures {
        println!("- {}", figure.display());
    }
    if !outcome.skipped.is_empty() {
        println!("Skipped (no data):");
        for name in &outcome.skipped {
            println!("- {}", name);
        }
    }
    if let Some(top) = outcome.top_motifs.first() {
        println!("Most common motif: {} ({})", top.name, top.count);
    }
    Ok(outcome)
}

/// Fetch, annotate and analyze with project defaults.
pub fn run_command(root: &str, skip_maps: bool) -> Result<()> {
    info!("stage 1/3: fetch");
    fetch_command(root, None).context("Fetch stage failed")?;
    info!("stage 2/3: annotate");
    annotate_command(&AnnotateArgs { root: root.to_string(), ..Default::default() })
        .context("Annotate stage failed")?;
    info!(skip_maps, "stage 3/3: analyze");
    analyze_command(&AnalyzeArgs { root: root.to_string(), skip_maps, ..Default::default() })
        .context("Analyze stage failed")?;
    Ok(())
}
