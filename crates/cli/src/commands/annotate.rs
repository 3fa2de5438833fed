use anyhow::{Context, Result};
use motif_core::annotate::{
    annotate_file, classify_christian, AnnotationResources, AnnotationSummary, ExtractionStrategy,
    MotifAnnotator,
};
use motif_core::lemma::build_lemmatizer;
use motif_core::project::ProjectContext;
use serde::Serialize;
use tracing::debug;

use crate::commands::{open_context, resolve_or};

/// Arguments for `annotate`, mirroring the CLI flags.
#[derive(Debug, Clone, Default)]
pub struct AnnotateArgs {
    pub root: String,
    pub input: Option<String>,
    pub output: Option<String>,
    pub lemmatizer: Option<String>,
    pub strategy: Option<String>,
}

#[derive(Debug, Serialize)]
struct TagReport {
    text: String,
    lemmatizer: String,
    motifs: Vec<String>,
    motif_group: Vec<String>,
    christian: String,
}

fn apply_overrides(
    ctx: &mut ProjectContext,
    lemmatizer: Option<&str>,
    strategy: Option<&str>,
) -> Result<()> {
    if let Some(name) = lemmatizer {
        debug!(lemmatizer = name, "overriding configured lemmatizer");
        ctx.config.lemmatizer.backend = name.to_string();
    }
    if let Some(raw) = strategy {
        ctx.config.annotate.strategy =
            raw.parse::<ExtractionStrategy>().map_err(anyhow::Error::msg)?;
    }
    Ok(())
}

/// Tag every record of the fetched table and write the retained ones.
pub fn annotate_command(args: &AnnotateArgs) -> Result<AnnotationSummary> {
    let mut ctx = open_context(&args.root)?;
    apply_overrides(&mut ctx, args.lemmatizer.as_deref(), args.strategy.as_deref())?;
    let layout = &ctx.layout;
    let input = resolve_or(layout, args.input.as_deref(), &layout.results_path);
    let output = resolve_or(layout, args.output.as_deref(), &layout.annotated_path);

    let resources = AnnotationResources::load(&ctx).context("Failed to load annotation resources")?;
    let lemmatizer = build_lemmatizer(
        &ctx.config.lemmatizer,
        &resources.keywords,
        ctx.lexicon_path().as_deref(),
    )
    .context("Failed to set up lemmatizer")?;
    let annotator = MotifAnnotator::new(&resources, lemmatizer.as_ref())
        .context("Failed to build keyword pattern")?
        .with_strategy(ctx.config.annotate.strategy);

    let summary = annotate_file(&annotator, &input, &output)
        .with_context(|| format!("Failed to annotate {}", input.display()))?;

    println!(
        "Annotated {} records ({} lemmatizer, {} strategy)",
        summary.input,
        lemmatizer.name(),
        ctx.config.annotate.strategy
    );
    println!("  Dropped (pagan): {}", summary.dropped_pagan);
    println!("  Dropped (no commentary): {}", summary.dropped_no_commentary);
    println!("  Dropped (no motif): {}", summary.dropped_no_motif);
    println!("  Retained: {}", summary.retained);
    println!("  Christian: {}", summary.christian);
    if summary.flagged_substring_mismatch > 0 {
        println!("  Flagged (substring mismatch): {}", summary.flagged_substring_mismatch);
    }
    println!("  Output: {}", output.display());

    Ok(summary)
}

/// Tag a single commentary string without touching any table.
pub fn tag_command(root: &str, text: &str, lemmatizer: Option<&str>, json: bool) -> Result<()> {
    let mut ctx = open_context(root)?;
    apply_overrides(&mut ctx, lemmatizer, None)?;

    let resources = AnnotationResources::load(&ctx).context("Failed to load annotation resources")?;
    let lemmatizer = build_lemmatizer(
        &ctx.config.lemmatizer,
        &resources.keywords,
        ctx.lexicon_path().as_deref(),
    )
    .context("Failed to set up lemmatizer")?;
    let annotator = MotifAnnotator::new(&resources, lemmatizer.as_ref())
        .context("Failed to build keyword pattern")?
        .with_strategy(ctx.config.annotate.strategy);

    let tags = annotator.tag(text).context("Failed to tag text")?;
    let christian = classify_christian(None, &tags.motifs);
    let report = TagReport {
        text: text.to_string(),
        lemmatizer: lemmatizer.name().to_string(),
        motifs: tags.motifs.iter().cloned().collect(),
        motif_group: tags.groups.iter().cloned().collect(),
        christian: christian.to_string(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.motifs.is_empty() {
        println!("Motifs: (none)");
    } else {
        println!("Motifs: {}", tags.motifs_joined());
    }
    println!("Motif groups: {}", tags.groups_joined());
    println!("Christian: {}", report.christian);
    Ok(())
}
