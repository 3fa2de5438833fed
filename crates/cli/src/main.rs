use anyhow::Result;
use clap::{Parser, Subcommand};

use motif_tagger::commands::{
    analyze_command, annotate_command, fetch_command, init_project_command,
    list_lemmatizers_command, project_info_command, run_command, tag_command, AnalyzeArgs,
    AnnotateArgs,
};

/// Motif tagging CLI for epitaph records.
///
/// This CLI is a thin wrapper around `motif-core` (exposed in code as `motif_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "motif-tagger",
    version,
    about = "Fetch, motif-tag and chart epitaph records",
    long_about = None
)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a project at the given root.
    ///
    /// This will:
    /// - Create `.motif`, `data`, `mapdata` and `figures` directories.
    /// - Write a `.motif/project.json` config file unless one exists.
    InitProject {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional project name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,
    },

    /// Show config, resolved paths and resource status for a project.
    ProjectInfo {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Query the archive and save the raw response (default `data/results.json`).
    Fetch {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Output path, relative to the root.
        #[arg(long)]
        output: Option<String>,
    },

    /// Tag fetched records with motifs and write the annotated table.
    Annotate {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Input table (default `data/results.json`).
        #[arg(long)]
        input: Option<String>,

        /// Output table (default `data/filtered_data.json`).
        #[arg(long)]
        output: Option<String>,

        /// Lemmatizer name (see `list-lemmatizers`); overrides the config.
        #[arg(long)]
        lemmatizer: Option<String>,

        /// Candidate extraction strategy: `regex` or `nouns`; overrides the config.
        #[arg(long)]
        strategy: Option<String>,
    },

    /// Tag a single commentary string and print the result.
    Tag {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Commentary text to tag.
        text: String,

        /// Lemmatizer name; overrides the config.
        #[arg(long)]
        lemmatizer: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Render the figure battery from an annotated table.
    Analyze {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Annotated table (default `data/filtered_data.json`).
        #[arg(long)]
        input: Option<String>,

        /// Figure directory (default `figures`).
        #[arg(long)]
        figures_dir: Option<String>,

        /// Only render charts; skip the country maps and their shapefile.
        #[arg(long, default_value_t = false)]
        skip_maps: bool,

        /// Emit a JSON summary instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Fetch, annotate and analyze in sequence.
    Run {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Only render charts; skip the country maps and their shapefile.
        #[arg(long, default_value_t = false)]
        skip_maps: bool,
    },

    /// List the lemmatizers this build can use.
    ListLemmatizers {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    motif_tagger::init_tracing(cli.verbose);

    match cli.command {
        Command::InitProject { root, name } => init_project_command(&root, name)?,
        Command::ProjectInfo { root, json } => project_info_command(&root, json)?,
        Command::Fetch { root, output } => fetch_command(&root, output.as_deref())?,
        Command::Annotate { root, input, output, lemmatizer, strategy } => {
            annotate_command(&AnnotateArgs { root, input, output, lemmatizer, strategy })?;
        }
        Command::Tag { root, text, lemmatizer, json } => {
            tag_command(&root, &text, lemmatizer.as_deref(), json)?
        }
        Command::Analyze { root, input, figures_dir, skip_maps, json } => {
            analyze_command(&AnalyzeArgs { root, input, figures_dir, skip_maps, json })?;
        }
        Command::Run { root, skip_maps } => run_command(&root, skip_maps)?,
        Command::ListLemmatizers { json } => list_lemmatizers_command(json)?,
    }

    Ok(())
}
