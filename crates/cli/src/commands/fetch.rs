use anyhow::{bail, Context, Result};
use motif_core::fetch::{fetch_to_file, ArchiveClient, FetchError, HttpArchiveClient};

use crate::commands::{open_context, resolve_or};

/// Download the configured archive query into the project's data dir.
pub fn fetch_command(root: &str, output: Option<&str>) -> Result<()> {
    let client = HttpArchiveClient::new().context("Failed to build HTTP client")?;
    fetch_with_client(root, output, &client)
}

/// Same as [`fetch_command`] with an injected transport.
pub fn fetch_with_client(root: &str, output: Option<&str>, client: &dyn ArchiveClient) -> Result<()> {
    let ctx = open_context(root)?;
    let layout = &ctx.layout;
    let output_path = resolve_or(layout, output, &layout.results_path);

    match fetch_to_file(client, &ctx.config.fetch, &output_path, &layout.fetch_metadata_path) {
        Ok(meta) => {
            println!("Fetched {} items from {}", meta.item_count, meta.endpoint);
            println!("  Output: {}", meta.output);
            println!("  SHA-256: {}", meta.sha256);
            println!("  Metadata: {}", layout.fetch_metadata_path.display());
            Ok(())
        }
        Err(FetchError::Status { code, body }) => {
            eprintln!("Error: {code}");
            eprintln!("{body}");
            bail!("Archive request failed with status {code}; nothing was written");
        }
        Err(err) => Err(err)
            .with_context(|| format!("Failed to fetch archive into {}", output_path.display())),
    }
}
