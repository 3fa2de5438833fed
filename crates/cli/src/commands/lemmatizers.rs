use anyhow::Result;
use motif_core::lemma::known_lemmatizers;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LemmatizerInfo {
    pub name: String,
    pub description: String,
}

/// List lemmatizer backends known to this binary.
pub fn list_lemmatizers_command(json: bool) -> Result<()> {
    let mut entries: Vec<LemmatizerInfo> = known_lemmatizers()
        .into_iter()
        .map(|(name, description)| LemmatizerInfo {
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Lemmatizers:");
    for entry in entries {
        println!("- {}: {}", entry.name, entry.description);
    }
    Ok(())
}
