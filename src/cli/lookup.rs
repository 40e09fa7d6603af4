//! Network commands: `search` and `lookup`.

use anyhow::{Context, Result};

use plantlore::{narrative, record, Config, PlantKnowledge};

fn knowledge(config: Config) -> Result<PlantKnowledge> {
    if config.api.token.is_none() {
        anyhow::bail!(
            "No plant API token configured. Set PLANTLORE_API_TOKEN or api.token in {}",
            Config::path().display()
        );
    }
    PlantKnowledge::builder()
        .config(config)
        .build()
        .with_context(|| "Failed to initialize plant client")
}

/// Handle `plantlore search`.
pub(crate) async fn cmd_search(config: Config, query: &str, limit: usize) -> Result<()> {
    let knowledge = knowledge(config)?;
    let hits = knowledge
        .client()
        .search_by_name(query, limit)
        .await
        .with_context(|| format!("Search for '{}' failed", query))?;

    if hits.is_empty() {
        println!("No plants found for '{}'.", query);
        return Ok(());
    }
    println!("{:<10} {:<36} {:<24} Family", "Id", "Scientific name", "Common name");
    println!("{}", "-".repeat(84));
    for hit in &hits {
        println!(
            "{:<10} {:<36} {:<24} {}",
            hit.id,
            hit.scientific_name,
            hit.common_name.as_deref().unwrap_or("-"),
            hit.family.as_deref().unwrap_or("-"),
        );
    }
    knowledge.client().metrics().emit("search");
    Ok(())
}

/// Handle `plantlore lookup`.
pub(crate) async fn cmd_lookup(config: Config, name: &str, json: bool) -> Result<()> {
    let knowledge = knowledge(config)?;
    let registry = knowledge.new_conversation();
    let profile = knowledge
        .client()
        .resolve_by_name(name, &registry)
        .await
        .with_context(|| format!("Lookup of '{}' failed", name))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record(&profile))?);
    } else {
        print!("{}", narrative(&profile));
    }
    knowledge.client().metrics().emit("lookup");
    Ok(())
}
