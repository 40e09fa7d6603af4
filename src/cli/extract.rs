//! Offline text commands: `extract` and `check`.

use anyhow::Result;

use plantlore::{extract_mentions, is_plant_related_query, PlantMention};

/// Handle `plantlore extract`.
pub(crate) fn cmd_extract(text: &str, json: bool) -> Result<()> {
    let mentions = extract_mentions(text, &[]);
    if json {
        println!("{}", serde_json::to_string_pretty(&mentions)?);
        return Ok(());
    }
    if mentions.is_empty() {
        println!("No plant mentions found.");
        return Ok(());
    }
    println!("{:<24} {:<10} {:<12} Text", "Name", "Confidence", "Source");
    println!("{}", "-".repeat(60));
    for mention in &mentions {
        println!("{}", mention_row(mention));
    }
    Ok(())
}

/// Handle `plantlore check`.
pub(crate) fn cmd_check(text: &str) {
    if is_plant_related_query(text) {
        println!("plant-related");
    } else {
        println!("not plant-related");
    }
}

fn mention_row(mention: &PlantMention) -> String {
    format!(
        "{:<24} {:<10} {:<12} {}",
        mention.normalized_name,
        label(&mention.confidence),
        label(&mention.source),
        mention.original_text
    )
}

/// The serde name of a unit enum variant, e.g. `common_name`.
fn label<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}
