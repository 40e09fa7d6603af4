//! Profile formatters: narrative text, one-line summary, and structured record.
//!
//! Pure functions over a [`PlantProfile`]. Fields that are absent in the
//! profile are left out rather than rendered as placeholders.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::Serialize;

use crate::profile::{PlantProfile, RangeReading, ScaleReading};

/// Header placed above a block of narratives.
pub const CONTEXT_HEADER: &str = "## Plant reference";

/// Multi-line Markdown description of one profile.
pub fn narrative(profile: &PlantProfile) -> String {
    let mut out = String::new();
    match profile.common_name.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(common) => {
            let _ = writeln!(out, "### {} (*{}*)", common, profile.scientific_name);
        }
        None => {
            let _ = writeln!(out, "### *{}*", profile.scientific_name);
        }
    }

    let mut taxonomy = Vec::new();
    if !profile.family.is_empty() {
        match profile.family_common_name.as_deref() {
            Some(fc) => taxonomy.push(format!("family {} ({})", profile.family, fc)),
            None => taxonomy.push(format!("family {}", profile.family)),
        }
    }
    if !profile.genus.is_empty() {
        taxonomy.push(format!("genus {}", profile.genus));
    }
    if !profile.rank.is_empty() {
        taxonomy.push(format!("rank {}", profile.rank));
    }
    line(&mut out, "Taxonomy", &taxonomy.join(", "));

    let life = &profile.life_cycle;
    line(&mut out, "Life cycle", &life.duration.join(", "));
    if life.edible {
        let parts = if life.edible_parts.is_empty() {
            "yes".to_string()
        } else {
            format!("yes ({})", life.edible_parts.join(", "))
        };
        line(&mut out, "Edible", &parts);
    }
    if life.vegetable {
        line(&mut out, "Vegetable", "yes");
    }
    if let Some(toxicity) = life.toxicity.as_deref() {
        line(&mut out, "Toxicity", toxicity);
    }

    let growth = &profile.growth;
    let mut habit = Vec::new();
    if let Some(h) = growth.growth_habit.as_deref() {
        habit.push(format!("{} habit", h));
    }
    if let Some(r) = growth.growth_rate.as_deref() {
        habit.push(format!("{} growth", r.to_lowercase()));
    }
    if let Some(l) = growth.ligneous_type.as_deref() {
        habit.push(l.to_string());
    }
    if let Some(h) = growth.average_height_cm {
        habit.push(format!("average height {} cm", h));
    }
    if let Some(h) = growth.maximum_height_cm {
        habit.push(format!("maximum height {} cm", h));
    }
    line(&mut out, "Growth", &habit.join(", "));

    let env = &profile.environment;
    scale_line(&mut out, "Light", env.light.as_ref());
    scale_line(&mut out, "Humidity", env.humidity.as_ref());
    scale_line(&mut out, "Soil moisture", env.soil_moisture.as_ref());
    scale_line(&mut out, "Soil nutrients", env.soil_nutrients.as_ref());
    range_line(&mut out, "Soil pH", env.soil_ph.as_ref());
    range_line(&mut out, "Temperature", env.temperature.as_ref());
    range_line(&mut out, "Precipitation", env.precipitation.as_ref());

    let timing = &profile.timing;
    if let Some(days) = timing.days_to_harvest {
        line(&mut out, "Days to harvest", &days.to_string());
    }
    line(&mut out, "Growing months", &timing.growth_months.join(", "));
    line(&mut out, "Bloom months", &timing.bloom_months.join(", "));
    line(&mut out, "Fruit months", &timing.fruit_months.join(", "));

    let look = &profile.appearance;
    let mut colors = Vec::new();
    if !look.flower_colors.is_empty() {
        colors.push(format!("flowers {}", look.flower_colors.join("/")));
    }
    if !look.foliage_colors.is_empty() {
        colors.push(format!("foliage {}", look.foliage_colors.join("/")));
    }
    if !look.fruit_colors.is_empty() {
        colors.push(format!("fruit {}", look.fruit_colors.join("/")));
    }
    line(&mut out, "Colors", &colors.join("; "));

    out
}

/// One line: `Common (Scientific) - family X; light; soil moisture`.
pub fn summary(profile: &PlantProfile) -> String {
    let mut out = match profile.common_name.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(common) => format!("{} ({})", common, profile.scientific_name),
        None => profile.scientific_name.clone(),
    };
    let mut details = Vec::new();
    if !profile.family.is_empty() {
        details.push(format!("family {}", profile.family));
    }
    if let Some(light) = &profile.environment.light {
        details.push(format!("{} light", light.description.to_lowercase()));
    }
    if let Some(moisture) = &profile.environment.soil_moisture {
        details.push(format!("{} soil", moisture.description.to_lowercase()));
    }
    if !details.is_empty() {
        out.push_str(" - ");
        out.push_str(&details.join("; "));
    }
    out
}

/// Structured, machine-oriented view of a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantRecord {
    pub id: u64,
    pub slug: String,
    pub display_name: String,
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub family: String,
    pub genus: String,
    pub rank: String,
    pub duration: Vec<String>,
    pub edible: bool,
    pub edible_parts: Vec<String>,
    pub vegetable: bool,
    pub toxicity: Option<String>,
    pub growth_habit: Option<String>,
    pub growth_rate: Option<String>,
    pub average_height_cm: Option<f64>,
    pub maximum_height_cm: Option<f64>,
    pub light: Option<ScaleReading>,
    pub humidity: Option<ScaleReading>,
    pub soil_moisture: Option<ScaleReading>,
    pub soil_nutrients: Option<ScaleReading>,
    pub soil_ph: Option<RangeReading>,
    pub temperature: Option<RangeReading>,
    pub precipitation: Option<RangeReading>,
    pub days_to_harvest: Option<u32>,
    pub bloom_months: Vec<String>,
    pub growth_months: Vec<String>,
    pub fruit_months: Vec<String>,
    pub flower_colors: Vec<String>,
    pub foliage_colors: Vec<String>,
    pub fruit_colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

pub fn record(profile: &PlantProfile) -> PlantRecord {
    let env = &profile.environment;
    PlantRecord {
        id: profile.id,
        slug: profile.slug.clone(),
        display_name: profile.display_name().to_string(),
        scientific_name: profile.scientific_name.clone(),
        common_name: profile.common_name.clone(),
        family: profile.family.clone(),
        genus: profile.genus.clone(),
        rank: profile.rank.clone(),
        duration: profile.life_cycle.duration.clone(),
        edible: profile.life_cycle.edible,
        edible_parts: profile.life_cycle.edible_parts.clone(),
        vegetable: profile.life_cycle.vegetable,
        toxicity: profile.life_cycle.toxicity.clone(),
        growth_habit: profile.growth.growth_habit.clone(),
        growth_rate: profile.growth.growth_rate.clone(),
        average_height_cm: profile.growth.average_height_cm,
        maximum_height_cm: profile.growth.maximum_height_cm,
        light: env.light.clone(),
        humidity: env.humidity.clone(),
        soil_moisture: env.soil_moisture.clone(),
        soil_nutrients: env.soil_nutrients.clone(),
        soil_ph: env.soil_ph.clone(),
        temperature: env.temperature.clone(),
        precipitation: env.precipitation.clone(),
        days_to_harvest: profile.timing.days_to_harvest,
        bloom_months: profile.timing.bloom_months.clone(),
        growth_months: profile.timing.growth_months.clone(),
        fruit_months: profile.timing.fruit_months.clone(),
        flower_colors: profile.appearance.flower_colors.clone(),
        foliage_colors: profile.appearance.foliage_colors.clone(),
        fruit_colors: profile.appearance.fruit_colors.clone(),
        image_url: profile.appearance.image_url.clone(),
    }
}

/// Narratives for several profiles under [`CONTEXT_HEADER`]; empty when
/// there is nothing to describe.
pub fn context_block(profiles: &[Arc<PlantProfile>]) -> String {
    if profiles.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(profiles.len() * 512);
    out.push_str(CONTEXT_HEADER);
    out.push_str("\n\n");
    let body: Vec<String> = profiles.iter().map(|p| narrative(p)).collect();
    out.push_str(&body.join("\n"));
    out
}

// -- private helpers -------------------------------------------------------

fn line(out: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "- {}: {}", label, value);
    }
}

fn scale_line(out: &mut String, label: &str, reading: Option<&ScaleReading>) {
    if let Some(r) = reading {
        let _ = writeln!(
            out,
            "- {}: {} ({}/10, band {}-{})",
            label, r.description, r.value, r.min, r.max
        );
    }
}

fn range_line(out: &mut String, label: &str, reading: Option<&RangeReading>) {
    let Some(r) = reading else {
        return;
    };
    let range = match (r.min, r.max) {
        (Some(lo), Some(hi)) => format!("{}-{} {}", lo, hi, r.unit),
        (Some(lo), None) => format!("from {} {}", lo, r.unit),
        (None, Some(hi)) => format!("up to {} {}", hi, r.unit),
        (None, None) => String::new(),
    };
    if range.is_empty() {
        line(out, label, &r.description);
    } else {
        let _ = writeln!(out, "- {}: {} ({})", label, r.description, range);
    }
}
