//! Normalized plant profiles.
//!
//! A [`PlantProfile`] is built once from a raw species record and never
//! mutated afterwards. Caches and registries hand out `Arc<PlantProfile>`
//! so the same profile can sit in several stores at once.

pub mod transform;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use self::transform::{from_raw, Band};
pub use self::wire::SearchHit;

/// A resolved, normalized plant record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantProfile {
    /// Stable remote id; the canonical cache key once resolved.
    pub id: u64,
    pub slug: String,
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub family: String,
    pub family_common_name: Option<String>,
    pub genus: String,
    pub rank: String,
    pub life_cycle: LifeCycle,
    pub growth: GrowthTraits,
    pub environment: Environment,
    pub timing: Timing,
    pub appearance: Appearance,
    pub retrieved_at: DateTime<Utc>,
    /// The unprocessed source record, kept for traceability.
    #[serde(skip_serializing_if = "Value::is_null", default)]
    pub raw: Value,
}

impl PlantProfile {
    /// Common name when known, otherwise the scientific name.
    pub fn display_name(&self) -> &str {
        self.common_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.scientific_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeCycle {
    /// "annual", "biennial", "perennial"; may hold several.
    pub duration: Vec<String>,
    pub edible: bool,
    pub edible_parts: Vec<String>,
    pub vegetable: bool,
    pub toxicity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthTraits {
    pub ligneous_type: Option<String>,
    pub growth_rate: Option<String>,
    pub growth_habit: Option<String>,
    pub average_height_cm: Option<f64>,
    pub maximum_height_cm: Option<f64>,
}

/// A 0-10 scale reading with its band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleReading {
    pub value: f64,
    /// Lower bound of the band on the 0-10 scale.
    pub min: f64,
    /// Upper bound of the band on the 0-10 scale.
    pub max: f64,
    pub description: String,
}

/// A measured range such as temperature or precipitation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeReading {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub light: Option<ScaleReading>,
    pub humidity: Option<ScaleReading>,
    pub soil_moisture: Option<ScaleReading>,
    pub soil_nutrients: Option<ScaleReading>,
    pub soil_ph: Option<RangeReading>,
    pub temperature: Option<RangeReading>,
    pub precipitation: Option<RangeReading>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub days_to_harvest: Option<u32>,
    pub bloom_months: Vec<String>,
    pub growth_months: Vec<String>,
    pub fruit_months: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    pub flower_colors: Vec<String>,
    pub foliage_colors: Vec<String>,
    pub fruit_colors: Vec<String>,
    pub foliage_texture: Option<String>,
    pub image_url: Option<String>,
    pub images: Vec<String>,
}
