//! Wire types for the plant data API.
//!
//! Every field the API may omit or send as `null` is optional or defaulted;
//! the API is loose about which blocks are populated per species.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ data, meta }` envelope returned by `GET /species/{id|slug}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Option<Value>,
}

/// `{ data: [...], links, meta: { total } }` envelope returned by search.
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub links: Option<Value>,
    #[serde(default)]
    pub meta: Option<ListMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub total: Option<u64>,
}

/// Error body: `{ "error": true, "message": "..." }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// One row of a species search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: u64,
    #[serde(default)]
    pub common_name: Option<String>,
    pub slug: String,
    pub scientific_name: String,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub family_common_name: Option<String>,
    #[serde(default)]
    pub genus: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// Full species record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSpecies {
    pub id: u64,
    pub common_name: Option<String>,
    pub slug: String,
    pub scientific_name: String,
    pub rank: Option<String>,
    pub family: Option<String>,
    pub family_common_name: Option<String>,
    pub genus: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub image_url: Option<String>,
    pub duration: Option<Vec<String>>,
    pub edible: Option<bool>,
    pub edible_part: Option<Vec<String>>,
    pub vegetable: Option<bool>,
    pub observations: Option<String>,
    pub images: Option<RawImages>,
    pub flower: Option<RawColored>,
    pub foliage: Option<RawFoliage>,
    pub fruit_or_seed: Option<RawColored>,
    pub specifications: Option<RawSpecifications>,
    pub growth: Option<RawGrowth>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawImage {
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawImages {
    pub flower: Option<Vec<RawImage>>,
    pub leaf: Option<Vec<RawImage>>,
    pub habit: Option<Vec<RawImage>>,
    pub fruit: Option<Vec<RawImage>>,
    pub bark: Option<Vec<RawImage>>,
    pub other: Option<Vec<RawImage>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawColored {
    pub color: Option<Vec<String>>,
    pub conspicuous: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFoliage {
    pub texture: Option<String>,
    pub color: Option<Vec<String>>,
    pub leaf_retention: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLength {
    pub cm: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDepth {
    pub mm: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTemperature {
    pub deg_c: Option<f64>,
    pub deg_f: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSpecifications {
    pub ligneous_type: Option<String>,
    pub growth_form: Option<String>,
    pub growth_habit: Option<String>,
    pub growth_rate: Option<String>,
    pub average_height: Option<RawLength>,
    pub maximum_height: Option<RawLength>,
    pub toxicity: Option<String>,
}

/// Growing requirements. The `light`, `atmospheric_humidity`, `soil_humidity`
/// and `soil_nutriments` fields are on a 0-10 scale.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGrowth {
    pub description: Option<String>,
    pub sowing: Option<String>,
    pub days_to_harvest: Option<f64>,
    pub ph_minimum: Option<f64>,
    pub ph_maximum: Option<f64>,
    pub light: Option<f64>,
    pub atmospheric_humidity: Option<f64>,
    pub growth_months: Option<Vec<String>>,
    pub bloom_months: Option<Vec<String>>,
    pub fruit_months: Option<Vec<String>>,
    pub minimum_precipitation: Option<RawDepth>,
    pub maximum_precipitation: Option<RawDepth>,
    pub minimum_temperature: Option<RawTemperature>,
    pub maximum_temperature: Option<RawTemperature>,
    pub soil_nutriments: Option<f64>,
    pub soil_humidity: Option<f64>,
}
