//! Raw species record → [`PlantProfile`].
//!
//! Quantitative 0-10 scale fields are bucketed into fixed bands, each with a
//! human-readable description and the band's bounds on the scale.

use chrono::Utc;
use serde_json::Value;

use crate::error::Result;

use super::wire::{RawImage, RawSpecies, RawTemperature};
use super::{
    Appearance, Environment, GrowthTraits, LifeCycle, PlantProfile, RangeReading, ScaleReading,
    Timing,
};

/// Bands on the 0-10 scale shared by every scale field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl Band {
    pub fn from_scale(value: f64) -> Self {
        match value {
            v if v <= 2.0 => Band::VeryLow,
            v if v <= 4.0 => Band::Low,
            v if v <= 6.0 => Band::Moderate,
            v if v <= 8.0 => Band::High,
            _ => Band::VeryHigh,
        }
    }

    /// Bounds of this band on the 0-10 scale. Bands are contiguous: the
    /// upper bound is inclusive, the lower bound exclusive except for `VeryLow`.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Band::VeryLow => (0.0, 2.0),
            Band::Low => (2.0, 4.0),
            Band::Moderate => (4.0, 6.0),
            Band::High => (6.0, 8.0),
            Band::VeryHigh => (8.0, 10.0),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

const LIGHT_LABELS: [&str; 5] = [
    "Full shade",
    "Partial shade",
    "Partial sun",
    "Full sun",
    "Intense full sun",
];
const HUMIDITY_LABELS: [&str; 5] = ["Very low", "Low", "Moderate", "High", "Very high"];
const MOISTURE_LABELS: [&str; 5] = ["Very dry", "Dry", "Moist", "Wet", "Waterlogged"];
const NUTRIENT_LABELS: [&str; 5] = ["Very poor", "Poor", "Moderate", "Rich", "Very rich"];

fn scale_reading(value: Option<f64>, labels: &[&str; 5]) -> Option<ScaleReading> {
    let value = value?.clamp(0.0, 10.0);
    let band = Band::from_scale(value);
    let (min, max) = band.bounds();
    Some(ScaleReading {
        value,
        min,
        max,
        description: labels[band.index()].to_string(),
    })
}

/// Light requirement from a 0-10 value.
pub fn light_reading(value: Option<f64>) -> Option<ScaleReading> {
    scale_reading(value, &LIGHT_LABELS)
}

pub fn humidity_reading(value: Option<f64>) -> Option<ScaleReading> {
    scale_reading(value, &HUMIDITY_LABELS)
}

pub fn soil_moisture_reading(value: Option<f64>) -> Option<ScaleReading> {
    scale_reading(value, &MOISTURE_LABELS)
}

pub fn soil_nutrient_reading(value: Option<f64>) -> Option<ScaleReading> {
    scale_reading(value, &NUTRIENT_LABELS)
}

fn ph_reading(min: Option<f64>, max: Option<f64>) -> Option<RangeReading> {
    if min.is_none() && max.is_none() {
        return None;
    }
    let description = match (min, max) {
        (_, Some(hi)) if hi < 6.0 => "Acidic",
        (Some(lo), _) if lo > 7.5 => "Alkaline",
        _ => "Neutral",
    };
    Some(RangeReading {
        min,
        max,
        unit: "pH".into(),
        description: description.into(),
    })
}

fn temperature_reading(
    min: Option<&RawTemperature>,
    max: Option<&RawTemperature>,
) -> Option<RangeReading> {
    let lo = min.and_then(|t| t.deg_c);
    let hi = max.and_then(|t| t.deg_c);
    if lo.is_none() && hi.is_none() {
        return None;
    }
    let description = match lo {
        Some(c) if c <= -20.0 => "Very cold hardy",
        Some(c) if c <= -5.0 => "Frost hardy",
        Some(c) if c <= 5.0 => "Tolerates light frost",
        Some(_) => "Frost tender",
        None => "Unknown frost tolerance",
    };
    Some(RangeReading {
        min: lo,
        max: hi,
        unit: "°C".into(),
        description: description.into(),
    })
}

fn precipitation_reading(min: Option<f64>, max: Option<f64>) -> Option<RangeReading> {
    if min.is_none() && max.is_none() {
        return None;
    }
    let midpoint = match (min, max) {
        (Some(a), Some(b)) => (a + b) / 2.0,
        (Some(v), None) | (None, Some(v)) => v,
        (None, None) => 0.0,
    };
    let description = match midpoint {
        m if m < 400.0 => "Arid",
        m if m < 800.0 => "Semi-arid",
        m if m < 1500.0 => "Moderate rainfall",
        _ => "High rainfall",
    };
    Some(RangeReading {
        min,
        max,
        unit: "mm/year".into(),
        description: description.into(),
    })
}

fn image_urls(images: Option<&Vec<RawImage>>) -> impl Iterator<Item = String> + '_ {
    images
        .into_iter()
        .flatten()
        .filter_map(|img| img.image_url.clone())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Build a profile from a raw species record, keeping the record alongside.
pub fn from_raw(raw: Value) -> Result<PlantProfile> {
    let species: RawSpecies = serde_json::from_value(raw.clone())?;
    Ok(build(species, raw))
}

fn build(species: RawSpecies, raw: Value) -> PlantProfile {
    let specs = species.specifications.unwrap_or_default();
    let growth = species.growth.unwrap_or_default();
    let genus = species.genus.clone().unwrap_or_else(|| {
        species
            .scientific_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    let mut images: Vec<String> = Vec::new();
    if let Some(set) = species.images.as_ref() {
        for group in [&set.habit, &set.flower, &set.leaf, &set.fruit, &set.bark, &set.other] {
            images.extend(image_urls(group.as_ref()));
        }
    }
    images.dedup();

    PlantProfile {
        id: species.id,
        slug: species.slug,
        scientific_name: species.scientific_name,
        common_name: non_empty(species.common_name),
        family: species.family.unwrap_or_default(),
        family_common_name: non_empty(species.family_common_name),
        genus,
        rank: species.rank.unwrap_or_else(|| "species".to_string()),
        life_cycle: LifeCycle {
            duration: species.duration.unwrap_or_default(),
            edible: species.edible.unwrap_or(false),
            edible_parts: species.edible_part.unwrap_or_default(),
            vegetable: species.vegetable.unwrap_or(false),
            toxicity: non_empty(specs.toxicity),
        },
        growth: GrowthTraits {
            ligneous_type: non_empty(specs.ligneous_type),
            growth_rate: non_empty(specs.growth_rate),
            growth_habit: non_empty(specs.growth_habit),
            average_height_cm: specs.average_height.and_then(|h| h.cm),
            maximum_height_cm: specs.maximum_height.and_then(|h| h.cm),
        },
        environment: Environment {
            light: light_reading(growth.light),
            humidity: humidity_reading(growth.atmospheric_humidity),
            soil_moisture: soil_moisture_reading(growth.soil_humidity),
            soil_nutrients: soil_nutrient_reading(growth.soil_nutriments),
            soil_ph: ph_reading(growth.ph_minimum, growth.ph_maximum),
            temperature: temperature_reading(
                growth.minimum_temperature.as_ref(),
                growth.maximum_temperature.as_ref(),
            ),
            precipitation: precipitation_reading(
                growth.minimum_precipitation.and_then(|p| p.mm),
                growth.maximum_precipitation.and_then(|p| p.mm),
            ),
        },
        timing: Timing {
            days_to_harvest: growth
                .days_to_harvest
                .filter(|d| *d >= 0.0)
                .map(|d| d.round() as u32),
            bloom_months: growth.bloom_months.unwrap_or_default(),
            growth_months: growth.growth_months.unwrap_or_default(),
            fruit_months: growth.fruit_months.unwrap_or_default(),
        },
        appearance: Appearance {
            flower_colors: species.flower.and_then(|f| f.color).unwrap_or_default(),
            foliage_colors: species
                .foliage
                .as_ref()
                .and_then(|f| f.color.clone())
                .unwrap_or_default(),
            fruit_colors: species
                .fruit_or_seed
                .and_then(|f| f.color)
                .unwrap_or_default(),
            foliage_texture: species.foliage.and_then(|f| non_empty(f.texture)),
            image_url: non_empty(species.image_url),
            images,
        },
        retrieved_at: Utc::now(),
        raw,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    /// Species record shaped like the API's tomato entry.
    pub(crate) fn tomato_json() -> Value {
        json!({
            "id": 263_319,
            "common_name": "Garden tomato",
            "slug": "solanum-lycopersicum",
            "scientific_name": "Solanum lycopersicum",
            "rank": "species",
            "family": "Solanaceae",
            "family_common_name": "Potato family",
            "genus": "Solanum",
            "image_url": "https://example.org/tomato.jpg",
            "duration": ["annual", "perennial"],
            "edible": true,
            "edible_part": ["fruits"],
            "vegetable": true,
            "images": {
                "flower": [{ "image_url": "https://example.org/flower.jpg" }],
                "fruit": [{ "image_url": "https://example.org/fruit.jpg" }]
            },
            "flower": { "color": ["yellow"], "conspicuous": true },
            "foliage": { "texture": "medium", "color": ["green"], "leaf_retention": false },
            "fruit_or_seed": { "color": ["red"], "conspicuous": true },
            "specifications": {
                "ligneous_type": null,
                "growth_habit": "Forb/herb",
                "growth_rate": "Rapid",
                "average_height": { "cm": 90 },
                "maximum_height": { "cm": 200 },
                "toxicity": "low"
            },
            "growth": {
                "days_to_harvest": 70,
                "ph_minimum": 5.5,
                "ph_maximum": 7.5,
                "light": 8,
                "atmospheric_humidity": 5,
                "growth_months": ["apr", "may", "jun"],
                "bloom_months": ["jun", "jul"],
                "fruit_months": ["jul", "aug", "sep"],
                "minimum_precipitation": { "mm": 600 },
                "maximum_precipitation": { "mm": 1200 },
                "minimum_temperature": { "deg_c": 10, "deg_f": 50 },
                "maximum_temperature": { "deg_c": 32, "deg_f": 90 },
                "soil_nutriments": 7,
                "soil_humidity": 6
            }
        })
    }
}
