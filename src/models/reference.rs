use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use super::chart::{lenient_f64, Chart, ZodiacSystem};

/// One precomputed reference person.
///
/// Created and refreshed by an offline batch job; read-only at match time.
/// The indexed scalar columns exist for cheap filtering; `chart_data` is the
/// source of truth, with `planetary_placements` and `top_aspects` as derived
/// optimization caches.
#[derive(Debug, Clone, FromRow)]
pub struct ReferenceRecord {
    pub id: Uuid,
    pub name: String,
    pub occupation: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birth_location: Option<String>,
    pub sun_sign_sidereal: Option<String>,
    pub sun_sign_tropical: Option<String>,
    pub moon_sign_sidereal: Option<String>,
    pub moon_sign_tropical: Option<String>,
    pub life_path_number: Option<String>,
    pub day_number: Option<String>,
    pub chinese_zodiac_animal: Option<String>,
    pub chart_data: Option<Value>,
    pub planetary_placements: Option<Value>,
    pub top_aspects: Option<Value>,
}

impl ReferenceRecord {
    /// Parses the full chart blob. Malformed JSON is treated as absent so
    /// one bad record never aborts a scan.
    pub fn chart(&self) -> Option<Chart> {
        let value = self.chart_data.as_ref()?;
        match serde_json::from_value(value.clone()) {
            Ok(chart) => Some(chart),
            Err(error) => {
                tracing::debug!(record_id = %self.id, %error, "Unparseable chart_data, treating as absent");
                None
            }
        }
    }

    /// Parses the precomputed placements blob, if present and well-formed.
    pub fn placement_cache(&self) -> Option<PlacementCache> {
        let value = self.planetary_placements.as_ref()?;
        match serde_json::from_value(value.clone()) {
            Ok(cache) => Some(cache),
            Err(error) => {
                tracing::debug!(record_id = %self.id, %error, "Unparseable planetary_placements, treating as absent");
                None
            }
        }
    }

    /// Indexed scalar sign column. Only Sun and Moon are denormalized.
    pub fn indexed_sign(&self, body: &str, system: ZodiacSystem) -> Option<&str> {
        let column = match (body, system) {
            ("Sun", ZodiacSystem::Sidereal) => &self.sun_sign_sidereal,
            ("Sun", ZodiacSystem::Tropical) => &self.sun_sign_tropical,
            ("Moon", ZodiacSystem::Sidereal) => &self.moon_sign_sidereal,
            ("Moon", ZodiacSystem::Tropical) => &self.moon_sign_tropical,
            _ => return None,
        };
        column.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Parsed `planetary_placements` blob: per system, body name -> placement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlacementCache {
    #[serde(default)]
    pub sidereal: HashMap<String, CachedPlacement>,
    #[serde(default)]
    pub tropical: HashMap<String, CachedPlacement>,
}

impl PlacementCache {
    pub fn system(&self, system: ZodiacSystem) -> &HashMap<String, CachedPlacement> {
        match system {
            ZodiacSystem::Sidereal => &self.sidereal,
            ZodiacSystem::Tropical => &self.tropical,
        }
    }
}

/// One cached body placement: sign plus optional degree/house.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CachedPlacement {
    #[serde(default)]
    pub sign: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub degree: Option<f64>,
    #[serde(default)]
    pub house: Option<i64>,
}
