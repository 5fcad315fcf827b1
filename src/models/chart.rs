use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// The two zodiac reference systems a chart carries in parallel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSystem {
    Sidereal,
    Tropical,
}

impl ZodiacSystem {
    pub const ALL: [ZodiacSystem; 2] = [ZodiacSystem::Sidereal, ZodiacSystem::Tropical];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZodiacSystem::Sidereal => "sidereal",
            ZodiacSystem::Tropical => "tropical",
        }
    }
}

impl fmt::Display for ZodiacSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A full natal chart as produced by the chart-calculation engine.
///
/// Either the live user chart or a stored reference chart; both share this
/// shape. Every section is optional: a missing section contributes nothing
/// to scoring instead of failing the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub sidereal: Option<SystemChart>,
    #[serde(default)]
    pub tropical: Option<SystemChart>,
    #[serde(default)]
    pub numerology: Option<Numerology>,
    #[serde(default)]
    pub chinese_zodiac: Option<ChineseZodiac>,
    /// Birth time unknown: house and angle dependent data is suppressed upstream.
    #[serde(default)]
    pub unknown_time: bool,
}

impl Chart {
    pub fn system(&self, system: ZodiacSystem) -> Option<&SystemChart> {
        match system {
            ZodiacSystem::Sidereal => self.sidereal.as_ref(),
            ZodiacSystem::Tropical => self.tropical.as_ref(),
        }
    }
}

/// Per-system chart data: positions, aspects and detected patterns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemChart {
    #[serde(default)]
    pub major_positions: Vec<MajorPosition>,
    #[serde(default)]
    pub aspects: Vec<Aspect>,
    #[serde(default)]
    pub aspect_patterns: Vec<AspectPattern>,
}

/// One body or angle placement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MajorPosition {
    pub name: String,
    /// Degree + sign text, e.g. `25°30' Capricorn`. The sign is always the
    /// last whitespace-delimited token.
    #[serde(default)]
    pub position_text: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub degrees: Option<f64>,
    #[serde(default)]
    pub retrograde: bool,
}

/// An angular relationship between two bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Aspect {
    pub p1_name: String,
    pub p2_name: String,
    #[serde(rename = "type")]
    pub aspect_type: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub orb: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: Option<f64>,
}

impl Aspect {
    /// Strength used for ranking; a malformed value sorts last.
    pub fn score_or_default(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }

    /// Orb used for tie-breaking; a malformed value sorts last.
    pub fn orb_or_default(&self) -> f64 {
        self.orb.unwrap_or(999.0)
    }
}

/// A detected aspect pattern, described in prose ("Sign Stellium: ...").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AspectPattern {
    #[serde(default)]
    pub description: String,
}

/// Chart-wide numerology figures, possibly compound master/reduced forms
/// such as `"22/4"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Numerology {
    #[serde(default)]
    pub life_path_number: Option<String>,
    #[serde(default)]
    pub day_number: Option<String>,
}

/// Chinese zodiac, either a combined "element animal" string or structured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChineseZodiac {
    Structured {
        #[serde(default)]
        animal: Option<String>,
        #[serde(default)]
        element: Option<String>,
    },
    Text(String),
}

impl ChineseZodiac {
    /// The animal component. For the string form this is the last
    /// whitespace token ("Earth Tiger" -> "Tiger"). The element never
    /// participates in matching.
    pub fn animal(&self) -> Option<&str> {
        match self {
            ChineseZodiac::Structured { animal, .. } => {
                animal.as_deref().map(str::trim).filter(|a| !a.is_empty())
            }
            ChineseZodiac::Text(text) => text.split_whitespace().last(),
        }
    }
}

/// Accepts numbers or numeric strings; anything else degrades to `None`
/// instead of failing chart deserialization.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}
