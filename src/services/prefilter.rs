//! Cheap candidate prefilter built from the indexed scalar columns.
//!
//! The conditions are OR-ed together and exist purely to bound query cost.
//! The ranker does not apply them today: scoring always runs over the full
//! `chart_data IS NOT NULL` set, and the built filter is only traced.

use crate::models::{Chart, ZodiacSystem};
use crate::services::numerology::normalize;
use crate::services::placements::sign_from_chart;

/// One OR-branch of the prefilter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefilterCondition {
    /// Sun and Moon sign both match in one system.
    SunMoon {
        system: ZodiacSystem,
        sun: String,
        moon: String,
    },
    /// Day number and life path number both overlap.
    Numerology {
        day_tokens: Vec<String>,
        life_path_tokens: Vec<String>,
    },
    /// Chinese animal matches along with some numerology overlap.
    ChineseAnimal {
        animal: String,
        day_tokens: Vec<String>,
        life_path_tokens: Vec<String>,
    },
    /// Fallback when nothing can be built from the user's chart: require
    /// only that chart data is present.
    ChartDataPresent,
}

#[derive(Debug, Clone)]
pub struct Prefilter {
    pub conditions: Vec<PrefilterCondition>,
}

impl Prefilter {
    pub fn is_fallback(&self) -> bool {
        matches!(
            self.conditions.as_slice(),
            [PrefilterCondition::ChartDataPresent]
        )
    }

    /// Renders the OR-ed WHERE clause for inspection and debug logging.
    /// Never executed against the database.
    pub fn to_sql(&self) -> String {
        let rendered: Vec<String> = self.conditions.iter().map(render_condition).collect();
        rendered.join(" OR ")
    }
}

fn render_condition(condition: &PrefilterCondition) -> String {
    match condition {
        PrefilterCondition::SunMoon { system, sun, moon } => format!(
            "(sun_sign_{system} = '{sun}' AND moon_sign_{system} = '{moon}')"
        ),
        PrefilterCondition::Numerology {
            day_tokens,
            life_path_tokens,
        } => format!(
            "(day_number IN ({}) AND life_path_number IN ({}))",
            quote_list(day_tokens),
            quote_list(life_path_tokens)
        ),
        PrefilterCondition::ChineseAnimal {
            animal,
            day_tokens,
            life_path_tokens,
        } => {
            let mut numerology = Vec::new();
            if !day_tokens.is_empty() {
                numerology.push(format!("day_number IN ({})", quote_list(day_tokens)));
            }
            if !life_path_tokens.is_empty() {
                numerology.push(format!(
                    "life_path_number IN ({})",
                    quote_list(life_path_tokens)
                ));
            }
            format!(
                "(LOWER(chinese_zodiac_animal) = '{}' AND ({}))",
                animal.to_lowercase(),
                numerology.join(" OR ")
            )
        }
        PrefilterCondition::ChartDataPresent => "(chart_data IS NOT NULL)".to_string(),
    }
}

fn quote_list(tokens: &[String]) -> String {
    let quoted: Vec<String> = tokens.iter().map(|t| format!("'{}'", t)).collect();
    quoted.join(", ")
}

/// Builds the prefilter from whatever indexed data the user's chart offers.
pub fn build_prefilter(user: &Chart) -> Prefilter {
    let mut conditions = Vec::new();

    for system in ZodiacSystem::ALL {
        let sun = sign_from_chart(user, system, "Sun");
        let moon = sign_from_chart(user, system, "Moon");
        if let (Some(sun), Some(moon)) = (sun, moon) {
            conditions.push(PrefilterCondition::SunMoon { system, sun, moon });
        }
    }

    let day_tokens = normalize(
        user.numerology
            .as_ref()
            .and_then(|n| n.day_number.as_deref()),
    );
    let life_path_tokens = normalize(
        user.numerology
            .as_ref()
            .and_then(|n| n.life_path_number.as_deref()),
    );

    if !day_tokens.is_empty() && !life_path_tokens.is_empty() {
        conditions.push(PrefilterCondition::Numerology {
            day_tokens: day_tokens.clone(),
            life_path_tokens: life_path_tokens.clone(),
        });
    }

    let animal = user.chinese_zodiac.as_ref().and_then(|z| z.animal());
    if let Some(animal) = animal {
        if !day_tokens.is_empty() || !life_path_tokens.is_empty() {
            conditions.push(PrefilterCondition::ChineseAnimal {
                animal: animal.to_string(),
                day_tokens,
                life_path_tokens,
            });
        }
    }

    if conditions.is_empty() {
        conditions.push(PrefilterCondition::ChartDataPresent);
    }

    Prefilter { conditions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_chart_builds_all_branches() {
        let user: Chart = serde_json::from_value(json!({
            "sidereal": {"major_positions": [
                {"name": "Sun", "position_text": "10°00' Capricorn"},
                {"name": "Moon", "position_text": "20°00' Aries"}
            ]},
            "tropical": {"major_positions": [
                {"name": "Sun", "position_text": "10°00' Aquarius"},
                {"name": "Moon", "position_text": "20°00' Taurus"}
            ]},
            "numerology": {"life_path_number": "22/4", "day_number": "7"},
            "chinese_zodiac": "Earth Tiger"
        }))
        .unwrap();

        let filter = build_prefilter(&user);
        assert_eq!(filter.conditions.len(), 4);
        assert!(!filter.is_fallback());

        let sql = filter.to_sql();
        assert!(sql.contains("sun_sign_sidereal = 'Capricorn'"));
        assert!(sql.contains("moon_sign_tropical = 'Taurus'"));
        assert!(sql.contains("life_path_number IN ('22', '4')"));
        assert!(sql.contains("LOWER(chinese_zodiac_animal) = 'tiger'"));
    }

    #[test]
    fn test_empty_chart_falls_back_to_chart_data_present() {
        let filter = build_prefilter(&Chart::default());
        assert!(filter.is_fallback());
        assert_eq!(filter.to_sql(), "(chart_data IS NOT NULL)");
    }

    #[test]
    fn test_partial_numerology_skips_numerology_branch() {
        let user: Chart = serde_json::from_value(json!({
            "numerology": {"day_number": "7"},
            "chinese_zodiac": "Metal Rat"
        }))
        .unwrap();

        let filter = build_prefilter(&user);
        // Numerology branch needs both figures; the animal branch accepts one.
        assert_eq!(filter.conditions.len(), 1);
        assert!(matches!(
            filter.conditions[0],
            PrefilterCondition::ChineseAnimal { .. }
        ));
    }
}
