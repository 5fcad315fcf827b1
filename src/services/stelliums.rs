use crate::models::{Chart, SystemChart, ZodiacSystem};

/// A comparable stellium identity parsed out of a pattern description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StelliumKey {
    /// Sign-based stellium, e.g. 4 bodies in Capricorn.
    Sign(String),
    /// House-based stellium, keyed by house number.
    House(String),
}

/// Raw stellium descriptions per zodiac system.
#[derive(Debug, Clone, Default)]
pub struct Stelliums {
    pub sidereal: Vec<String>,
    pub tropical: Vec<String>,
}

impl Stelliums {
    pub fn system(&self, system: ZodiacSystem) -> &[String] {
        match system {
            ZodiacSystem::Sidereal => &self.sidereal,
            ZodiacSystem::Tropical => &self.tropical,
        }
    }
}

/// Filters each system's aspect patterns to stellium descriptions,
/// matching the substring "stellium" case-insensitively and keeping the
/// full description text.
pub fn extract_stelliums(chart: &Chart) -> Stelliums {
    Stelliums {
        sidereal: for_system(chart.system(ZodiacSystem::Sidereal)),
        tropical: for_system(chart.system(ZodiacSystem::Tropical)),
    }
}

fn for_system(system_chart: Option<&SystemChart>) -> Vec<String> {
    let Some(system_chart) = system_chart else {
        return Vec::new();
    };
    system_chart
        .aspect_patterns
        .iter()
        .filter(|pattern| pattern.description.to_lowercase().contains("stellium"))
        .map(|pattern| pattern.description.clone())
        .collect()
}

/// Parses a description into a comparable key. Unparseable descriptions
/// yield `None` and are excluded from comparison, though they still appear
/// in the raw lists.
pub fn stellium_key(description: &str) -> Option<StelliumKey> {
    if description.contains("Sign Stellium") {
        between(description, "bodies in ", " (").map(|sign| StelliumKey::Sign(sign.to_string()))
    } else if description.contains("House Stellium") {
        // rfind skips the "House Stellium" label itself when the house
        // number is written as "House N".
        let start = description.rfind("House ")? + "House ".len();
        let rest = &description[start..];
        let end = rest.find(" (")?;
        let value = rest[..end].trim();
        (!value.is_empty()).then(|| StelliumKey::House(value.to_string()))
    } else {
        None
    }
}

fn between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = text.find(start)? + start.len();
    let rest = &text[from..];
    let to = rest.find(end)?;
    let value = rest[..to].trim();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_filters_to_stellium_patterns() {
        let chart: Chart = serde_json::from_value(json!({
            "sidereal": {
                "aspect_patterns": [
                    {"description": "Sign Stellium: 4 bodies in Capricorn (Sun, Mercury, Venus, Saturn)"},
                    {"description": "Grand Trine: Sun, Moon, Jupiter"},
                    {"description": "house STELLIUM: 3 bodies in House 10 (Sun, Mercury, Venus)"}
                ]
            },
            "tropical": {
                "aspect_patterns": [
                    {"description": "T-Square: Moon, Mars, Saturn"}
                ]
            }
        }))
        .unwrap();

        let stelliums = extract_stelliums(&chart);
        assert_eq!(stelliums.sidereal.len(), 2);
        assert!(stelliums.tropical.is_empty());
    }

    #[test]
    fn test_sign_stellium_key() {
        let key = stellium_key("Sign Stellium: 4 bodies in Capricorn (Sun, Mercury, Venus, Saturn)");
        assert_eq!(key, Some(StelliumKey::Sign("Capricorn".to_string())));
    }

    #[test]
    fn test_house_stellium_key() {
        let key = stellium_key("House Stellium: 3 bodies in House 10 (Sun, Mercury, Venus)");
        assert_eq!(key, Some(StelliumKey::House("10".to_string())));
    }

    #[test]
    fn test_unparseable_description_yields_none() {
        assert_eq!(stellium_key("Stellium somewhere"), None);
        assert_eq!(stellium_key("Sign Stellium: malformed"), None);
        assert_eq!(stellium_key("Grand Trine: Sun, Moon, Jupiter"), None);
    }

    #[test]
    fn test_sign_and_house_keys_never_compare_equal() {
        let sign = stellium_key("Sign Stellium: 3 bodies in Leo (Sun, Mercury, Venus)").unwrap();
        let house = stellium_key("House Stellium: 3 bodies in House 5 (Sun, Mercury, Venus)").unwrap();
        assert_ne!(sign, house);
    }
}
