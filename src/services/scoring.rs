//! Comprehensive weighted similarity scorer.
//!
//! Maintains a running `(score, max_possible)` pair so the final percentage
//! only counts components where data existed on both sides. A component with
//! missing data contributes to neither term.

use crate::models::{Chart, ReferenceRecord, ZodiacSystem};
use crate::services::aspects::{candidate_top_aspects, count_matches, top_aspects, DEFAULT_TOP_N};
use crate::services::classifiers::ASPECT_MATCH_THRESHOLD;
use crate::services::numerology;
use crate::services::placements::{resolve_candidate_sign, sign_from_chart};

/// Fixed placement weights. Ascendant/Rising is deliberately not scored.
pub const BODY_WEIGHTS: [(&str, f64); 10] = [
    ("Sun", 5.0),
    ("Moon", 5.0),
    ("Mercury", 3.0),
    ("Venus", 3.0),
    ("Mars", 2.0),
    ("Jupiter", 2.0),
    ("Saturn", 2.0),
    ("Uranus", 2.0),
    ("Neptune", 2.0),
    ("Pluto", 2.0),
];

const ASPECT_BONUS: f64 = 15.0;
const NUMEROLOGY_WEIGHT: f64 = 10.0;
const CHINESE_ZODIAC_WEIGHT: f64 = 10.0;

/// Scores a candidate against the user's chart, 0 to 100.
///
/// Returns `0.0` immediately when the candidate has no usable chart data,
/// and `0.0` when no component could be evaluated on both sides
/// (`max_possible == 0`) even if a classifier found a qualitative match
/// elsewhere.
pub fn score(user: &Chart, record: &ReferenceRecord) -> f64 {
    match record.chart() {
        Some(candidate_chart) => score_against(user, record, &candidate_chart),
        None => 0.0,
    }
}

/// Scorer body for an already-parsed candidate chart.
pub fn score_against(user: &Chart, record: &ReferenceRecord, candidate_chart: &Chart) -> f64 {
    let mut score = 0.0;
    let mut max_possible = 0.0;

    let cache = record.placement_cache();

    // Planetary placements, evaluated independently per zodiac system: each
    // weight can enter the denominator twice when both systems resolve.
    for system in ZodiacSystem::ALL {
        for (body, weight) in BODY_WEIGHTS {
            let user_sign = sign_from_chart(user, system, body);
            let candidate_sign = resolve_candidate_sign(
                cache.as_ref(),
                record,
                Some(candidate_chart),
                system,
                body,
            );
            if let (Some(user_sign), Some(candidate_sign)) = (user_sign, candidate_sign) {
                max_possible += weight;
                if user_sign == candidate_sign {
                    score += weight;
                }
            }
        }
    }

    // Aspect overlap: a flat bonus when either system clears the threshold.
    let user_top = top_aspects(user, DEFAULT_TOP_N);
    let candidate_top = candidate_top_aspects(record, Some(candidate_chart));
    let sidereal_matches = count_matches(
        user_top.system(ZodiacSystem::Sidereal),
        candidate_top.system(ZodiacSystem::Sidereal),
    );
    let tropical_matches = count_matches(
        user_top.system(ZodiacSystem::Tropical),
        candidate_top.system(ZodiacSystem::Tropical),
    );
    if sidereal_matches >= ASPECT_MATCH_THRESHOLD || tropical_matches >= ASPECT_MATCH_THRESHOLD {
        score += ASPECT_BONUS;
        max_possible += ASPECT_BONUS;
    }

    // Numerology: life path and day number, 10 points each.
    let user_life_path = user
        .numerology
        .as_ref()
        .and_then(|n| n.life_path_number.as_deref());
    let user_day = user
        .numerology
        .as_ref()
        .and_then(|n| n.day_number.as_deref());
    let candidate_life_path = record.life_path_number.as_deref().or_else(|| {
        candidate_chart
            .numerology
            .as_ref()
            .and_then(|n| n.life_path_number.as_deref())
    });
    let candidate_day = record.day_number.as_deref().or_else(|| {
        candidate_chart
            .numerology
            .as_ref()
            .and_then(|n| n.day_number.as_deref())
    });

    if numerology::is_present(user_life_path) && numerology::is_present(candidate_life_path) {
        max_possible += NUMEROLOGY_WEIGHT;
        if numerology::overlaps(user_life_path, candidate_life_path) {
            score += NUMEROLOGY_WEIGHT;
        }
    }
    if numerology::is_present(user_day) && numerology::is_present(candidate_day) {
        max_possible += NUMEROLOGY_WEIGHT;
        if numerology::overlaps(user_day, candidate_day) {
            score += NUMEROLOGY_WEIGHT;
        }
    }

    // Chinese zodiac animal only; the dominant element is never scored.
    let user_animal = user.chinese_zodiac.as_ref().and_then(|z| z.animal());
    let candidate_animal = record
        .chinese_zodiac_animal
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .or_else(|| candidate_chart.chinese_zodiac.as_ref().and_then(|z| z.animal()));
    if let (Some(user_animal), Some(candidate_animal)) = (user_animal, candidate_animal) {
        max_possible += CHINESE_ZODIAC_WEIGHT;
        if user_animal.eq_ignore_ascii_case(candidate_animal) {
            score += CHINESE_ZODIAC_WEIGHT;
        }
    }

    if max_possible > 0.0 {
        // Clamp guards against floating rounding pushing past 100.
        (score / max_possible * 100.0).min(100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn bare_record() -> ReferenceRecord {
        ReferenceRecord {
            id: Uuid::new_v4(),
            name: "Test Person".to_string(),
            occupation: None,
            birth_date: None,
            birth_location: None,
            sun_sign_sidereal: None,
            sun_sign_tropical: None,
            moon_sign_sidereal: None,
            moon_sign_tropical: None,
            life_path_number: None,
            day_number: None,
            chinese_zodiac_animal: None,
            chart_data: None,
            planetary_placements: None,
            top_aspects: None,
        }
    }

    fn sun_moon_chart_value(
        sidereal: (&str, &str),
        tropical: (&str, &str),
    ) -> serde_json::Value {
        json!({
            "sidereal": {"major_positions": [
                {"name": "Sun", "position_text": format!("10°00' {}", sidereal.0)},
                {"name": "Moon", "position_text": format!("20°00' {}", sidereal.1)}
            ]},
            "tropical": {"major_positions": [
                {"name": "Sun", "position_text": format!("10°00' {}", tropical.0)},
                {"name": "Moon", "position_text": format!("20°00' {}", tropical.1)}
            ]}
        })
    }

    #[test]
    fn test_null_chart_data_short_circuits_to_zero() {
        let user: Chart =
            serde_json::from_value(sun_moon_chart_value(("Capricorn", "Aries"), ("Capricorn", "Aries")))
                .unwrap();
        let mut record = bare_record();
        record.sun_sign_sidereal = Some("Capricorn".to_string());
        record.moon_sign_sidereal = Some("Aries".to_string());

        assert_eq!(score(&user, &record), 0.0);
    }

    #[test]
    fn test_identical_sun_moon_both_systems_scores_full() {
        // Sun+Moon matching in both systems: 20/20 from placements alone.
        let chart_value = sun_moon_chart_value(("Capricorn", "Aries"), ("Capricorn", "Aries"));
        let user: Chart = serde_json::from_value(chart_value.clone()).unwrap();
        let mut record = bare_record();
        record.chart_data = Some(chart_value);

        assert_eq!(score(&user, &record), 100.0);
    }

    #[test]
    fn test_partial_placement_match() {
        let user: Chart =
            serde_json::from_value(sun_moon_chart_value(("Capricorn", "Aries"), ("Capricorn", "Aries")))
                .unwrap();
        let mut record = bare_record();
        record.chart_data = Some(sun_moon_chart_value(
            ("Capricorn", "Leo"),
            ("Capricorn", "Leo"),
        ));

        // Sun matches in both systems (5 + 5), Moon in neither: 10/20.
        assert_eq!(score(&user, &record), 50.0);
    }

    #[test]
    fn test_missing_side_contributes_to_neither_term() {
        // User has only sidereal data; tropical weights never enter the denominator.
        let user: Chart = serde_json::from_value(json!({
            "sidereal": {"major_positions": [
                {"name": "Sun", "position_text": "10°00' Capricorn"}
            ]}
        }))
        .unwrap();
        let mut record = bare_record();
        record.chart_data = Some(sun_moon_chart_value(
            ("Capricorn", "Aries"),
            ("Capricorn", "Aries"),
        ));

        assert_eq!(score(&user, &record), 100.0);
    }

    #[test]
    fn test_empty_denominator_returns_zero() {
        let user = Chart::default();
        let mut record = bare_record();
        record.chart_data = Some(json!({}));

        assert_eq!(score(&user, &record), 0.0);
    }

    #[test]
    fn test_numerology_components() {
        let user: Chart = serde_json::from_value(json!({
            "numerology": {"life_path_number": "22/4", "day_number": "7"}
        }))
        .unwrap();
        let mut record = bare_record();
        record.chart_data = Some(json!({}));
        record.life_path_number = Some("4".to_string());
        record.day_number = Some("9".to_string());

        // Life path overlaps (10/10), day number present but no overlap (0/10).
        assert_eq!(score(&user, &record), 50.0);
    }

    #[test]
    fn test_chinese_zodiac_component_case_insensitive() {
        let user: Chart = serde_json::from_value(json!({
            "chinese_zodiac": "Earth Tiger"
        }))
        .unwrap();
        let mut record = bare_record();
        record.chart_data = Some(json!({}));
        record.chinese_zodiac_animal = Some("TIGER".to_string());

        assert_eq!(score(&user, &record), 100.0);
    }

    #[test]
    fn test_aspect_bonus_requires_threshold_in_one_system() {
        let aspects = json!([
            {"p1_name": "Sun", "p2_name": "Moon", "type": "trine", "score": 9, "orb": 0.5},
            {"p1_name": "Mars", "p2_name": "Venus", "type": "square", "score": 8, "orb": 1.0}
        ]);
        let chart_value = json!({"sidereal": {"aspects": aspects}});
        let user: Chart = serde_json::from_value(chart_value.clone()).unwrap();
        let mut record = bare_record();
        record.chart_data = Some(chart_value);

        // Two matching sidereal aspects: 15/15 and nothing else evaluated.
        assert_eq!(score(&user, &record), 100.0);
    }

    #[test]
    fn test_one_aspect_match_per_system_earns_no_bonus() {
        // One match in each system: neither reaches the per-system threshold.
        let user: Chart = serde_json::from_value(json!({
            "sidereal": {"aspects": [
                {"p1_name": "Sun", "p2_name": "Moon", "type": "trine", "score": 9, "orb": 0.5}
            ]},
            "tropical": {"aspects": [
                {"p1_name": "Mars", "p2_name": "Venus", "type": "square", "score": 8, "orb": 1.0}
            ]}
        }))
        .unwrap();
        let mut record = bare_record();
        record.chart_data = Some(json!({
            "sidereal": {"aspects": [
                {"p1_name": "Sun", "p2_name": "Moon", "type": "trine", "score": 9, "orb": 0.5}
            ]},
            "tropical": {"aspects": [
                {"p1_name": "Mars", "p2_name": "Venus", "type": "square", "score": 8, "orb": 1.0}
            ]}
        }));

        assert_eq!(score(&user, &record), 0.0);
    }

    #[test]
    fn test_score_bounds() {
        let chart_value = sun_moon_chart_value(("Capricorn", "Aries"), ("Capricorn", "Aries"));
        let user: Chart = serde_json::from_value(chart_value.clone()).unwrap();
        let mut record = bare_record();
        record.chart_data = Some(chart_value);
        record.life_path_number = Some("22/4".to_string());
        record.chinese_zodiac_animal = Some("Tiger".to_string());

        let value = score(&user, &record);
        assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn test_determinism() {
        let chart_value = sun_moon_chart_value(("Capricorn", "Aries"), ("Aquarius", "Leo"));
        let user: Chart = serde_json::from_value(chart_value.clone()).unwrap();
        let mut record = bare_record();
        record.chart_data = Some(sun_moon_chart_value(
            ("Capricorn", "Taurus"),
            ("Aquarius", "Leo"),
        ));

        let first = score(&user, &record);
        let second = score(&user, &record);
        assert_eq!(first, second);
    }
}
