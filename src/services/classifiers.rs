//! Three independent match classifiers. Each returns whether it fired plus
//! human-readable reasons; the ranker assigns the final match type by
//! priority (strict, then aspect, then stellium).

use crate::models::{Chart, ReferenceRecord, ZodiacSystem};
use crate::services::aspects::{matched_aspects, TopAspects};
use crate::services::numerology;
use crate::services::placements::sign_from_chart;
use crate::services::stelliums::{stellium_key, Stelliums};

/// Combined per-system aspect matches required for an aspect-overlap match.
pub const ASPECT_MATCH_THRESHOLD: usize = 2;

/// Strict classifier: same Sun+Moon pair in either system, full numerology
/// overlap, or same Chinese animal with partial numerology overlap. Every
/// satisfied condition contributes its own reason.
pub fn strict_match(user: &Chart, record: &ReferenceRecord) -> (bool, Vec<String>) {
    let mut reasons = Vec::new();

    for system in ZodiacSystem::ALL {
        let user_sun = sign_from_chart(user, system, "Sun");
        let user_moon = sign_from_chart(user, system, "Moon");
        let candidate_sun = record.indexed_sign("Sun", system);
        let candidate_moon = record.indexed_sign("Moon", system);

        if let (Some(us), Some(um), Some(cs), Some(cm)) =
            (user_sun, user_moon, candidate_sun, candidate_moon)
        {
            if us == cs && um == cm {
                reasons.push(format!("Same {} Sun ({}) and Moon ({})", system, us, um));
            }
        }
    }

    let user_day = user
        .numerology
        .as_ref()
        .and_then(|n| n.day_number.as_deref());
    let user_life_path = user
        .numerology
        .as_ref()
        .and_then(|n| n.life_path_number.as_deref());

    let day_overlap = numerology::overlaps(user_day, record.day_number.as_deref());
    let life_path_overlap = numerology::overlaps(user_life_path, record.life_path_number.as_deref());

    if day_overlap && life_path_overlap {
        reasons.push(format!(
            "Shared day number {} and life path number {}",
            user_day.unwrap_or_default(),
            user_life_path.unwrap_or_default()
        ));
    }

    let user_animal = user.chinese_zodiac.as_ref().and_then(|z| z.animal());
    if let (Some(user_animal), Some(candidate_animal)) =
        (user_animal, record.chinese_zodiac_animal.as_deref())
    {
        if user_animal.eq_ignore_ascii_case(candidate_animal) && (day_overlap || life_path_overlap)
        {
            reasons.push(format!(
                "Same Chinese zodiac animal ({}) with shared numerology",
                user_animal
            ));
        }
    }

    (!reasons.is_empty(), reasons)
}

/// Aspect-overlap classifier: fires when the combined per-system count of
/// matching top-3 aspects reaches the threshold. Reasons group the matched
/// aspects by system.
pub fn aspect_overlap_match(
    user_top: &TopAspects,
    candidate_top: &TopAspects,
) -> (bool, Vec<String>) {
    let mut reasons = Vec::new();
    let mut total = 0;

    for system in ZodiacSystem::ALL {
        let matched = matched_aspects(user_top.system(system), candidate_top.system(system));
        total += matched.len();
        if !matched.is_empty() {
            let listed: Vec<String> = matched.iter().map(|key| key.display()).collect();
            reasons.push(format!("{}: {}", system, listed.join(", ")));
        }
    }

    if total >= ASPECT_MATCH_THRESHOLD {
        (true, reasons)
    } else {
        (false, Vec::new())
    }
}

/// Stellium-overlap classifier: fires when any parsed stellium key matches
/// within the same system. Reasons are the raw matched descriptions,
/// prefixed with their system name.
pub fn stellium_overlap_match(
    user_stelliums: &Stelliums,
    candidate_stelliums: &Stelliums,
) -> (bool, Vec<String>) {
    let mut reasons = Vec::new();

    for system in ZodiacSystem::ALL {
        for description in user_stelliums.system(system) {
            let Some(user_key) = stellium_key(description) else {
                continue;
            };
            let matched = candidate_stelliums
                .system(system)
                .iter()
                .any(|candidate| stellium_key(candidate).as_ref() == Some(&user_key));
            if matched {
                reasons.push(format!("{}: {}", system, description));
            }
        }
    }

    (!reasons.is_empty(), reasons)
}
