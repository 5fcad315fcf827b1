//! Ranker/explainer: orchestrates the scorer and the three classifiers
//! across the candidate set and assembles the ordered match list.

use crate::models::{Chart, MatchOutcome, MatchType, ReferenceRecord, ZodiacSystem};
use crate::services::aspects::{
    candidate_top_aspects, matched_aspects, top_aspects, TopAspects, DEFAULT_TOP_N,
};
use crate::services::classifiers::{aspect_overlap_match, stellium_overlap_match, strict_match};
use crate::services::numerology;
use crate::services::placements::{resolve_candidate_sign, sign_from_chart};
use crate::services::scoring::{score_against, BODY_WEIGHTS};
use crate::services::stelliums::extract_stelliums;

/// Ranks every candidate against the user's chart.
///
/// Candidates without usable chart data are excluded outright, as are
/// candidates whose comprehensive score is exactly zero, regardless of what
/// the classifiers would have said. Surviving results are sorted by score
/// descending (stable: ties keep database iteration order) and truncated to
/// `limit`.
pub fn rank(user: &Chart, candidates: &[ReferenceRecord], limit: usize) -> Vec<MatchOutcome> {
    let user_top = top_aspects(user, DEFAULT_TOP_N);
    let user_stelliums = extract_stelliums(user);

    let mut outcomes = Vec::new();

    for record in candidates {
        let Some(candidate_chart) = record.chart() else {
            tracing::debug!(record_id = %record.id, "Skipping candidate without usable chart_data");
            continue;
        };

        let similarity = score_against(user, record, &candidate_chart);
        if similarity == 0.0 {
            continue;
        }

        let candidate_top = candidate_top_aspects(record, Some(&candidate_chart));
        let candidate_stelliums = extract_stelliums(&candidate_chart);

        let (is_strict, strict_reasons) = strict_match(user, record);
        let (is_aspect, aspect_reasons) = aspect_overlap_match(&user_top, &candidate_top);
        let (is_stellium, stellium_reasons) =
            stellium_overlap_match(&user_stelliums, &candidate_stelliums);

        let match_type = if is_strict {
            MatchType::Strict
        } else if is_aspect {
            MatchType::Aspect
        } else if is_stellium {
            MatchType::Stellium
        } else {
            MatchType::General
        };

        let mut reasons = strict_reasons;
        reasons.extend(aspect_reasons);
        reasons.extend(stellium_reasons);

        let matching_factors =
            matching_factors(user, record, &candidate_chart, &user_top, &candidate_top);

        outcomes.push(MatchOutcome {
            record: record.clone(),
            similarity_score: similarity,
            match_type,
            reasons,
            matching_factors,
        });
    }

    // sort_by is stable, so equal scores retain iteration order.
    outcomes.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    outcomes.truncate(limit);
    outcomes
}

/// Builds the finer-grained display factors: one entry per individual
/// matching fact. Independent of, and generally longer than, the
/// classifiers' reasons.
fn matching_factors(
    user: &Chart,
    record: &ReferenceRecord,
    candidate_chart: &Chart,
    user_top: &TopAspects,
    candidate_top: &TopAspects,
) -> Vec<String> {
    let mut factors = Vec::new();
    let cache = record.placement_cache();

    for system in ZodiacSystem::ALL {
        for (body, _) in BODY_WEIGHTS {
            let user_sign = sign_from_chart(user, system, body);
            let candidate_sign =
                resolve_candidate_sign(cache.as_ref(), record, Some(candidate_chart), system, body);
            if let (Some(user_sign), Some(candidate_sign)) = (user_sign, candidate_sign) {
                if user_sign == candidate_sign {
                    factors.push(format!("{} in {} ({})", body, user_sign, system));
                }
            }
        }
    }

    let user_life_path = user
        .numerology
        .as_ref()
        .and_then(|n| n.life_path_number.as_deref());
    let user_day = user
        .numerology
        .as_ref()
        .and_then(|n| n.day_number.as_deref());
    if numerology::overlaps(user_life_path, record.life_path_number.as_deref()) {
        factors.push(format!(
            "Life path number {}",
            user_life_path.unwrap_or_default()
        ));
    }
    if numerology::overlaps(user_day, record.day_number.as_deref()) {
        factors.push(format!("Day number {}", user_day.unwrap_or_default()));
    }

    let user_animal = user.chinese_zodiac.as_ref().and_then(|z| z.animal());
    if let (Some(user_animal), Some(candidate_animal)) =
        (user_animal, record.chinese_zodiac_animal.as_deref())
    {
        if user_animal.eq_ignore_ascii_case(candidate_animal) {
            factors.push(format!("Chinese zodiac animal: {}", user_animal));
        }
    }

    for system in ZodiacSystem::ALL {
        for key in matched_aspects(user_top.system(system), candidate_top.system(system)) {
            factors.push(format!("{} ({})", key.display(), system));
        }
    }

    factors
}
