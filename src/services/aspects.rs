use serde::{Deserialize, Serialize};

use crate::models::{Chart, ReferenceRecord, SystemChart, ZodiacSystem};
use crate::services::placements::base_body_name;

/// Number of top aspects compared per system.
pub const DEFAULT_TOP_N: usize = 3;

/// System-independent aspect identity: participant pair plus aspect type.
/// Participant names are base body names with qualifiers stripped, so the
/// same aspect compares equal across systems and annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectKey {
    pub p1: String,
    pub p2: String,
    #[serde(rename = "type")]
    pub aspect_type: String,
}

impl AspectKey {
    /// Order-independent equality on the participant pair.
    pub fn matches(&self, other: &AspectKey) -> bool {
        if self.aspect_type != other.aspect_type {
            return false;
        }
        (self.p1 == other.p1 && self.p2 == other.p2)
            || (self.p1 == other.p2 && self.p2 == other.p1)
    }

    pub fn display(&self) -> String {
        format!("{} {} {}", self.p1, self.aspect_type, self.p2)
    }
}

/// Top-N aspects per zodiac system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopAspects {
    #[serde(default)]
    pub sidereal: Vec<AspectKey>,
    #[serde(default)]
    pub tropical: Vec<AspectKey>,
}

impl TopAspects {
    pub fn system(&self, system: ZodiacSystem) -> &[AspectKey] {
        match system {
            ZodiacSystem::Sidereal => &self.sidereal,
            ZodiacSystem::Tropical => &self.tropical,
        }
    }
}

/// Selects the strongest `n` aspects per system.
///
/// Sort order: highest strength first, ties broken by smallest absolute
/// orb. Missing or non-numeric score/orb fields degrade to 0 and 999 so
/// malformed aspects sort last instead of raising.
pub fn top_aspects(chart: &Chart, n: usize) -> TopAspects {
    TopAspects {
        sidereal: top_for_system(chart.system(ZodiacSystem::Sidereal), n),
        tropical: top_for_system(chart.system(ZodiacSystem::Tropical), n),
    }
}

fn top_for_system(system_chart: Option<&SystemChart>, n: usize) -> Vec<AspectKey> {
    let Some(system_chart) = system_chart else {
        return Vec::new();
    };

    let mut ranked: Vec<_> = system_chart.aspects.iter().collect();
    // Stable sort: equal (score, |orb|) pairs keep input order.
    ranked.sort_by(|a, b| {
        b.score_or_default()
            .total_cmp(&a.score_or_default())
            .then(a.orb_or_default().abs().total_cmp(&b.orb_or_default().abs()))
    });

    ranked
        .into_iter()
        .take(n)
        .map(|aspect| AspectKey {
            p1: base_body_name(&aspect.p1_name).to_string(),
            p2: base_body_name(&aspect.p2_name).to_string(),
            aspect_type: aspect.aspect_type.clone(),
        })
        .collect()
}

/// A candidate's top aspects: prefers the precomputed `top_aspects` blob,
/// recomputing from chart data when the blob is absent, malformed or empty.
pub fn candidate_top_aspects(record: &ReferenceRecord, chart: Option<&Chart>) -> TopAspects {
    if let Some(value) = record.top_aspects.as_ref() {
        match serde_json::from_value::<TopAspects>(value.clone()) {
            Ok(cached) if !(cached.sidereal.is_empty() && cached.tropical.is_empty()) => {
                return cached;
            }
            Ok(_) => {}
            Err(error) => {
                tracing::debug!(record_id = %record.id, %error, "Unparseable top_aspects, recomputing");
            }
        }
    }
    chart
        .map(|c| top_aspects(c, DEFAULT_TOP_N))
        .unwrap_or_default()
}

/// Counts order-independent matches between two top-aspect lists.
pub fn count_matches(user: &[AspectKey], candidate: &[AspectKey]) -> usize {
    matched_aspects(user, candidate).len()
}

/// The user-side aspects that have a match on the candidate side.
pub fn matched_aspects<'a>(user: &'a [AspectKey], candidate: &[AspectKey]) -> Vec<&'a AspectKey> {
    user.iter()
        .filter(|key| candidate.iter().any(|other| key.matches(other)))
        .collect()
}
