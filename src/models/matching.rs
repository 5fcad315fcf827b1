use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::reference::ReferenceRecord;

/// How a candidate qualified as a match. Exactly one per result, assigned
/// in priority order: strict beats aspect beats stellium beats general.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Strict,
    Aspect,
    Stellium,
    General,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Strict => "strict",
            MatchType::Aspect => "aspect",
            MatchType::Stellium => "stellium",
            MatchType::General => "general",
        }
    }
}

/// Per-candidate ranking outcome. Ephemeral; never persisted.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub record: ReferenceRecord,
    pub similarity_score: f64,
    pub match_type: MatchType,
    pub reasons: Vec<String>,
    pub matching_factors: Vec<String>,
}

/// Wire representation of one match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub name: String,
    pub occupation: Option<String>,
    /// Rounded to one decimal place.
    pub similarity_score: f64,
    pub matching_factors: Vec<String>,
    /// Formatted as "M/D/Y" without zero padding.
    pub birth_date: Option<String>,
    pub birth_location: Option<String>,
}

impl From<&MatchOutcome> for MatchSummary {
    fn from(outcome: &MatchOutcome) -> Self {
        MatchSummary {
            name: outcome.record.name.clone(),
            occupation: outcome.record.occupation.clone(),
            similarity_score: (outcome.similarity_score * 10.0).round() / 10.0,
            matching_factors: outcome.matching_factors.clone(),
            birth_date: outcome.record.birth_date.map(format_birth_date),
            birth_location: outcome.record.birth_location.clone(),
        }
    }
}

fn format_birth_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Response body for the matches endpoint.
#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<MatchSummary>,
    pub total_compared: usize,
    pub matches_found: usize,
}
