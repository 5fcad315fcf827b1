pub mod chart;
pub mod matching;
pub mod reference;

pub use chart::{
    Aspect, AspectPattern, Chart, ChineseZodiac, MajorPosition, Numerology, SystemChart,
    ZodiacSystem,
};
pub use matching::{MatchOutcome, MatchSummary, MatchType, MatchesResponse};
pub use reference::{CachedPlacement, PlacementCache, ReferenceRecord};
