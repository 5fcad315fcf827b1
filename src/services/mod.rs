pub mod aspects;
pub mod classifiers;
pub mod matching;
pub mod numerology;
pub mod placements;
pub mod prefilter;
pub mod scoring;
pub mod stelliums;
