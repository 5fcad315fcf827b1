use crate::models::{Chart, PlacementCache, ReferenceRecord, ZodiacSystem};

/// Canonical sign-extraction rule: the sign is the last whitespace-delimited
/// token of the position text. No vocabulary validation is performed; only
/// consistency between two charts matters.
pub fn extract_sign(position_text: &str) -> Option<&str> {
    position_text.split_whitespace().last()
}

/// Base body name with any trailing qualifier stripped
/// ("Sun in Capricorn" -> "Sun").
pub fn base_body_name(name: &str) -> &str {
    match name.find(" in ") {
        Some(index) => &name[..index],
        None => name,
    }
}

/// Looks up a body's sign in a chart's position list.
pub fn sign_from_chart(chart: &Chart, system: ZodiacSystem, body: &str) -> Option<String> {
    let system_chart = chart.system(system)?;
    system_chart
        .major_positions
        .iter()
        .find(|position| base_body_name(&position.name) == body)
        .and_then(|position| extract_sign(&position.position_text))
        .map(str::to_owned)
}

/// Ordered strategies for resolving a candidate's sign for one body.
///
/// Tried in sequence; the first non-null result wins. This replaces the
/// scattered duck-typed fallbacks with one explicit chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignResolver {
    /// The precomputed `planetary_placements` blob.
    PlacementCache,
    /// The indexed scalar column (Sun and Moon only).
    IndexedColumn,
    /// Linear scan of the raw `chart_data` position list.
    ChartScan,
}

pub const RESOLVER_CHAIN: [SignResolver; 3] = [
    SignResolver::PlacementCache,
    SignResolver::IndexedColumn,
    SignResolver::ChartScan,
];

impl SignResolver {
    fn resolve(
        self,
        cache: Option<&PlacementCache>,
        record: &ReferenceRecord,
        chart: Option<&Chart>,
        system: ZodiacSystem,
        body: &str,
    ) -> Option<String> {
        match self {
            SignResolver::PlacementCache => cache?
                .system(system)
                .get(body)?
                .sign
                .as_deref()
                .map(str::trim)
                .filter(|sign| !sign.is_empty())
                .map(str::to_owned),
            SignResolver::IndexedColumn => {
                record.indexed_sign(body, system).map(str::to_owned)
            }
            SignResolver::ChartScan => sign_from_chart(chart?, system, body),
        }
    }
}

/// Resolves a candidate's sign for one (body, system) pair through the
/// resolver chain.
pub fn resolve_candidate_sign(
    cache: Option<&PlacementCache>,
    record: &ReferenceRecord,
    chart: Option<&Chart>,
    system: ZodiacSystem,
    body: &str,
) -> Option<String> {
    RESOLVER_CHAIN
        .iter()
        .find_map(|resolver| resolver.resolve(cache, record, chart, system, body))
}
