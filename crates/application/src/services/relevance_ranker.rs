//! Relevance ranking of merged search results
//!
//! Routes sort by how well their name matches the query, then by region
//! label (unresolvable labels last), then by name and id so that the order
//! does not depend on which provider answered first.

use domain::{RouteId, RouteSummary};

/// Score for a route whose name holds no digits at all
const NO_DIGITS: i64 = i32::MAX as i64;
const OFFSET_WEIGHT: i64 = 10_000;
const LENGTH_WEIGHT: i64 = 100;

/// How well a route name matches the query; lower sorts first
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchScore {
    /// Numeric query: 0 exact, 1 first digit run equal, otherwise weighted
    /// by the run's offset and length difference
    Rank(i64),
    /// Non-numeric query: empty for an exact match, otherwise the name
    Name(String),
}

/// A query made only of ASCII digits
fn is_numeric(query: &str) -> bool {
    !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit())
}

/// Character offset and text of the first run of digits in `name`
fn first_digit_run(name: &str) -> Option<(usize, &str)> {
    let (offset, (start, _)) = name
        .char_indices()
        .enumerate()
        .find(|(_, (_, c))| c.is_ascii_digit())?;

    let rest = &name[start..];
    let len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some((offset, &rest[..len]))
}

/// Score a route name against the query
#[must_use]
pub fn match_score(name: &str, query: &str) -> MatchScore {
    if !is_numeric(query) {
        return MatchScore::Name(if name == query {
            String::new()
        } else {
            name.to_string()
        });
    }

    if name == query {
        return MatchScore::Rank(0);
    }

    match first_digit_run(name) {
        None => MatchScore::Rank(NO_DIGITS),
        Some((_, run)) if run == query => MatchScore::Rank(1),
        Some((offset, run)) => {
            let length_gap = run.len().abs_diff(query.len());
            MatchScore::Rank(
                weighted(offset, OFFSET_WEIGHT).saturating_add(weighted(length_gap, LENGTH_WEIGHT)),
            )
        },
    }
}

fn weighted(value: usize, weight: i64) -> i64 {
    i64::try_from(value).map_or(i64::MAX, |v| v.saturating_mul(weight))
}

/// Full sort key of one route
type RankKey = (MatchScore, bool, Option<String>, String, RouteId);

/// Sort `routes` in place by relevance to `query`
///
/// `region_label` is called once per route.
pub fn rank_routes<F>(routes: &mut [RouteSummary], query: &str, region_label: F)
where
    F: Fn(&RouteSummary) -> Option<String>,
{
    routes.sort_by_cached_key(|route| -> RankKey {
        let region = region_label(route);
        (
            match_score(&route.name, query),
            region.is_none(),
            region,
            route.name.clone(),
            route.id.clone(),
        )
    });
}
