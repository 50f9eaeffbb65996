//! Route entities

use serde::{Deserialize, Serialize};

use crate::value_objects::{Provider, RouteCategory, RouteId};

/// A route as returned by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Route number/name as shown to riders (e.g., "N6", "1001")
    pub name: String,

    /// Identifier used for later detail requests
    pub id: RouteId,

    /// Short description, usually "<start>~<end>"
    pub description: String,

    /// Service class
    pub category: RouteCategory,

    /// Provider that produced this record
    pub provider: Provider,
}

impl RouteSummary {
    /// Create a new route summary
    pub fn new(
        name: impl Into<String>,
        id: impl Into<RouteId>,
        description: impl Into<String>,
        category: RouteCategory,
        provider: Provider,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            description: description.into(),
            category,
            provider,
        }
    }

    /// Returns true if this route came from the national provider
    #[must_use]
    pub const fn is_national(&self) -> bool {
        matches!(self.provider, Provider::National)
    }
}

/// Route metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDetail {
    /// Service class
    pub category: RouteCategory,
    /// Route number/name
    pub name: String,
    /// Name of the first stop
    pub start_point_name: String,
    /// Name of the last stop
    pub end_point_name: String,
}

impl RouteDetail {
    /// Create a new route detail
    pub fn new(
        category: RouteCategory,
        name: impl Into<String>,
        start_point_name: impl Into<String>,
        end_point_name: impl Into<String>,
    ) -> Self {
        Self {
            category,
            name: name.into(),
            start_point_name: start_point_name.into(),
            end_point_name: end_point_name.into(),
        }
    }

    /// Description in the same "<start>~<end>" form search results use
    #[must_use]
    pub fn terminals(&self) -> String {
        format!("{}~{}", self.start_point_name, self.end_point_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_national_flag() {
        let route = RouteSummary::new(
            "6",
            "TAGO|25|DJB30300004",
            "A~B",
            RouteCategory::Trunk,
            Provider::National,
        );
        assert!(route.is_national());

        let route = RouteSummary::new(
            "N16",
            "100900010",
            "A~B",
            RouteCategory::Unclassified,
            Provider::Seoul,
        );
        assert!(!route.is_national());
    }

    #[test]
    fn detail_terminals() {
        let detail = RouteDetail::new(RouteCategory::BusanGeneral, "1001", "장산역", "서면");
        assert_eq!(detail.terminals(), "장산역~서면");
    }

    #[test]
    fn summary_serialization_roundtrip() {
        let route = RouteSummary::new(
            "9401",
            "234000026",
            "성남시",
            RouteCategory::Metropolitan,
            Provider::Gyeonggi,
        );
        let json = serde_json::to_string(&route).unwrap();
        let parsed: RouteSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, route);
    }
}
