//! Municipality directory
//!
//! Resolves the worklist of municipalities the national provider is searched
//! in, and maps city codes to display names. Name lookups go to a
//! process-wide cache first, then to the built-in table; they never perform
//! I/O.

use std::fmt;

use domain::{Municipality, RouteIdCodec, RouteSummary};
use moka::sync::Cache;
use tracing::debug;

use crate::error::ApplicationError;
use crate::ports::NationalRoutePort;
use crate::services::municipality_names::builtin_name;

/// Municipality names served by a fixed-region provider
pub const EXCLUDED_NAMES: [&str; 3] = ["서울특별시", "경기도", "부산광역시"];

/// City code of Busan in the national listing
pub const EXCLUDED_CODE: &str = "21";

/// Code prefix of the Gyeonggi cities and counties
pub const EXCLUDED_CODE_PREFIX: &str = "31";

const DEFAULT_NAME_CAPACITY: u64 = 1024;

/// Worklist builder and code-to-name resolver
///
/// Clones share the same name cache. Entries are only ever added, never
/// replaced. The cache holds at most 1024 names, several times the size of
/// the national listing, so eviction does not occur in practice.
#[derive(Clone)]
pub struct MunicipalityDirectory {
    names: Cache<String, String>,
    codec: RouteIdCodec,
}

impl fmt::Debug for MunicipalityDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MunicipalityDirectory")
            .field("cached_names", &self.names.entry_count())
            .field("codec", &self.codec)
            .finish()
    }
}

impl Default for MunicipalityDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl MunicipalityDirectory {
    /// Create a directory with an empty name cache
    #[must_use]
    pub fn new() -> Self {
        Self::with_codec(RouteIdCodec::national())
    }

    /// Create a directory that reads municipality codes with `codec`
    #[must_use]
    pub fn with_codec(codec: RouteIdCodec) -> Self {
        Self {
            names: Cache::new(DEFAULT_NAME_CAPACITY),
            codec,
        }
    }

    /// Returns true if the municipality is covered by a fixed-region provider
    #[must_use]
    pub fn is_excluded(municipality: &Municipality) -> bool {
        EXCLUDED_NAMES.contains(&municipality.name.as_str())
            || municipality.code == EXCLUDED_CODE
            || municipality.has_code_prefix(EXCLUDED_CODE_PREFIX)
    }

    /// Fetch the live listing and return the municipalities to search
    ///
    /// The listing is fetched on every call; it also seeds names for codes
    /// the built-in table does not know.
    pub async fn worklist(
        &self,
        port: &dyn NationalRoutePort,
        key: &str,
    ) -> Result<Vec<Municipality>, ApplicationError> {
        let listing = port.list_municipalities(key).await?;
        self.seed(&listing);

        let total = listing.len();
        let worklist: Vec<Municipality> = listing
            .into_iter()
            .filter(|m| !Self::is_excluded(m))
            .collect();

        debug!(total, searched = worklist.len(), "Municipality worklist built");
        Ok(worklist)
    }

    /// Record live names for codes without a built-in name
    pub fn seed(&self, listing: &[Municipality]) {
        for municipality in listing {
            if builtin_name(&municipality.code).is_none() {
                self.names
                    .entry_by_ref(municipality.code.as_str())
                    .or_insert_with(|| municipality.name.clone());
            }
        }
    }

    /// Display name for a city code
    #[must_use]
    pub fn city_name(&self, code: &str) -> Option<String> {
        if let Some(name) = self.names.get(code) {
            return Some(name);
        }

        let name = builtin_name(code)?;
        Some(
            self.names
                .entry_by_ref(code)
                .or_insert_with(|| name.to_string())
                .into_value(),
        )
    }

    /// Region label of a route: fixed label for fixed-region providers,
    /// the municipality name for national routes
    #[must_use]
    pub fn region_label(&self, route: &RouteSummary) -> Option<String> {
        if let Some(label) = route.provider.region_label() {
            return Some(label.to_string());
        }
        self.codec
            .municipality_code(&route.id)
            .and_then(|code| self.city_name(code))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use domain::{Provider, RouteCategory, RouteDetail, RoutePath, Stop};

    use super::*;

    struct ListingPort(Vec<Municipality>);

    #[async_trait]
    impl NationalRoutePort for ListingPort {
        async fn list_municipalities(&self, _key: &str) -> Result<Vec<Municipality>, ApplicationError> {
            Ok(self.0.clone())
        }

        async fn search_routes(
            &self,
            _key: &str,
            _code: &str,
            _query: &str,
        ) -> Result<Vec<RouteSummary>, ApplicationError> {
            Ok(Vec::new())
        }

        async fn get_stops(&self, _: &str, _: &str, _: &str) -> Result<Vec<Stop>, ApplicationError> {
            Ok(Vec::new())
        }

        async fn get_route_detail(
            &self,
            _: &str,
            _: &str,
            _: &str,
        ) -> Result<Option<RouteDetail>, ApplicationError> {
            Ok(None)
        }

        async fn get_route_shape(&self, _: &str, _: &str, _: &str) -> Result<RoutePath, ApplicationError> {
            Ok(RoutePath::new())
        }
    }

    fn listing() -> Vec<Municipality> {
        vec![
            Municipality::new("서울특별시", "11"),
            Municipality::new("세종특별시", "12"),
            Municipality::new("부산광역시", "21"),
            Municipality::new("대전광역시", "25"),
            Municipality::new("경기도", "31"),
            Municipality::new("수원시", "31010"),
            Municipality::new("청주시", "33010"),
            Municipality::new("새도시", "99010"),
        ]
    }

    #[test]
    fn test_exclusions() {
        assert!(MunicipalityDirectory::is_excluded(&Municipality::new("서울특별시", "11")));
        assert!(MunicipalityDirectory::is_excluded(&Municipality::new("부산", "21")));
        assert!(MunicipalityDirectory::is_excluded(&Municipality::new("가평군", "31370")));
        assert!(!MunicipalityDirectory::is_excluded(&Municipality::new("청주시", "33010")));
    }

    #[tokio::test]
    async fn test_worklist_filters_fixed_regions() {
        let directory = MunicipalityDirectory::new();
        let worklist = directory
            .worklist(&ListingPort(listing()), "key")
            .await
            .unwrap();

        let codes: Vec<&str> = worklist.iter().map(|m| m.code.as_str()).collect();
        assert_eq!(codes, vec!["12", "25", "33010", "99010"]);
    }

    #[tokio::test]
    async fn test_live_listing_seeds_unknown_codes_only() {
        let directory = MunicipalityDirectory::new();
        directory
            .worklist(&ListingPort(listing()), "key")
            .await
            .unwrap();

        assert_eq!(directory.city_name("99010").as_deref(), Some("새도시"));
        assert_eq!(directory.city_name("25").as_deref(), Some("대전"));
        assert_eq!(directory.city_name("33010").as_deref(), Some("청주"));
    }

    #[test]
    fn test_city_name_without_listing() {
        let directory = MunicipalityDirectory::new();
        assert_eq!(directory.city_name("37010").as_deref(), Some("포항"));
        assert_eq!(directory.city_name("37010").as_deref(), Some("포항"));
        assert_eq!(directory.city_name("00000"), None);
    }

    #[test]
    fn test_clones_share_cache() {
        let directory = MunicipalityDirectory::new();
        let clone = directory.clone();
        directory.seed(&[Municipality::new("새도시", "99010")]);
        assert_eq!(clone.city_name("99010").as_deref(), Some("새도시"));
    }

    #[test]
    fn test_region_labels() {
        let directory = MunicipalityDirectory::new();

        let seoul = RouteSummary::new("6", "100100006", "", RouteCategory::Trunk, Provider::Seoul);
        assert_eq!(directory.region_label(&seoul).as_deref(), Some("서울"));

        let national = RouteSummary::new(
            "6",
            "TAGO|25|DJB30300004",
            "",
            RouteCategory::Trunk,
            Provider::National,
        );
        assert_eq!(directory.region_label(&national).as_deref(), Some("대전"));

        let unknown = RouteSummary::new(
            "6",
            "TAGO|98765|X",
            "",
            RouteCategory::Trunk,
            Provider::National,
        );
        assert_eq!(directory.region_label(&unknown), None);
    }

    #[test]
    fn test_cache_holds_a_full_listing() {
        let directory = MunicipalityDirectory::new();
        assert_eq!(
            directory.names.policy().max_capacity(),
            Some(DEFAULT_NAME_CAPACITY)
        );

        let listing: Vec<Municipality> = (0..300)
            .map(|n| Municipality::new(format!("시{n}"), format!("X{n}")))
            .collect();
        directory.seed(&listing);

        for n in 0..300 {
            assert_eq!(
                directory.city_name(&format!("X{n}")),
                Some(format!("시{n}"))
            );
        }
    }
}
