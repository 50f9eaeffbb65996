//! Data provider value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// The transit authority service a route record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Seoul Metropolitan Government bus information service
    Seoul,
    /// Gyeonggi Province bus route service
    Gyeonggi,
    /// Busan BIMS (open API plus the legacy Ajax service)
    Busan,
    /// Nationwide TAGO service, scoped per municipality
    National,
}

impl Provider {
    /// The three fixed-region providers, in the order searches run against them
    pub const FIXED_REGIONS: [Self; 3] = [Self::Seoul, Self::Gyeonggi, Self::Busan];

    /// Short machine-readable tag
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Seoul => "seoul",
            Self::Gyeonggi => "gyeonggi",
            Self::Busan => "busan",
            Self::National => "tago",
        }
    }

    /// Region display label for fixed-region providers
    ///
    /// The national provider has no fixed label; its region comes from the
    /// municipality embedded in each route id.
    #[must_use]
    pub const fn region_label(&self) -> Option<&'static str> {
        match self {
            Self::Seoul => Some("서울"),
            Self::Gyeonggi => Some("경기"),
            Self::Busan => Some("부산"),
            Self::National => None,
        }
    }

    /// Returns true for the three fixed-region providers
    #[must_use]
    pub const fn is_fixed_region(&self) -> bool {
        !matches!(self, Self::National)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_regions_have_labels() {
        for provider in Provider::FIXED_REGIONS {
            assert!(provider.is_fixed_region());
            assert!(provider.region_label().is_some());
        }
    }

    #[test]
    fn national_has_no_fixed_label() {
        assert!(!Provider::National.is_fixed_region());
        assert_eq!(Provider::National.region_label(), None);
    }

    #[test]
    fn display_uses_tag() {
        assert_eq!(Provider::Gyeonggi.to_string(), "gyeonggi");
        assert_eq!(Provider::National.to_string(), "tago");
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Provider::Busan).unwrap();
        assert_eq!(json, "\"busan\"");
    }
}
