//! Route category value object
//!
//! One integer enumeration covering every provider's service classes. Seoul
//! (0-10) and Gyeonggi (11-53) report these codes natively; Busan and the
//! national provider map their textual bus types into the same space.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Service class of a bus route
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(into = "u8", from = "u8")]
#[repr(u8)]
pub enum RouteCategory {
    /// General / unclassified (fallback for unknown values)
    #[default]
    Unclassified = 0,
    /// Airport
    Airport = 1,
    /// Village
    Village = 2,
    /// Trunk
    Trunk = 3,
    /// Branch
    Branch = 4,
    /// Circular
    Circular = 5,
    /// Metropolitan
    Metropolitan = 6,
    /// Incheon-operated route listed by Seoul
    Incheon = 7,
    /// Gyeonggi-operated route listed by Seoul
    GyeonggiLinked = 8,
    /// Abolished
    Abolished = 9,
    /// Tour
    Tour = 10,
    /// Direct seat
    Direct = 11,
    /// Seat
    Seat = 12,
    /// General
    General = 13,
    /// Metropolitan express
    MetropolitanExpress = 14,
    /// Ddabok
    Ddabok = 15,
    /// Gyeonggi circular
    GyeonggiCircular = 16,
    /// Rural direct
    RuralDirect = 21,
    /// Rural seat
    RuralSeat = 22,
    /// Rural general
    Rural = 23,
    /// Gyeonggi village
    GyeonggiVillage = 30,
    /// Intercity express
    IntercityExpress = 41,
    /// Intercity seat
    IntercitySeat = 42,
    /// Intercity general
    IntercityGeneral = 43,
    /// Airport limousine
    AirportLimousine = 51,
    /// Airport seat
    AirportSeat = 52,
    /// Airport general
    AirportGeneral = 53,
    /// Busan general
    BusanGeneral = 61,
    /// Busan rapid
    BusanRapid = 62,
    /// Busan seat
    BusanSeat = 63,
    /// Busan night
    BusanNight = 64,
    /// Busan village
    BusanVillage = 65,
}

impl RouteCategory {
    /// Map a provider-reported numeric code, falling back to [`Self::Unclassified`]
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            1 => Self::Airport,
            2 => Self::Village,
            3 => Self::Trunk,
            4 => Self::Branch,
            5 => Self::Circular,
            6 => Self::Metropolitan,
            7 => Self::Incheon,
            8 => Self::GyeonggiLinked,
            9 => Self::Abolished,
            10 => Self::Tour,
            11 => Self::Direct,
            12 => Self::Seat,
            13 => Self::General,
            14 => Self::MetropolitanExpress,
            15 => Self::Ddabok,
            16 => Self::GyeonggiCircular,
            21 => Self::RuralDirect,
            22 => Self::RuralSeat,
            23 => Self::Rural,
            30 => Self::GyeonggiVillage,
            41 => Self::IntercityExpress,
            42 => Self::IntercitySeat,
            43 => Self::IntercityGeneral,
            51 => Self::AirportLimousine,
            52 => Self::AirportSeat,
            53 => Self::AirportGeneral,
            61 => Self::BusanGeneral,
            62 => Self::BusanRapid,
            63 => Self::BusanSeat,
            64 => Self::BusanNight,
            65 => Self::BusanVillage,
            _ => Self::Unclassified,
        }
    }

    /// Parse a textual numeric code (as carried in XML payloads)
    #[must_use]
    pub fn from_code_str(code: &str) -> Self {
        code.trim().parse().map_or(Self::Unclassified, Self::from_code)
    }

    /// Numeric code
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Korean display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unclassified => "공용",
            Self::Airport => "공항",
            Self::Village | Self::GyeonggiVillage | Self::BusanVillage => "마을",
            Self::Trunk => "간선",
            Self::Branch => "지선",
            Self::Circular | Self::GyeonggiCircular => "순환",
            Self::Metropolitan | Self::MetropolitanExpress => "광역",
            Self::Incheon => "인천",
            Self::GyeonggiLinked => "경기",
            Self::Abolished => "폐지",
            Self::Tour => "투어",
            Self::Direct => "직행",
            Self::Seat | Self::BusanSeat => "좌석",
            Self::General | Self::BusanGeneral => "일반",
            Self::Ddabok => "따복",
            Self::RuralDirect => "농어촌직행",
            Self::RuralSeat => "농어촌좌석",
            Self::Rural => "농어촌",
            Self::IntercityExpress => "고속",
            Self::IntercitySeat => "시외좌석",
            Self::IntercityGeneral => "시외일반",
            Self::AirportLimousine => "공항리무진",
            Self::AirportSeat => "공항좌석",
            Self::AirportGeneral => "공항일반",
            Self::BusanRapid => "급행",
            Self::BusanNight => "심야",
        }
    }
}

impl From<RouteCategory> for u8 {
    fn from(category: RouteCategory) -> Self {
        category.code()
    }
}

impl From<u8> for RouteCategory {
    fn from(code: u8) -> Self {
        Self::from_code(u16::from(code))
    }
}

impl fmt::Display for RouteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_round_trip() {
        for code in [0u16, 1, 6, 10, 11, 16, 21, 23, 30, 41, 43, 51, 53, 61, 65] {
            assert_eq!(u16::from(RouteCategory::from_code(code).code()), code);
        }
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(RouteCategory::from_code(17), RouteCategory::Unclassified);
        assert_eq!(RouteCategory::from_code(99), RouteCategory::Unclassified);
        assert_eq!(RouteCategory::from_code_str("abc"), RouteCategory::Unclassified);
        assert_eq!(RouteCategory::from_code_str(""), RouteCategory::Unclassified);
    }

    #[test]
    fn parses_padded_text() {
        assert_eq!(RouteCategory::from_code_str(" 3 "), RouteCategory::Trunk);
        assert_eq!(RouteCategory::from_code_str("13"), RouteCategory::General);
    }

    #[test]
    fn labels() {
        assert_eq!(RouteCategory::Trunk.label(), "간선");
        assert_eq!(RouteCategory::BusanNight.to_string(), "심야");
        assert_eq!(RouteCategory::RuralDirect.label(), "농어촌직행");
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&RouteCategory::BusanRapid).unwrap();
        assert_eq!(json, "62");
        let parsed: RouteCategory = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, RouteCategory::Branch);
    }
}
