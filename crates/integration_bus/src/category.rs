//! Textual bus types mapped into the shared category space

use domain::RouteCategory;

/// Busan bus type, keyed by its two-character prefix
#[must_use]
pub fn busan_category(bus_type: &str) -> RouteCategory {
    let prefix: String = bus_type.trim().chars().take(2).collect();
    match prefix.as_str() {
        "일반" => RouteCategory::BusanGeneral,
        "급행" => RouteCategory::BusanRapid,
        "좌석" => RouteCategory::BusanSeat,
        "심야" => RouteCategory::BusanNight,
        "마을" => RouteCategory::BusanVillage,
        _ => RouteCategory::Unclassified,
    }
}

/// Keywords tried in order against a TAGO route type; the first hit wins
const TAGO_KEYWORDS: [(&str, RouteCategory); 13] = [
    ("간선", RouteCategory::Trunk),
    ("지선", RouteCategory::Branch),
    ("마을", RouteCategory::Village),
    ("광역", RouteCategory::Metropolitan),
    ("직행", RouteCategory::Direct),
    ("좌석", RouteCategory::Seat),
    ("일반", RouteCategory::General),
    ("공항", RouteCategory::Airport),
    ("순환", RouteCategory::Circular),
    ("급행", RouteCategory::BusanRapid),
    ("심야", RouteCategory::BusanNight),
    ("시외", RouteCategory::IntercityGeneral),
    ("농어촌", RouteCategory::Rural),
];

/// TAGO route type text (e.g. `간선버스`, `농어촌버스`)
#[must_use]
pub fn tago_category(route_type: &str) -> RouteCategory {
    let route_type = route_type.replace("버스", "");
    TAGO_KEYWORDS
        .iter()
        .find(|(keyword, _)| route_type.contains(keyword))
        .map_or(RouteCategory::Unclassified, |(_, category)| *category)
}
