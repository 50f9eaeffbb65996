//! Bus route provider configuration

use serde::{Deserialize, Serialize};

/// Configuration for the bus route providers
///
/// Base URLs point at the live services by default; tests point them all at
/// one mock server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusApiConfig {
    /// Seoul bus route information service
    #[serde(default = "default_seoul_base_url")]
    pub seoul_base_url: String,

    /// Gyeonggi bus route service (v2)
    #[serde(default = "default_gyeonggi_base_url")]
    pub gyeonggi_base_url: String,

    /// Busan BIMS open API
    #[serde(default = "default_busan_base_url")]
    pub busan_base_url: String,

    /// Busan legacy BIMS Ajax endpoints
    #[serde(default = "default_busan_bims_base_url")]
    pub busan_bims_base_url: String,

    /// Nationwide TAGO route information service
    #[serde(default = "default_tago_base_url")]
    pub tago_base_url: String,

    /// Default per-request timeout in seconds (detail calls)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout for every Seoul call
    #[serde(default = "default_seoul_timeout_secs")]
    pub seoul_timeout_secs: u64,

    /// Timeout for the Gyeonggi keyword search
    #[serde(default = "default_gyeonggi_search_timeout_secs")]
    pub gyeonggi_search_timeout_secs: u64,

    /// Timeout for the Busan BIMS coordinate listing
    #[serde(default = "default_busan_shape_timeout_secs")]
    pub busan_shape_timeout_secs: u64,

    /// Timeout for TAGO route search and municipality listing
    #[serde(default = "default_tago_search_timeout_secs")]
    pub tago_search_timeout_secs: u64,

    /// Page size for TAGO route search
    #[serde(default = "default_search_page_size")]
    pub search_page_size: u32,

    /// Page size for TAGO station and shape listings
    #[serde(default = "default_station_page_size")]
    pub station_page_size: u32,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_seoul_base_url() -> String {
    "http://ws.bus.go.kr/api/rest/busRouteInfo".to_string()
}

fn default_gyeonggi_base_url() -> String {
    "https://apis.data.go.kr/6410000/busrouteservice/v2".to_string()
}

fn default_busan_base_url() -> String {
    "http://apis.data.go.kr/6260000/BusanBIMS".to_string()
}

fn default_busan_bims_base_url() -> String {
    "http://bus.busan.go.kr/busanBIMS/Ajax".to_string()
}

fn default_tago_base_url() -> String {
    "http://apis.data.go.kr/1613000/BusRouteInfoInqireService".to_string()
}

const fn default_timeout_secs() -> u64 {
    20
}

const fn default_seoul_timeout_secs() -> u64 {
    10
}

const fn default_gyeonggi_search_timeout_secs() -> u64 {
    5
}

const fn default_busan_shape_timeout_secs() -> u64 {
    5
}

const fn default_tago_search_timeout_secs() -> u64 {
    10
}

const fn default_search_page_size() -> u32 {
    1000
}

const fn default_station_page_size() -> u32 {
    100
}

fn default_user_agent() -> String {
    concat!("busroute/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for BusApiConfig {
    fn default() -> Self {
        Self {
            seoul_base_url: default_seoul_base_url(),
            gyeonggi_base_url: default_gyeonggi_base_url(),
            busan_base_url: default_busan_base_url(),
            busan_bims_base_url: default_busan_bims_base_url(),
            tago_base_url: default_tago_base_url(),
            timeout_secs: default_timeout_secs(),
            seoul_timeout_secs: default_seoul_timeout_secs(),
            gyeonggi_search_timeout_secs: default_gyeonggi_search_timeout_secs(),
            busan_shape_timeout_secs: default_busan_shape_timeout_secs(),
            tago_search_timeout_secs: default_tago_search_timeout_secs(),
            search_page_size: default_search_page_size(),
            station_page_size: default_station_page_size(),
            user_agent: default_user_agent(),
        }
    }
}

impl BusApiConfig {
    /// Create a configuration suitable for testing, with every provider
    /// served from `base_url`
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            seoul_base_url: format!("{base_url}/seoul"),
            gyeonggi_base_url: format!("{base_url}/gyeonggi"),
            busan_base_url: format!("{base_url}/busan"),
            busan_bims_base_url: format!("{base_url}/bims"),
            tago_base_url: format!("{base_url}/tago"),
            timeout_secs: 5,
            seoul_timeout_secs: 5,
            gyeonggi_search_timeout_secs: 5,
            busan_shape_timeout_secs: 5,
            tago_search_timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        let urls = [
            ("seoul_base_url", &self.seoul_base_url),
            ("gyeonggi_base_url", &self.gyeonggi_base_url),
            ("busan_base_url", &self.busan_base_url),
            ("busan_bims_base_url", &self.busan_bims_base_url),
            ("tago_base_url", &self.tago_base_url),
        ];
        for (name, url) in urls {
            if url.is_empty() {
                return Err(format!("{name} must not be empty"));
            }
        }

        let timeouts = [
            ("timeout_secs", self.timeout_secs),
            ("seoul_timeout_secs", self.seoul_timeout_secs),
            ("gyeonggi_search_timeout_secs", self.gyeonggi_search_timeout_secs),
            ("busan_shape_timeout_secs", self.busan_shape_timeout_secs),
            ("tago_search_timeout_secs", self.tago_search_timeout_secs),
        ];
        for (name, secs) in timeouts {
            if secs == 0 {
                return Err(format!("{name} must be greater than 0"));
            }
        }

        if self.search_page_size == 0 {
            return Err("search_page_size must be greater than 0".to_string());
        }

        if self.station_page_size == 0 {
            return Err("station_page_size must be greater than 0".to_string());
        }

        Ok(())
    }
}
