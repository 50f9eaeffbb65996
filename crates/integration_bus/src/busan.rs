//! Busan client
//!
//! Search runs against the BIMS open API. Stops, detail and shape come from
//! the legacy BIMS site, reached through the route name; the open API only
//! contributes the turnaround marker for stop listings.

use async_trait::async_trait;
use domain::{Provider, RouteDetail, RoutePath, RouteSummary, Stop};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::busan_bims::BusanBimsClient;
use crate::category::busan_category;
use crate::client::RegionalBusClient;
use crate::config::BusApiConfig;
use crate::error::BusApiError;
use crate::http::{self, RawPortalResponse, ResultCodes, text};

const RESULT_CODES: ResultCodes = ResultCodes {
    success: 0,
    no_data: 3,
    auth: None,
};

/// Body fragment of the gateway's "service unavailable" page
const UNAVAILABLE_MARKER: &str = "http://apis.data.go.kr/503.html";

/// Client for Busan (open API plus legacy BIMS)
#[derive(Debug)]
pub struct BusanBusClient {
    client: Client,
    config: BusApiConfig,
    bims: BusanBimsClient,
}

impl BusanBusClient {
    /// Create a new Busan client
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be initialized.
    pub fn new(config: &BusApiConfig) -> Result<Self, BusApiError> {
        Ok(Self {
            client: http::build_client(config)?,
            config: config.clone(),
            bims: BusanBimsClient::new(config)?,
        })
    }

    /// Call an open API operation and return its items
    async fn call<T: DeserializeOwned>(
        &self,
        operation: &str,
        key: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, BusApiError> {
        let url = format!("{}/{operation}", self.config.busan_base_url);
        let mut query = vec![("serviceKey", key)];
        query.extend_from_slice(params);

        let response = http::fetch(&self.client, &url, &query, self.config.timeout_secs).await?;
        if response.body.contains(UNAVAILABLE_MARKER) {
            return Err(BusApiError::UpstreamUnavailable(
                "503 Server Unavailable".to_string(),
            ));
        }
        response.ensure_success()?;

        let raw: RawPortalResponse<T> = http::decode_xml(&response.body)?;
        let (_, items) = raw.into_items(RESULT_CODES)?;
        Ok(items)
    }

    /// 1-based index of the turnaround stop reported by the open API
    async fn turnaround_index(&self, key: &str, route: &RouteSummary) -> Result<Option<usize>, BusApiError> {
        let items: Vec<RawBusanRouteStop> = self
            .call("busInfoByRouteId", key, &[("lineid", route.id.as_str())])
            .await?;

        Ok(items
            .into_iter()
            .find(|item| item.rpoint.as_deref().map(str::trim) == Some("1"))
            .and_then(|item| item.bstopidx.and_then(|idx| idx.trim().parse().ok())))
    }
}

#[async_trait]
impl RegionalBusClient for BusanBusClient {
    fn provider(&self) -> Provider {
        Provider::Busan
    }

    #[instrument(skip(self, key))]
    async fn search_routes(&self, key: &str, query: &str) -> Result<Vec<RouteSummary>, BusApiError> {
        let items: Vec<RawBusanRoute> = self.call("busInfo", key, &[("lineno", query)]).await?;

        let routes: Vec<RouteSummary> = items
            .into_iter()
            .filter_map(RawBusanRoute::into_summary)
            .collect();

        debug!(count = routes.len(), "Busan route search complete");
        Ok(routes)
    }

    #[instrument(skip(self, key, route), fields(route = %route.name))]
    async fn get_stops(&self, key: &str, route: &RouteSummary) -> Result<Vec<Stop>, BusApiError> {
        let Some(shape) = self.bims.route_shape(&route.name).await? else {
            return Ok(Vec::new());
        };
        let mut stops = self.bims.line_listing(&shape.bims_id).await?.stops;

        match self.turnaround_index(key, route).await? {
            Some(idx) if (1..=stops.len()).contains(&idx) => {
                stops[idx - 1].is_turnaround_point = true;
            },
            Some(idx) => {
                warn!(idx, stop_count = stops.len(), "Turnaround index out of range");
            },
            None => {},
        }

        Ok(stops)
    }

    #[instrument(skip(self, _key, route), fields(route = %route.name))]
    async fn get_route_detail(
        &self,
        _key: &str,
        route: &RouteSummary,
    ) -> Result<Option<RouteDetail>, BusApiError> {
        let Some(shape) = self.bims.route_shape(&route.name).await? else {
            return Ok(None);
        };
        Ok(self.bims.line_listing(&shape.bims_id).await?.detail)
    }

    #[instrument(skip(self, _key, route), fields(route = %route.name))]
    async fn get_route_shape(&self, _key: &str, route: &RouteSummary) -> Result<RoutePath, BusApiError> {
        Ok(self
            .bims
            .route_shape(&route.name)
            .await?
            .map(|shape| shape.path)
            .unwrap_or_default())
    }
}

// Raw Busan open API XML types for deserialization

#[derive(Debug, Deserialize)]
struct RawBusanRoute {
    buslinenum: Option<String>,
    lineid: Option<String>,
    startpoint: Option<String>,
    endpoint: Option<String>,
    bustype: Option<String>,
}

impl RawBusanRoute {
    fn into_summary(self) -> Option<RouteSummary> {
        let category = busan_category(self.bustype.as_deref().unwrap_or_default());
        Some(RouteSummary::new(
            text(self.buslinenum)?,
            text(self.lineid)?,
            format!(
                "{}~{}",
                text(self.startpoint).unwrap_or_default(),
                text(self.endpoint).unwrap_or_default()
            ),
            category,
            Provider::Busan,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct RawBusanRouteStop {
    rpoint: Option<String>,
    bstopidx: Option<String>,
}
