//! Gyeonggi bus route service client (v2, XML)
//!
//! A response that is not XML carries no usable data and is treated as an
//! empty result.

use async_trait::async_trait;
use domain::{Position, Provider, RouteCategory, RouteDetail, RoutePath, RouteSummary, Stop};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::client::RegionalBusClient;
use crate::config::BusApiConfig;
use crate::error::BusApiError;
use crate::http::{self, RawGatewayHeader, ResponseStatus, ResultCodes, text};

const RESULT_CODES: ResultCodes = ResultCodes {
    success: 0,
    no_data: 4,
    auth: None,
};

/// Client for the Gyeonggi bus route service
#[derive(Debug)]
pub struct GyeonggiBusClient {
    client: Client,
    config: BusApiConfig,
}

impl GyeonggiBusClient {
    /// Create a new Gyeonggi client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &BusApiConfig) -> Result<Self, BusApiError> {
        Ok(Self {
            client: http::build_client(config)?,
            config: config.clone(),
        })
    }

    /// Call `operation`; `None` when the response carries no body to read
    async fn call(
        &self,
        operation: &str,
        key: &str,
        params: &[(&str, &str)],
        timeout_secs: u64,
    ) -> Result<Option<RawGyeonggiBody>, BusApiError> {
        let url = format!("{}/{operation}", self.config.gyeonggi_base_url);
        let mut query = vec![("serviceKey", key), ("format", "xml")];
        query.extend_from_slice(params);

        let response = http::fetch(&self.client, &url, &query, timeout_secs).await?;
        response.ensure_success()?;

        if !response.is_xml {
            warn!(operation, "Gyeonggi response is not XML, treating as empty");
            return Ok(None);
        }

        let raw: RawGyeonggiResponse = http::decode_xml(&response.body)?;
        raw.into_body()
    }

    async fn call_route(
        &self,
        operation: &str,
        key: &str,
        route: &RouteSummary,
    ) -> Result<Option<RawGyeonggiBody>, BusApiError> {
        self.call(
            operation,
            key,
            &[("routeId", route.id.as_str())],
            self.config.timeout_secs,
        )
        .await
    }
}

#[async_trait]
impl RegionalBusClient for GyeonggiBusClient {
    fn provider(&self) -> Provider {
        Provider::Gyeonggi
    }

    #[instrument(skip(self, key))]
    async fn search_routes(&self, key: &str, query: &str) -> Result<Vec<RouteSummary>, BusApiError> {
        let body = self
            .call(
                "getBusRouteListv2",
                key,
                &[("keyword", query)],
                self.config.gyeonggi_search_timeout_secs,
            )
            .await?;

        let routes: Vec<RouteSummary> = body
            .map(|b| b.routes)
            .unwrap_or_default()
            .into_iter()
            .filter_map(RawGyeonggiRoute::into_summary)
            .collect();

        debug!(count = routes.len(), "Gyeonggi route search complete");
        Ok(routes)
    }

    #[instrument(skip(self, key, route), fields(route_id = %route.id))]
    async fn get_stops(&self, key: &str, route: &RouteSummary) -> Result<Vec<Stop>, BusApiError> {
        let body = self
            .call_route("getBusRouteStationListv2", key, route)
            .await?;

        Ok(body
            .map(|b| b.stations)
            .unwrap_or_default()
            .into_iter()
            .map(RawGyeonggiStation::into_stop)
            .collect())
    }

    #[instrument(skip(self, key, route), fields(route_id = %route.id))]
    async fn get_route_detail(
        &self,
        key: &str,
        route: &RouteSummary,
    ) -> Result<Option<RouteDetail>, BusApiError> {
        let body = self.call_route("getBusRouteInfoItemv2", key, route).await?;

        Ok(body
            .and_then(|b| b.info)
            .map(RawGyeonggiRouteInfo::into_detail))
    }

    #[instrument(skip(self, key, route), fields(route_id = %route.id))]
    async fn get_route_shape(&self, key: &str, route: &RouteSummary) -> Result<RoutePath, BusApiError> {
        let body = self.call_route("getBusRouteLineListv2", key, route).await?;

        Ok(body
            .map(|b| b.line)
            .unwrap_or_default()
            .into_iter()
            .map(|p| Position::new(p.x, p.y))
            .collect())
    }
}

// Raw Gyeonggi XML types for deserialization

#[derive(Debug, Deserialize)]
struct RawGyeonggiResponse {
    #[serde(rename = "cmmMsgHeader")]
    gateway: Option<RawGatewayHeader>,
    #[serde(rename = "msgHeader")]
    header: Option<RawGyeonggiHeader>,
    #[serde(rename = "msgBody")]
    body: Option<RawGyeonggiBody>,
}

#[derive(Debug, Deserialize)]
struct RawGyeonggiHeader {
    #[serde(rename = "resultCode")]
    code: String,
    #[serde(rename = "resultMessage")]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGyeonggiBody {
    #[serde(rename = "busRouteList", default)]
    routes: Vec<RawGyeonggiRoute>,
    #[serde(rename = "busRouteStationList", default)]
    stations: Vec<RawGyeonggiStation>,
    #[serde(rename = "busRouteInfoItem")]
    info: Option<RawGyeonggiRouteInfo>,
    #[serde(rename = "busRouteLineList", default)]
    line: Vec<RawGyeonggiPoint>,
}

impl RawGyeonggiResponse {
    fn into_body(self) -> Result<Option<RawGyeonggiBody>, BusApiError> {
        http::check_gateway(self.gateway.as_ref())?;

        let header = self
            .header
            .ok_or_else(|| BusApiError::RemoteProtocol("missing msgHeader".to_string()))?;

        match RESULT_CODES.classify(&header.code, header.message.as_deref())? {
            ResponseStatus::Success => Ok(self.body),
            ResponseStatus::NoData => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawGyeonggiRoute {
    #[serde(rename = "routeName")]
    name: Option<String>,
    #[serde(rename = "routeId")]
    id: Option<String>,
    #[serde(rename = "regionName")]
    region: Option<String>,
    #[serde(rename = "routeTypeCd")]
    route_type: Option<String>,
}

impl RawGyeonggiRoute {
    fn into_summary(self) -> Option<RouteSummary> {
        Some(RouteSummary::new(
            text(self.name)?,
            text(self.id)?,
            text(self.region).unwrap_or_default(),
            category(self.route_type.as_deref()),
            Provider::Gyeonggi,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct RawGyeonggiStation {
    #[serde(rename = "mobileNo")]
    mobile_no: Option<String>,
    #[serde(rename = "stationName")]
    name: Option<String>,
    x: f64,
    y: f64,
    #[serde(rename = "turnYn")]
    turnaround: Option<String>,
}

impl RawGyeonggiStation {
    fn into_stop(self) -> Stop {
        let is_turnaround = self.turnaround.as_deref().map(str::trim) == Some("Y");
        Stop::new(
            text(self.mobile_no),
            text(self.name).unwrap_or_default(),
            Position::new(self.x, self.y),
            is_turnaround,
        )
    }
}

#[derive(Debug, Deserialize)]
struct RawGyeonggiRouteInfo {
    #[serde(rename = "routeTypeCd")]
    route_type: Option<String>,
    #[serde(rename = "routeName")]
    name: Option<String>,
    #[serde(rename = "startStationName")]
    start: Option<String>,
    #[serde(rename = "endStationName")]
    end: Option<String>,
}

impl RawGyeonggiRouteInfo {
    fn into_detail(self) -> RouteDetail {
        RouteDetail::new(
            category(self.route_type.as_deref()),
            text(self.name).unwrap_or_default(),
            text(self.start).unwrap_or_default(),
            text(self.end).unwrap_or_default(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct RawGyeonggiPoint {
    x: f64,
    y: f64,
}

fn category(code: Option<&str>) -> RouteCategory {
    code.map_or(RouteCategory::Unclassified, RouteCategory::from_code_str)
}
