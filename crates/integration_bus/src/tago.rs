//! Nationwide TAGO route information client
//!
//! One service covers every municipality outside the fixed regions; each
//! request names the municipality by city code. Route ids are returned in
//! composite form so that later detail requests can find their municipality.

use async_trait::async_trait;
use domain::{
    Municipality, Position, Provider, RouteDetail, RouteIdCodec, RoutePath, RouteSummary, Stop,
};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::category::tago_category;
use crate::client::NationalBusClient;
use crate::config::BusApiConfig;
use crate::error::BusApiError;
use crate::http::{self, RawPortalResponse, ResponseStatus, ResultCodes, text};
use crate::paginator::{Page, Paginator};

const RESULT_CODES: ResultCodes = ResultCodes {
    success: 0,
    no_data: 4,
    auth: Some(3),
};

/// Plain-text gateway rejection served without an XML content type
const UNREGISTERED_KEY_MARKER: &str = "SERVICE KEY IS NOT REGISTERED";

/// Direction code of a stop on the outbound leg
const OUTBOUND: &str = "0";
/// Direction code of a stop on the return leg
const INBOUND: &str = "1";

/// Client for the nationwide TAGO service
#[derive(Debug)]
pub struct TagoBusClient {
    client: Client,
    config: BusApiConfig,
    codec: RouteIdCodec,
}

impl TagoBusClient {
    /// Create a new TAGO client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized or the
    /// route id codec is invalid.
    pub fn new(config: &BusApiConfig) -> Result<Self, BusApiError> {
        let codec = RouteIdCodec::new(RouteIdCodec::NATIONAL_TAG, RouteIdCodec::DELIMITER)
            .map_err(|e| BusApiError::ConfigurationError(e.to_string()))?;

        Ok(Self {
            client: http::build_client(config)?,
            config: config.clone(),
            codec,
        })
    }

    /// Codec used to build composite route ids
    #[must_use]
    pub const fn codec(&self) -> RouteIdCodec {
        self.codec
    }

    /// Call `operation` and classify the envelope
    ///
    /// A response that is not XML is `NoData` unless it is the gateway's
    /// plain-text key rejection.
    async fn call<T: DeserializeOwned>(
        &self,
        operation: &str,
        key: &str,
        params: &[(&str, &str)],
        timeout_secs: u64,
    ) -> Result<Page<T>, BusApiError> {
        let url = format!("{}/{operation}", self.config.tago_base_url);
        let mut query = vec![("serviceKey", key), ("_type", "xml")];
        query.extend_from_slice(params);

        let response = http::fetch(&self.client, &url, &query, timeout_secs).await?;
        response.ensure_success()?;

        if !response.is_xml {
            if response.body.contains(UNREGISTERED_KEY_MARKER) {
                return Err(BusApiError::AuthKey(UNREGISTERED_KEY_MARKER.to_string()));
            }
            debug!(operation, "TAGO response is not XML, treating as no data");
            return Ok(Page::NoData);
        }

        let raw: RawPortalResponse<T> = http::decode_xml(&response.body)?;
        Ok(match raw.into_items(RESULT_CODES)? {
            (ResponseStatus::Success, items) => Page::Records(items),
            (ResponseStatus::NoData, _) => Page::NoData,
        })
    }

    /// Every station row of a route, in route order
    async fn station_rows(
        &self,
        key: &str,
        municipality_code: &str,
        route_id: &str,
    ) -> Result<Vec<RawTagoStation>, BusApiError> {
        let paginator = Paginator::new(self.config.station_page_size);
        let rows = paginator.page_size().to_string();

        paginator
            .collect(move |page_no| {
                let rows = rows.clone();
                async move {
                    let page_no = page_no.to_string();
                    self.call(
                        "getRouteAcctoThrghSttnList",
                        key,
                        &[
                            ("routeId", route_id),
                            ("cityCode", municipality_code),
                            ("pageNo", &page_no),
                            ("numOfRows", &rows),
                        ],
                        self.config.timeout_secs,
                    )
                    .await
                }
            })
            .await
    }

    fn into_summary(&self, municipality_code: &str, raw: RawTagoRoute) -> Option<RouteSummary> {
        let (Some(name), Some(native_id)) = (text(raw.routeno), text(raw.routeid)) else {
            debug!(municipality_code, "Skipping TAGO route without number or id");
            return None;
        };

        let id = match self.codec.encode(municipality_code, &native_id) {
            Ok(id) => id,
            Err(e) => {
                warn!(municipality_code, native_id = %native_id, error = %e, "Skipping TAGO route with unencodable id");
                return None;
            },
        };

        let description = format!(
            "{}~{}",
            text(raw.startnodenm).unwrap_or_else(|| "?".to_string()),
            text(raw.endnodenm).unwrap_or_else(|| "?".to_string())
        );
        let category = tago_category(raw.routetp.as_deref().unwrap_or_default());

        Some(RouteSummary::new(
            name,
            id,
            description,
            category,
            Provider::National,
        ))
    }
}

#[async_trait]
impl NationalBusClient for TagoBusClient {
    #[instrument(skip(self, key))]
    async fn list_municipalities(&self, key: &str) -> Result<Vec<Municipality>, BusApiError> {
        let page: Page<RawTagoCity> = self
            .call("getCtyCodeList", key, &[], self.config.tago_search_timeout_secs)
            .await?;

        let municipalities: Vec<Municipality> = match page {
            Page::Records(items) => items
                .into_iter()
                .filter_map(|city| Some(Municipality::new(text(city.cityname)?, text(city.citycode)?)))
                .collect(),
            Page::NoData => Vec::new(),
        };

        debug!(count = municipalities.len(), "TAGO municipality listing");
        Ok(municipalities)
    }

    #[instrument(skip(self, key))]
    async fn search_routes(
        &self,
        key: &str,
        municipality_code: &str,
        query: &str,
    ) -> Result<Vec<RouteSummary>, BusApiError> {
        let paginator = Paginator::new(self.config.search_page_size);
        let rows = paginator.page_size().to_string();

        let raw: Vec<RawTagoRoute> = paginator
            .collect(move |page_no| {
                let rows = rows.clone();
                async move {
                    let page_no = page_no.to_string();
                    self.call(
                        "getRouteNoList",
                        key,
                        &[
                            ("routeNo", query),
                            ("cityCode", municipality_code),
                            ("pageNo", &page_no),
                            ("numOfRows", &rows),
                        ],
                        self.config.tago_search_timeout_secs,
                    )
                    .await
                }
            })
            .await?;

        Ok(raw
            .into_iter()
            .filter_map(|route| self.into_summary(municipality_code, route))
            .collect())
    }

    #[instrument(skip(self, key))]
    async fn get_stops(
        &self,
        key: &str,
        municipality_code: &str,
        route_id: &str,
    ) -> Result<Vec<Stop>, BusApiError> {
        let rows = self.station_rows(key, municipality_code, route_id).await?;

        let directions: Vec<String> = rows
            .iter()
            .map(|row| text(row.updowncd.clone()).unwrap_or_else(|| OUTBOUND.to_string()))
            .collect();
        let turnaround = directions
            .windows(2)
            .position(|pair| pair[0] == OUTBOUND && pair[1] == INBOUND);

        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| {
                let position = row.position().unwrap_or_default();
                Stop::new(
                    text(row.nodeno),
                    text(row.nodenm).unwrap_or_default(),
                    position,
                    turnaround == Some(idx),
                )
            })
            .collect())
    }

    #[instrument(skip(self, key))]
    async fn get_route_detail(
        &self,
        key: &str,
        municipality_code: &str,
        route_id: &str,
    ) -> Result<Option<RouteDetail>, BusApiError> {
        let page: Page<RawTagoRouteInfo> = self
            .call(
                "getRouteInfoIem",
                key,
                &[("routeId", route_id), ("cityCode", municipality_code)],
                self.config.timeout_secs,
            )
            .await?;

        let Page::Records(items) = page else {
            return Ok(None);
        };

        Ok(items.into_iter().next().map(|info| {
            RouteDetail::new(
                tago_category(info.routetp.as_deref().unwrap_or_default()),
                text(info.routeno).unwrap_or_default(),
                text(info.startnodenm).unwrap_or_default(),
                text(info.endnodenm).unwrap_or_default(),
            )
        }))
    }

    #[instrument(skip(self, key))]
    async fn get_route_shape(
        &self,
        key: &str,
        municipality_code: &str,
        route_id: &str,
    ) -> Result<RoutePath, BusApiError> {
        let rows = self.station_rows(key, municipality_code, route_id).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.position())
            .collect())
    }
}

// Raw TAGO XML types for deserialization

#[derive(Debug, Deserialize)]
struct RawTagoCity {
    citycode: Option<String>,
    cityname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTagoRoute {
    routeid: Option<String>,
    routeno: Option<String>,
    routetp: Option<String>,
    startnodenm: Option<String>,
    endnodenm: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTagoStation {
    nodeno: Option<String>,
    nodenm: Option<String>,
    gpslong: Option<String>,
    gpslati: Option<String>,
    updowncd: Option<String>,
}

impl RawTagoStation {
    /// Stop position; `None` when either coordinate is missing or not a number
    fn position(&self) -> Option<Position> {
        let longitude = self.gpslong.as_deref()?.trim().parse().ok()?;
        let latitude = self.gpslati.as_deref()?.trim().parse().ok()?;
        Some(Position::new(longitude, latitude))
    }
}

#[derive(Debug, Deserialize)]
struct RawTagoRouteInfo {
    routeno: Option<String>,
    routetp: Option<String>,
    startnodenm: Option<String>,
    endnodenm: Option<String>,
}
