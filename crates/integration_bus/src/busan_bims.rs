//! Busan legacy BIMS client
//!
//! The legacy site is keyed by its own route id, which is only discoverable
//! through the coordinate listing for a route name. That page reads its
//! query as EUC-KR (cp949), not UTF-8. Its payloads carry everything in
//! attributes (`value1..3`, `text1..4`).

use domain::{Position, RouteDetail, RoutePath, Stop};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::category::busan_category;
use crate::config::BusApiConfig;
use crate::error::BusApiError;
use crate::http::{self, text};

/// Index of the first stop row in a line listing (row 0 is the route header)
const FIRST_STOP_ROW: usize = 2;

/// Shape of a route together with its legacy route id
#[derive(Debug, Clone, PartialEq)]
pub struct BimsRouteShape {
    /// Legacy BIMS route id
    pub bims_id: String,
    /// Route polyline
    pub path: RoutePath,
}

/// Route header and stops from a line listing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BimsLineListing {
    /// Route header row, if the listing had one
    pub detail: Option<RouteDetail>,
    /// Stops in order, none flagged as turnaround
    pub stops: Vec<Stop>,
}

/// Client for the Busan legacy BIMS endpoints
#[derive(Debug)]
pub struct BusanBimsClient {
    client: Client,
    config: BusApiConfig,
}

impl BusanBimsClient {
    /// Create a new legacy BIMS client
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

    /// Coordinate listing for a route name; `None` if the site knows no such route
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unreadable payload.
    #[instrument(skip(self))]
    pub async fn route_shape(&self, route_name: &str) -> Result<Option<BimsRouteShape>, BusApiError> {
        let Some(encoded_name) = euc_kr_form_value(route_name) else {
            debug!(route_name, "Route name has no EUC-KR form");
            return Ok(None);
        };
        let url = format!(
            "{}/busLineCoordList.asp?busLineId={encoded_name}",
            self.config.busan_bims_base_url
        );
        let response =
            http::fetch_encoded(&self.client, &url, self.config.busan_shape_timeout_secs).await?;
        response.ensure_success()?;

        let raw: RawCoordList = http::decode_xml(&response.body)?;
        let shape = raw.into_shape()?;
        if shape.is_none() {
            debug!(route_name, "No BIMS coordinates for route");
        }
        Ok(shape)
    }

    /// Line listing (route header and stops) for a legacy route id
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unreadable payload.
    #[instrument(skip(self))]
    pub async fn line_listing(&self, bims_id: &str) -> Result<BimsLineListing, BusApiError> {
        let url = format!("{}/busLineList.asp", self.config.busan_bims_base_url);
        let response = http::fetch(
            &self.client,
            &url,
            &[("optBusNum", bims_id)],
            self.config.timeout_secs,
        )
        .await?;
        response.ensure_success()?;

        let raw: RawLineList = http::decode_xml(&response.body)?;
        raw.into_listing()
    }
}

/// Form-encode `value` from its EUC-KR bytes; `None` if a character is unmappable
fn euc_kr_form_value(value: &str) -> Option<String> {
    let (bytes, _, unmappable) = encoding_rs::EUC_KR.encode(value);
    if unmappable {
        return None;
    }
    Some(url::form_urlencoded::byte_serialize(&bytes).collect())
}

fn coordinate(value: Option<&str>, field: &str) -> Result<f64, BusApiError> {
    value
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| BusApiError::RemoteProtocol(format!("invalid {field} coordinate")))
}

// Raw legacy BIMS XML types for deserialization

#[derive(Debug, Deserialize)]
struct RawCoordList {
    #[serde(default)]
    coord: Vec<RawCoord>,
}

#[derive(Debug, Deserialize)]
struct RawCoord {
    #[serde(rename = "@value1")]
    value1: Option<String>,
    #[serde(rename = "@value2")]
    value2: Option<String>,
    #[serde(rename = "@value3")]
    value3: Option<String>,
}

impl RawCoordList {
    /// The first coord names the legacy route id; the rest are the polyline
    fn into_shape(self) -> Result<Option<BimsRouteShape>, BusApiError> {
        let mut coords = self.coord.into_iter();
        let Some(first) = coords.next() else {
            return Ok(None);
        };
        let Some(bims_id) = text(first.value1) else {
            return Err(BusApiError::RemoteProtocol(
                "coordinate listing without route id".to_string(),
            ));
        };

        let path = coords
            .map(|c| {
                Ok(Position::new(
                    coordinate(c.value2.as_deref(), "x")?,
                    coordinate(c.value3.as_deref(), "y")?,
                ))
            })
            .collect::<Result<RoutePath, BusApiError>>()?;

        Ok(Some(BimsRouteShape { bims_id, path }))
    }
}

#[derive(Debug, Deserialize)]
struct RawLineList {
    #[serde(default)]
    line: Vec<RawLine>,
}

#[derive(Debug, Deserialize)]
struct RawLine {
    #[serde(rename = "@text1")]
    text1: Option<String>,
    #[serde(rename = "@text2")]
    text2: Option<String>,
    #[serde(rename = "@text3")]
    text3: Option<String>,
    #[serde(rename = "@text4")]
    text4: Option<String>,
}

impl RawLineList {
    fn into_listing(self) -> Result<BimsLineListing, BusApiError> {
        let detail = self.line.first().map(|header| {
            RouteDetail::new(
                busan_category(header.text2.as_deref().unwrap_or_default()),
                header.text1.clone().unwrap_or_default(),
                header.text3.clone().unwrap_or_default(),
                header.text4.clone().unwrap_or_default(),
            )
        });

        let stops = self
            .line
            .into_iter()
            .skip(FIRST_STOP_ROW)
            .map(|row| {
                let position = Position::new(
                    coordinate(row.text2.as_deref(), "x")?,
                    coordinate(row.text3.as_deref(), "y")?,
                );
                Ok(Stop::new(
                    text(row.text4),
                    row.text1.unwrap_or_default(),
                    position,
                    false,
                ))
            })
            .collect::<Result<Vec<_>, BusApiError>>()?;

        Ok(BimsLineListing { detail, stops })
    }
}
