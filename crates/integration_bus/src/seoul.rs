//! Seoul bus route information client
//!
//! Every call answers with `msgHeader/headerCd` (0 ok, 4 no data, 7 key
//! rejected) and a flat `msgBody/itemList` sequence.

use async_trait::async_trait;
use domain::{Position, Provider, RouteCategory, RouteDetail, RoutePath, RouteSummary, Stop};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::client::RegionalBusClient;
use crate::config::BusApiConfig;
use crate::error::BusApiError;
use crate::http::{self, ResponseStatus, ResultCodes, text};

const RESULT_CODES: ResultCodes = ResultCodes {
    success: 0,
    no_data: 4,
    auth: Some(7),
};

/// Route types listed by Seoul but operated by Incheon or Gyeonggi
const FOREIGN_ROUTE_TYPES: [RouteCategory; 2] =
    [RouteCategory::Incheon, RouteCategory::GyeonggiLinked];

/// Client for the Seoul bus route service
#[derive(Debug)]
pub struct SeoulBusClient {
    client: Client,
    config: BusApiConfig,
}

impl SeoulBusClient {
    /// Create a new Seoul client
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

    /// Call `operation` and return its item list (empty on "no data")
    async fn call<T: DeserializeOwned>(
        &self,
        operation: &str,
        key: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, BusApiError> {
        let url = format!("{}/{operation}", self.config.seoul_base_url);
        let mut query = vec![("serviceKey", key)];
        query.extend_from_slice(params);

        let response =
            http::fetch(&self.client, &url, &query, self.config.seoul_timeout_secs).await?;
        response.ensure_success()?;

        let raw: RawSeoulResponse<T> = http::decode_xml(&response.body)?;
        raw.into_items()
    }
}

#[async_trait]
impl RegionalBusClient for SeoulBusClient {
    fn provider(&self) -> Provider {
        Provider::Seoul
    }

    #[instrument(skip(self, key))]
    async fn search_routes(&self, key: &str, query: &str) -> Result<Vec<RouteSummary>, BusApiError> {
        let items: Vec<RawSeoulRoute> = self
            .call("getBusRouteList", key, &[("strSrch", query)])
            .await?;

        let routes: Vec<RouteSummary> = items
            .into_iter()
            .filter_map(RawSeoulRoute::into_summary)
            .collect();

        debug!(count = routes.len(), "Seoul route search complete");
        Ok(routes)
    }

    #[instrument(skip(self, key, route), fields(route_id = %route.id))]
    async fn get_stops(&self, key: &str, route: &RouteSummary) -> Result<Vec<Stop>, BusApiError> {
        let items: Vec<RawSeoulStation> = self
            .call("getStaionByRoute", key, &[("busRouteId", route.id.as_str())])
            .await?;

        Ok(items.into_iter().map(RawSeoulStation::into_stop).collect())
    }

    #[instrument(skip(self, key, route), fields(route_id = %route.id))]
    async fn get_route_detail(
        &self,
        key: &str,
        route: &RouteSummary,
    ) -> Result<Option<RouteDetail>, BusApiError> {
        let items: Vec<RawSeoulRouteInfo> = self
            .call("getRouteInfo", key, &[("busRouteId", route.id.as_str())])
            .await?;

        Ok(items.into_iter().next().map(RawSeoulRouteInfo::into_detail))
    }

    #[instrument(skip(self, key, route), fields(route_id = %route.id))]
    async fn get_route_shape(&self, key: &str, route: &RouteSummary) -> Result<RoutePath, BusApiError> {
        let items: Vec<RawSeoulPoint> = self
            .call("getRoutePath", key, &[("busRouteId", route.id.as_str())])
            .await?;

        Ok(items
            .into_iter()
            .map(|p| Position::new(p.gps_x, p.gps_y))
            .collect())
    }
}

// Raw Seoul XML types for deserialization

#[derive(Debug, Deserialize)]
struct RawSeoulResponse<T> {
    #[serde(rename = "msgHeader")]
    header: Option<RawSeoulHeader>,
    #[serde(rename = "msgBody")]
    body: Option<RawSeoulBody<T>>,
}

#[derive(Debug, Deserialize)]
struct RawSeoulHeader {
    #[serde(rename = "headerCd")]
    code: String,
    #[serde(rename = "headerMsg")]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSeoulBody<T> {
    #[serde(rename = "itemList", default = "Vec::new")]
    items: Vec<T>,
}

impl<T> RawSeoulResponse<T> {
    fn into_items(self) -> Result<Vec<T>, BusApiError> {
        let header = self
            .header
            .ok_or_else(|| BusApiError::RemoteProtocol("missing msgHeader".to_string()))?;

        match RESULT_CODES.classify(&header.code, header.message.as_deref())? {
            ResponseStatus::Success => Ok(self.body.map(|b| b.items).unwrap_or_default()),
            ResponseStatus::NoData => Ok(Vec::new()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSeoulRoute {
    #[serde(rename = "busRouteNm")]
    name: Option<String>,
    #[serde(rename = "busRouteId")]
    id: Option<String>,
    #[serde(rename = "stStationNm")]
    start: Option<String>,
    #[serde(rename = "edStationNm")]
    end: Option<String>,
    #[serde(rename = "routeType")]
    route_type: Option<String>,
}

impl RawSeoulRoute {
    fn into_summary(self) -> Option<RouteSummary> {
        let category = self
            .route_type
            .as_deref()
            .map_or(RouteCategory::Unclassified, RouteCategory::from_code_str);
        if FOREIGN_ROUTE_TYPES.contains(&category) {
            return None;
        }

        let name = text(self.name)?;
        let id = text(self.id)?;
        let description = format!(
            "{}~{}",
            text(self.start).unwrap_or_default(),
            text(self.end).unwrap_or_default()
        );
        Some(RouteSummary::new(name, id, description, category, Provider::Seoul))
    }
}

#[derive(Debug, Deserialize)]
struct RawSeoulStation {
    #[serde(rename = "arsId")]
    ars_id: Option<String>,
    #[serde(rename = "stationNm")]
    name: Option<String>,
    #[serde(rename = "gpsX")]
    gps_x: f64,
    #[serde(rename = "gpsY")]
    gps_y: f64,
    #[serde(rename = "transYn")]
    turnaround: Option<String>,
}

impl RawSeoulStation {
    fn into_stop(self) -> Stop {
        let is_turnaround = self.turnaround.as_deref().map(str::trim) == Some("Y");
        Stop::new(
            text(self.ars_id),
            text(self.name).unwrap_or_default(),
            Position::new(self.gps_x, self.gps_y),
            is_turnaround,
        )
    }
}

#[derive(Debug, Deserialize)]
struct RawSeoulRouteInfo {
    #[serde(rename = "routeType")]
    route_type: Option<String>,
    #[serde(rename = "busRouteNm")]
    name: Option<String>,
    #[serde(rename = "stStationNm")]
    start: Option<String>,
    #[serde(rename = "edStationNm")]
    end: Option<String>,
}

impl RawSeoulRouteInfo {
    fn into_detail(self) -> RouteDetail {
        RouteDetail::new(
            self.route_type
                .as_deref()
                .map_or(RouteCategory::Unclassified, RouteCategory::from_code_str),
            text(self.name).unwrap_or_default(),
            text(self.start).unwrap_or_default(),
            text(self.end).unwrap_or_default(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct RawSeoulPoint {
    #[serde(rename = "gpsX")]
    gps_x: f64,
    #[serde(rename = "gpsY")]
    gps_y: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE_LIST: &str = r"<ServiceResult>
        <comMsgHeader/>
        <msgHeader><headerCd>0</headerCd><headerMsg>정상적으로 처리되었습니다.</headerMsg><itemCount>0</itemCount></msgHeader>
        <msgBody>
            <itemList><busRouteId>100100006</busRouteId><busRouteNm>6</busRouteNm><stStationNm>A</stStationNm><edStationNm>B</edStationNm><routeType>3</routeType></itemList>
            <itemList><busRouteId>200000001</busRouteId><busRouteNm>60</busRouteNm><stStationNm>C</stStationNm><edStationNm>D</edStationNm><routeType>8</routeType></itemList>
            <itemList><busRouteId>165000001</busRouteId><busRouteNm>600</busRouteNm><stStationNm>E</stStationNm><edStationNm>F</edStationNm><routeType>7</routeType></itemList>
        </msgBody>
    </ServiceResult>";

    #[test]
    fn test_route_list_filters_foreign_types() {
        let raw: RawSeoulResponse<RawSeoulRoute> = http::decode_xml(ROUTE_LIST).unwrap();
        let routes: Vec<_> = raw
            .into_items()
            .unwrap()
            .into_iter()
            .filter_map(RawSeoulRoute::into_summary)
            .collect();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].name, "6");
        assert_eq!(routes[0].id.as_str(), "100100006");
        assert_eq!(routes[0].description, "A~B");
        assert_eq!(routes[0].category, RouteCategory::Trunk);
        assert_eq!(routes[0].provider, Provider::Seoul);
    }

    #[test]
    fn test_no_data_header() {
        let xml = r"<ServiceResult><msgHeader><headerCd>4</headerCd><headerMsg>결과가 없습니다.</headerMsg></msgHeader><msgBody/></ServiceResult>";
        let raw: RawSeoulResponse<RawSeoulRoute> = http::decode_xml(xml).unwrap();
        assert!(raw.into_items().unwrap().is_empty());
    }

    #[test]
    fn test_auth_header() {
        let xml = r"<ServiceResult><msgHeader><headerCd>7</headerCd><headerMsg>인증실패</headerMsg></msgHeader></ServiceResult>";
        let raw: RawSeoulResponse<RawSeoulRoute> = http::decode_xml(xml).unwrap();
        let err = raw.into_items().unwrap_err();
        assert!(matches!(err, BusApiError::AuthKey(ref m) if m == "인증실패"));
    }

    #[test]
    fn test_other_header_code() {
        let xml = r"<ServiceResult><msgHeader><headerCd>8</headerCd><headerMsg>요청제한</headerMsg></msgHeader></ServiceResult>";
        let raw: RawSeoulResponse<RawSeoulRoute> = http::decode_xml(xml).unwrap();
        let err = raw.into_items().unwrap_err();
        assert!(matches!(err, BusApiError::RemoteProtocol(ref m) if m == "요청제한"));
    }

    #[test]
    fn test_station_turnaround_flag() {
        let xml = r"<ServiceResult><msgHeader><headerCd>0</headerCd></msgHeader><msgBody>
            <itemList><arsId>01001</arsId><stationNm>A</stationNm><gpsX>126.97</gpsX><gpsY>37.55</gpsY><transYn>N</transYn></itemList>
            <itemList><arsId>01002</arsId><stationNm>B</stationNm><gpsX>126.98</gpsX><gpsY>37.56</gpsY><transYn>Y</transYn></itemList>
        </msgBody></ServiceResult>";
        let raw: RawSeoulResponse<RawSeoulStation> = http::decode_xml(xml).unwrap();
        let stops: Vec<_> = raw
            .into_items()
            .unwrap()
            .into_iter()
            .map(RawSeoulStation::into_stop)
            .collect();

        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].station_code.as_deref(), Some("01001"));
        assert!(!stops[0].is_turnaround_point);
        assert!(stops[1].is_turnaround_point);
        assert!((stops[1].position.longitude() - 126.98).abs() < f64::EPSILON);
    }

    #[test]
    fn test_route_info_detail() {
        let xml = r"<ServiceResult><msgHeader><headerCd>0</headerCd></msgHeader><msgBody>
            <itemList><routeType>4</routeType><busRouteNm>0017</busRouteNm><stStationNm>청암동</stStationNm><edStationNm>용산역</edStationNm></itemList>
        </msgBody></ServiceResult>";
        let raw: RawSeoulResponse<RawSeoulRouteInfo> = http::decode_xml(xml).unwrap();
        let detail = raw
            .into_items()
            .unwrap()
            .into_iter()
            .next()
            .map(RawSeoulRouteInfo::into_detail)
            .unwrap();

        assert_eq!(detail.category, RouteCategory::Branch);
        assert_eq!(detail.name, "0017");
        assert_eq!(detail.terminals(), "청암동~용산역");
    }
}
