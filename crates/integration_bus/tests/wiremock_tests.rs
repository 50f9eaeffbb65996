//! Integration tests for the provider clients (wiremock-based)

use domain::{Provider, RouteCategory, RouteSummary};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_bus::{
    BusApiConfig, BusApiError, BusanBusClient, GyeonggiBusClient, NationalBusClient,
    RegionalBusClient, SeoulBusClient, TagoBusClient,
};

const KEY: &str = "test-service-key";

fn config_for_mock(base_url: &str) -> BusApiConfig {
    BusApiConfig::for_testing(base_url)
}

fn xml(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/xml;charset=UTF-8")
}

fn tago_routes_page(range: std::ops::Range<u32>) -> String {
    let items: String = range
        .map(|n| {
            format!(
                "<item><routeid>DJB{n:08}</routeid><routeno>{n}</routeno><routetp>간선버스</routetp>\
                 <startnodenm>S{n}</startnodenm><endnodenm>E{n}</endnodenm></item>"
            )
        })
        .collect();
    format!(
        "<response><header><resultCode>00</resultCode><resultMsg>NORMAL SERVICE.</resultMsg></header>\
         <body><items>{items}</items></body></response>"
    )
}

fn busan_route(name: &str, id: &str) -> RouteSummary {
    RouteSummary::new(name, id, "", RouteCategory::BusanGeneral, Provider::Busan)
}

// Seoul

#[tokio::test]
async fn test_seoul_search_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/seoul/getBusRouteList"))
        .and(query_param("serviceKey", KEY))
        .and(query_param("strSrch", "6"))
        .respond_with(xml(
            r"<ServiceResult><msgHeader><headerCd>0</headerCd><headerMsg>정상적으로 처리되었습니다.</headerMsg></msgHeader><msgBody>
                <itemList><busRouteId>100100006</busRouteId><busRouteNm>6</busRouteNm><stStationNm>A</stStationNm><edStationNm>B</edStationNm><routeType>3</routeType></itemList>
                <itemList><busRouteId>100900010</busRouteId><busRouteNm>N16</busRouteNm><stStationNm>C</stStationNm><edStationNm>D</edStationNm><routeType>6</routeType></itemList>
                <itemList><busRouteId>229000001</busRouteId><busRouteNm>6-1</busRouteNm><stStationNm>E</stStationNm><edStationNm>F</edStationNm><routeType>8</routeType></itemList>
            </msgBody></ServiceResult>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = SeoulBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let routes = client.search_routes(KEY, "6").await.unwrap();

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].name, "6");
    assert_eq!(routes[1].id.as_str(), "100900010");
    assert!(routes.iter().all(|r| r.provider == Provider::Seoul));
}

#[tokio::test]
async fn test_seoul_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/seoul/getBusRouteList"))
        .respond_with(xml(
            r"<ServiceResult><msgHeader><headerCd>7</headerCd><headerMsg>등록되지 않은 키입니다.</headerMsg></msgHeader></ServiceResult>",
        ))
        .mount(&server)
        .await;

    let client = SeoulBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.search_routes(KEY, "6").await.unwrap_err();

    assert!(err.is_auth_error());
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_seoul_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/seoul/getRoutePath"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = SeoulBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let route = RouteSummary::new("6", "100100006", "", RouteCategory::Trunk, Provider::Seoul);
    let err = client.get_route_shape(KEY, &route).await.unwrap_err();

    assert!(matches!(err, BusApiError::RequestFailed(_)));
}

#[tokio::test]
async fn test_seoul_route_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/seoul/getRoutePath"))
        .and(query_param("busRouteId", "100100006"))
        .respond_with(xml(
            r"<ServiceResult><msgHeader><headerCd>0</headerCd></msgHeader><msgBody>
                <itemList><gpsX>126.97</gpsX><gpsY>37.55</gpsY><no>1</no></itemList>
                <itemList><gpsX>126.98</gpsX><gpsY>37.56</gpsY><no>2</no></itemList>
                <itemList><gpsX>126.99</gpsX><gpsY>37.54</gpsY><no>3</no></itemList>
            </msgBody></ServiceResult>",
        ))
        .mount(&server)
        .await;

    let client = SeoulBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let route = RouteSummary::new("6", "100100006", "", RouteCategory::Trunk, Provider::Seoul);
    let shape = client.get_route_shape(KEY, &route).await.unwrap();

    assert_eq!(shape.len(), 3);
    let bounds = shape.bounds().unwrap();
    assert!((bounds.max_latitude - 37.56).abs() < 1e-9);
    assert!((bounds.min_longitude - 126.97).abs() < 1e-9);
}

// Gyeonggi

#[tokio::test]
async fn test_gyeonggi_non_xml_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gyeonggi/getBusRouteListv2"))
        .and(query_param("keyword", "9401"))
        .and(query_param("format", "xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Unexpected errors"))
        .mount(&server)
        .await;

    let client = GyeonggiBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let routes = client.search_routes(KEY, "9401").await.unwrap();

    assert!(routes.is_empty());
}

#[tokio::test]
async fn test_gyeonggi_gateway_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gyeonggi/getBusRouteListv2"))
        .respond_with(xml(
            r"<OpenAPI_ServiceResponse><cmmMsgHeader><errMsg>SERVICE ERROR</errMsg><returnAuthMsg>SERVICE_KEY_IS_NOT_REGISTERED_ERROR</returnAuthMsg><returnReasonCode>30</returnReasonCode></cmmMsgHeader></OpenAPI_ServiceResponse>",
        ))
        .mount(&server)
        .await;

    let client = GyeonggiBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.search_routes(KEY, "9401").await.unwrap_err();

    assert!(matches!(err, BusApiError::AuthKey(ref m) if m == "SERVICE_KEY_IS_NOT_REGISTERED_ERROR"));
}

#[tokio::test]
async fn test_gyeonggi_route_detail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gyeonggi/getBusRouteInfoItemv2"))
        .and(query_param("routeId", "204000046"))
        .respond_with(xml(
            r"<response><msgHeader><resultCode>0</resultCode></msgHeader><msgBody>
                <busRouteInfoItem><routeName>9401</routeName><routeTypeCd>14</routeTypeCd><startStationName>구미동차고지</startStationName><endStationName>서울역</endStationName></busRouteInfoItem>
            </msgBody></response>",
        ))
        .mount(&server)
        .await;

    let client = GyeonggiBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let route = RouteSummary::new("9401", "204000046", "성남", RouteCategory::MetropolitanExpress, Provider::Gyeonggi);
    let detail = client.get_route_detail(KEY, &route).await.unwrap().unwrap();

    assert_eq!(detail.category, RouteCategory::MetropolitanExpress);
    assert_eq!(detail.start_point_name, "구미동차고지");
}

// Busan

#[tokio::test]
async fn test_busan_unavailable_marker() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/busan/busInfo"))
        .and(query_param("lineno", "1001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><meta http-equiv="refresh" content="0;url=http://apis.data.go.kr/503.html"></head></html>"#,
        ))
        .mount(&server)
        .await;

    let client = BusanBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.search_routes(KEY, "1001").await.unwrap_err();

    assert!(matches!(err, BusApiError::UpstreamUnavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_busan_stops_with_turnaround() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bims/busLineCoordList.asp"))
        .and(query_param("busLineId", "1001"))
        .respond_with(xml(
            r#"<result><coord value1="5291001000" value2="" value3=""/><coord value1="" value2="129.17" value3="35.17"/></result>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bims/busLineList.asp"))
        .and(query_param("optBusNum", "5291001000"))
        .respond_with(xml(
            r#"<result>
                <line text1="1001" text2="급행버스" text3="장산역" text4="서면"/>
                <line text1="정류소명" text2="X" text3="Y" text4="번호"/>
                <line text1="장산역" text2="129.17" text3="35.17" text4="09001"/>
                <line text1="해운대" text2="129.16" text3="35.16" text4="09002"/>
                <line text1="서면" text2="129.05" text3="35.15" text4="05001"/>
            </result>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/busan/busInfoByRouteId"))
        .and(query_param("lineid", "5200179000"))
        .respond_with(xml(
            r"<response><header><resultCode>00</resultCode></header><body><items>
                <item><bstopidx>1</bstopidx><rpoint>0</rpoint></item>
                <item><bstopidx>3</bstopidx><rpoint>1</rpoint></item>
                <item><bstopidx>2</bstopidx><rpoint>1</rpoint></item>
            </items></body></response>",
        ))
        .mount(&server)
        .await;

    let client = BusanBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let stops = client
        .get_stops(KEY, &busan_route("1001", "5200179000"))
        .await
        .unwrap();

    assert_eq!(stops.len(), 3);
    assert_eq!(stops[0].station_code.as_deref(), Some("09001"));
    let flagged: Vec<usize> = stops
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_turnaround_point)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(flagged, vec![2]);
}

#[tokio::test]
async fn test_busan_detail_unknown_route() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bims/busLineCoordList.asp"))
        .respond_with(xml("<result></result>"))
        .mount(&server)
        .await;

    let client = BusanBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let route = busan_route("9999", "5200999000");

    assert!(client.get_route_detail(KEY, &route).await.unwrap().is_none());
    assert!(client.get_route_shape(KEY, &route).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_busan_shape_lookup_sends_euc_kr_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bims/busLineCoordList.asp"))
        .respond_with(xml(
            r#"<result><coord value1="5290101000" value2="" value3=""/><coord value1="" value2="128.98" value3="35.15"/></result>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = BusanBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let shape = client
        .get_route_shape(KEY, &busan_route("사상구1", "5290101000"))
        .await
        .unwrap();
    assert_eq!(shape.len(), 1);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("busLineId=%BB%E7%BB%F3%B1%B81"));
}

// TAGO

#[tokio::test]
async fn test_tago_search_paginates() {
    let server = MockServer::start().await;

    for (page_no, range) in [("1", 0..3), ("2", 3..6), ("3", 6..7)] {
        Mock::given(method("GET"))
            .and(path("/tago/getRouteNoList"))
            .and(query_param("cityCode", "25"))
            .and(query_param("routeNo", "6"))
            .and(query_param("pageNo", page_no))
            .and(query_param("numOfRows", "3"))
            .respond_with(xml(tago_routes_page(range)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let config = BusApiConfig {
        search_page_size: 3,
        ..config_for_mock(&server.uri())
    };
    let client = TagoBusClient::new(&config).unwrap();
    let routes = client.search_routes(KEY, "25", "6").await.unwrap();

    assert_eq!(routes.len(), 7);
    assert_eq!(routes[0].id.as_str(), "TAGO|25|DJB00000000");
    assert_eq!(routes[6].name, "6");
    assert_eq!(routes[6].description, "S6~E6");
    assert!(routes.iter().all(|r| r.category == RouteCategory::Trunk));
}

#[tokio::test]
async fn test_tago_search_error_discards_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tago/getRouteNoList"))
        .and(query_param("pageNo", "1"))
        .respond_with(xml(tago_routes_page(0..2)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tago/getRouteNoList"))
        .and(query_param("pageNo", "2"))
        .respond_with(xml(
            r"<response><header><resultCode>22</resultCode><resultMsg>LIMITED NUMBER OF SERVICE REQUESTS EXCEEDS ERROR.</resultMsg></header></response>",
        ))
        .mount(&server)
        .await;

    let config = BusApiConfig {
        search_page_size: 2,
        ..config_for_mock(&server.uri())
    };
    let client = TagoBusClient::new(&config).unwrap();
    let err = client.search_routes(KEY, "25", "6").await.unwrap_err();

    assert!(matches!(err, BusApiError::RemoteProtocol(ref m) if m.starts_with("LIMITED")));
}

#[tokio::test]
async fn test_tago_no_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tago/getRouteNoList"))
        .respond_with(xml(
            r"<response><header><resultCode>04</resultCode><resultMsg>NODATA_ERROR</resultMsg></header></response>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = TagoBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let routes = client.search_routes(KEY, "22", "999").await.unwrap();

    assert!(routes.is_empty());
}

#[tokio::test]
async fn test_tago_auth_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tago/getRouteNoList"))
        .respond_with(xml(
            r"<response><header><resultCode>03</resultCode><resultMsg>SERVICE_KEY_IS_NOT_REGISTERED_ERROR</resultMsg></header></response>",
        ))
        .mount(&server)
        .await;

    let client = TagoBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.search_routes(KEY, "22", "1").await.unwrap_err();

    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_tago_plain_text_key_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tago/getCtyCodeList"))
        .respond_with(ResponseTemplate::new(200).set_body_string("SERVICE KEY IS NOT REGISTERED ERROR."))
        .mount(&server)
        .await;

    let client = TagoBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.list_municipalities(KEY).await.unwrap_err();

    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_tago_municipalities() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tago/getCtyCodeList"))
        .and(query_param("_type", "xml"))
        .respond_with(xml(
            r"<response><header><resultCode>00</resultCode></header><body><items>
                <item><citycode>12</citycode><cityname>세종특별시</cityname></item>
                <item><citycode>25</citycode><cityname>대전광역시</cityname></item>
                <item><citycode>31010</citycode><cityname>수원시</cityname></item>
            </items></body></response>",
        ))
        .mount(&server)
        .await;

    let client = TagoBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let cities = client.list_municipalities(KEY).await.unwrap();

    assert_eq!(cities.len(), 3);
    assert_eq!(cities[1].code, "25");
    assert_eq!(cities[1].name, "대전광역시");
}

#[tokio::test]
async fn test_tago_stops_turnaround_and_missing_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tago/getRouteAcctoThrghSttnList"))
        .and(query_param("routeId", "DJB30300004"))
        .and(query_param("pageNo", "1"))
        .and(query_param("numOfRows", "100"))
        .respond_with(xml(
            r"<response><header><resultCode>00</resultCode></header><body><items>
                <item><nodeno>44810</nodeno><nodenm>A</nodenm><gpslong>127.40</gpslong><gpslati>36.30</gpslati><updowncd>0</updowncd></item>
                <item><nodeno>44820</nodeno><nodenm>B</nodenm><gpslong>127.41</gpslong><gpslati>36.31</gpslati><updowncd>0</updowncd></item>
                <item><nodenm>C</nodenm><updowncd>1</updowncd></item>
                <item><nodeno>44810</nodeno><nodenm>A</nodenm><gpslong>127.40</gpslong><gpslati>36.30</gpslati><updowncd>1</updowncd></item>
            </items></body></response>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = TagoBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let stops = client.get_stops(KEY, "25", "DJB30300004").await.unwrap();

    assert_eq!(stops.len(), 4);
    assert!(stops[1].is_turnaround_point);
    assert_eq!(stops.iter().filter(|s| s.is_turnaround_point).count(), 1);
    assert!(stops[2].position.is_unknown());
    assert_eq!(stops[2].station_code, None);
}

#[tokio::test]
async fn test_tago_detail_without_item() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tago/getRouteInfoIem"))
        .respond_with(xml(
            r"<response><header><resultCode>00</resultCode></header><body><items></items></body></response>",
        ))
        .mount(&server)
        .await;

    let client = TagoBusClient::new(&config_for_mock(&server.uri())).unwrap();
    let detail = client.get_route_detail(KEY, "25", "DJB30300004").await.unwrap();

    assert!(detail.is_none());
}
