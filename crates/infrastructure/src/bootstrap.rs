//! Service wiring
//!
//! Builds the provider clients from [`AppConfig`], wraps them in adapters
//! and hands them to the route search service.

use std::sync::Arc;

use application::{ApplicationError, RegionalRoutePort, RouteSearchService};
use integration_bus::{
    BusApiError, BusanBusClient, GyeonggiBusClient, SeoulBusClient, TagoBusClient,
};
use tracing::info;

use crate::adapters::{NationalRouteAdapter, RegionalRouteAdapter};
use crate::config::AppConfig;

fn client_error(err: BusApiError) -> ApplicationError {
    ApplicationError::Configuration(format!("Failed to create provider client: {err}"))
}

/// Fixed-region adapters in search order: Seoul, Gyeonggi, Busan
///
/// # Errors
///
/// Returns an error if an HTTP client cannot be created.
pub fn regional_ports(config: &AppConfig) -> Result<Vec<Arc<dyn RegionalRoutePort>>, ApplicationError> {
    let bus = &config.bus;
    let seoul = RegionalRouteAdapter::new(SeoulBusClient::new(bus).map_err(client_error)?)
        .with_retry(config.retry.clone());
    let gyeonggi = RegionalRouteAdapter::new(GyeonggiBusClient::new(bus).map_err(client_error)?)
        .with_retry(config.retry.clone());
    let busan = RegionalRouteAdapter::new(BusanBusClient::new(bus).map_err(client_error)?)
        .with_retry(config.retry.clone());

    let ports: Vec<Arc<dyn RegionalRoutePort>> =
        vec![Arc::new(seoul), Arc::new(gyeonggi), Arc::new(busan)];
    Ok(ports)
}

/// Build the route search service
///
/// # Errors
///
/// Returns an error if the configuration is invalid or an HTTP client
/// cannot be created.
pub fn build_route_search_service(config: &AppConfig) -> Result<RouteSearchService, ApplicationError> {
    config.validate().map_err(ApplicationError::Configuration)?;

    let regional = regional_ports(config)?;
    let national = NationalRouteAdapter::new(TagoBusClient::new(&config.bus).map_err(client_error)?)
        .with_retry(config.retry.clone());

    info!(
        regional = regional.len(),
        max_concurrency = config.search.max_concurrency,
        "Route search service ready"
    );
    Ok(RouteSearchService::new(
        regional,
        Arc::new(national),
        config.search.clone(),
    ))
}
