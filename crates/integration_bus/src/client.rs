//! Client traits
//!
//! Fixed-region providers each serve one area and hand out opaque route ids.
//! The national provider serves many municipalities through one service and
//! is addressed per municipality.

use async_trait::async_trait;
use domain::{Municipality, Provider, RouteDetail, RoutePath, RouteSummary, Stop};

use crate::error::BusApiError;

/// Client for a provider serving one fixed region
#[async_trait]
pub trait RegionalBusClient: Send + Sync {
    /// Provider this client talks to
    fn provider(&self) -> Provider;

    /// Search routes whose number matches `query`
    async fn search_routes(&self, key: &str, query: &str) -> Result<Vec<RouteSummary>, BusApiError>;

    /// Ordered stops of a route from this provider
    async fn get_stops(&self, key: &str, route: &RouteSummary) -> Result<Vec<Stop>, BusApiError>;

    /// Route detail; `None` when the provider has no record of it
    async fn get_route_detail(
        &self,
        key: &str,
        route: &RouteSummary,
    ) -> Result<Option<RouteDetail>, BusApiError>;

    /// Polyline of a route
    async fn get_route_shape(&self, key: &str, route: &RouteSummary) -> Result<RoutePath, BusApiError>;
}

/// Client for the nationwide multi-municipality provider
#[async_trait]
pub trait NationalBusClient: Send + Sync {
    /// List every municipality (city code and name) the service covers
    async fn list_municipalities(&self, key: &str) -> Result<Vec<Municipality>, BusApiError>;

    /// Search one municipality; ids come back in composite form
    async fn search_routes(
        &self,
        key: &str,
        municipality_code: &str,
        query: &str,
    ) -> Result<Vec<RouteSummary>, BusApiError>;

    /// Ordered stops of a route in one municipality
    async fn get_stops(
        &self,
        key: &str,
        municipality_code: &str,
        route_id: &str,
    ) -> Result<Vec<Stop>, BusApiError>;

    /// Route detail; `None` when the provider has no record of it
    async fn get_route_detail(
        &self,
        key: &str,
        municipality_code: &str,
        route_id: &str,
    ) -> Result<Option<RouteDetail>, BusApiError>;

    /// Polyline of a route in one municipality
    async fn get_route_shape(
        &self,
        key: &str,
        municipality_code: &str,
        route_id: &str,
    ) -> Result<RoutePath, BusApiError>;
}
