//! Bus route provider ports
//!
//! Defines the interface the search service uses to reach the bus route
//! providers. Adapters in the infrastructure layer implement these ports and
//! translate provider errors into [`ApplicationError`].

use async_trait::async_trait;
use domain::{Municipality, Provider, RouteDetail, RoutePath, RouteSummary, Stop};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for a provider serving one fixed region
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RegionalRoutePort: Send + Sync {
    /// Provider behind this port
    fn provider(&self) -> Provider;

    /// Search routes by number
    async fn search_routes(
        &self,
        key: &str,
        query: &str,
    ) -> Result<Vec<RouteSummary>, ApplicationError>;

    /// Ordered stops of a route
    async fn get_stops(
        &self,
        key: &str,
        route: &RouteSummary,
    ) -> Result<Vec<Stop>, ApplicationError>;

    /// Route detail, `None` when the provider has no record
    async fn get_route_detail(
        &self,
        key: &str,
        route: &RouteSummary,
    ) -> Result<Option<RouteDetail>, ApplicationError>;

    /// Route polyline
    async fn get_route_shape(
        &self,
        key: &str,
        route: &RouteSummary,
    ) -> Result<RoutePath, ApplicationError>;
}

/// Port for the nationwide provider, addressed per municipality
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NationalRoutePort: Send + Sync {
    /// Every municipality the provider covers
    async fn list_municipalities(&self, key: &str) -> Result<Vec<Municipality>, ApplicationError>;

    /// Search one municipality by route number
    async fn search_routes(
        &self,
        key: &str,
        municipality_code: &str,
        query: &str,
    ) -> Result<Vec<RouteSummary>, ApplicationError>;

    /// Ordered stops of a route
    async fn get_stops(
        &self,
        key: &str,
        municipality_code: &str,
        route_id: &str,
    ) -> Result<Vec<Stop>, ApplicationError>;

    /// Route detail, `None` when the provider has no record
    async fn get_route_detail(
        &self,
        key: &str,
        municipality_code: &str,
        route_id: &str,
    ) -> Result<Option<RouteDetail>, ApplicationError>;

    /// Route polyline
    async fn get_route_shape(
        &self,
        key: &str,
        municipality_code: &str,
        route_id: &str,
    ) -> Result<RoutePath, ApplicationError>;
}
