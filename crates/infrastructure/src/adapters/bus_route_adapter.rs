//! Bus route adapters - Implement the route ports using integration_bus
//!
//! Each adapter owns one provider client, retries calls that fail because
//! the upstream reported itself unavailable, and tags every error with the
//! provider it came from.

use application::error::ApplicationError;
use application::ports::{NationalRoutePort, RegionalRoutePort};
use async_trait::async_trait;
use domain::{Municipality, Provider, RouteDetail, RoutePath, RouteSummary, Stop};
use integration_bus::{BusApiError, NationalBusClient, RegionalBusClient};
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, retry};

/// Map an integration error to an application error for `provider`
pub fn map_error(provider: Provider, err: BusApiError) -> ApplicationError {
    match err {
        BusApiError::AuthKey(message) => ApplicationError::AuthKey { provider, message },
        BusApiError::RemoteProtocol(message) => {
            ApplicationError::RemoteProtocol { provider, message }
        },
        BusApiError::UpstreamUnavailable(message) => {
            ApplicationError::UpstreamUnavailable { provider, message }
        },
        e @ (BusApiError::ConnectionFailed(_)
        | BusApiError::RequestFailed(_)
        | BusApiError::Timeout { .. }) => ApplicationError::Transport {
            provider,
            message: e.to_string(),
        },
        BusApiError::ConfigurationError(message) => ApplicationError::Configuration(message),
    }
}

/// Adapter for a fixed-region provider
pub struct RegionalRouteAdapter<C> {
    client: C,
    retry: RetryConfig,
}

impl<C: RegionalBusClient> std::fmt::Debug for RegionalRouteAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionalRouteAdapter")
            .field("provider", &self.client.provider())
            .field("retry", &self.retry)
            .finish()
    }
}

impl<C: RegionalBusClient> RegionalRouteAdapter<C> {
    /// Wrap a client with the default retry policy
    pub fn new(client: C) -> Self {
        Self {
            client,
            retry: RetryConfig::default(),
        }
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn map_error(&self, err: BusApiError) -> ApplicationError {
        map_error(self.client.provider(), err)
    }
}

#[async_trait]
impl<C: RegionalBusClient> RegionalRoutePort for RegionalRouteAdapter<C> {
    fn provider(&self) -> Provider {
        self.client.provider()
    }

    #[instrument(skip(self, key), fields(provider = %self.client.provider()))]
    async fn search_routes(
        &self,
        key: &str,
        query: &str,
    ) -> Result<Vec<RouteSummary>, ApplicationError> {
        let routes = retry(&self.retry, || self.client.search_routes(key, query))
            .await
            .map_err(|e| self.map_error(e))?;
        debug!(count = routes.len(), "Routes found");
        Ok(routes)
    }

    #[instrument(skip(self, key, route), fields(provider = %self.client.provider(), route = %route.id))]
    async fn get_stops(
        &self,
        key: &str,
        route: &RouteSummary,
    ) -> Result<Vec<Stop>, ApplicationError> {
        retry(&self.retry, || self.client.get_stops(key, route))
            .await
            .map_err(|e| self.map_error(e))
    }

    #[instrument(skip(self, key, route), fields(provider = %self.client.provider(), route = %route.id))]
    async fn get_route_detail(
        &self,
        key: &str,
        route: &RouteSummary,
    ) -> Result<Option<RouteDetail>, ApplicationError> {
        retry(&self.retry, || self.client.get_route_detail(key, route))
            .await
            .map_err(|e| self.map_error(e))
    }

    #[instrument(skip(self, key, route), fields(provider = %self.client.provider(), route = %route.id))]
    async fn get_route_shape(
        &self,
        key: &str,
        route: &RouteSummary,
    ) -> Result<RoutePath, ApplicationError> {
        retry(&self.retry, || self.client.get_route_shape(key, route))
            .await
            .map_err(|e| self.map_error(e))
    }
}

/// Adapter for the nationwide provider
pub struct NationalRouteAdapter<C> {
    client: C,
    retry: RetryConfig,
}

impl<C> std::fmt::Debug for NationalRouteAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NationalRouteAdapter")
            .field("provider", &Provider::National)
            .field("retry", &self.retry)
            .finish()
    }
}

impl<C: NationalBusClient> NationalRouteAdapter<C> {
    /// Wrap a client with the default retry policy
    pub fn new(client: C) -> Self {
        Self {
            client,
            retry: RetryConfig::default(),
        }
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

fn national_error(err: BusApiError) -> ApplicationError {
    map_error(Provider::National, err)
}

#[async_trait]
impl<C: NationalBusClient> NationalRoutePort for NationalRouteAdapter<C> {
    #[instrument(skip(self, key))]
    async fn list_municipalities(&self, key: &str) -> Result<Vec<Municipality>, ApplicationError> {
        let listing = retry(&self.retry, || self.client.list_municipalities(key))
            .await
            .map_err(national_error)?;
        debug!(count = listing.len(), "Municipalities listed");
        Ok(listing)
    }

    #[instrument(skip(self, key))]
    async fn search_routes(
        &self,
        key: &str,
        municipality_code: &str,
        query: &str,
    ) -> Result<Vec<RouteSummary>, ApplicationError> {
        retry(&self.retry, || {
            self.client.search_routes(key, municipality_code, query)
        })
        .await
        .map_err(national_error)
    }

    #[instrument(skip(self, key))]
    async fn get_stops(
        &self,
        key: &str,
        municipality_code: &str,
        route_id: &str,
    ) -> Result<Vec<Stop>, ApplicationError> {
        retry(&self.retry, || {
            self.client.get_stops(key, municipality_code, route_id)
        })
        .await
        .map_err(national_error)
    }

    #[instrument(skip(self, key))]
    async fn get_route_detail(
        &self,
        key: &str,
        municipality_code: &str,
        route_id: &str,
    ) -> Result<Option<RouteDetail>, ApplicationError> {
        retry(&self.retry, || {
            self.client
                .get_route_detail(key, municipality_code, route_id)
        })
        .await
        .map_err(national_error)
    }

    #[instrument(skip(self, key))]
    async fn get_route_shape(
        &self,
        key: &str,
        municipality_code: &str,
        route_id: &str,
    ) -> Result<RoutePath, ApplicationError> {
        retry(&self.retry, || {
            self.client
                .get_route_shape(key, municipality_code, route_id)
        })
        .await
        .map_err(national_error)
    }
}
