//! Route search service
//!
//! Searches every provider for a route number and returns one ranked list.
//! The fixed-region providers are searched one after another; the national
//! provider is searched once per municipality on a bounded pool of tasks.
//! Provider failures do not abort a search. A rejected service key stops
//! the fan-out.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use domain::{
    DecodedRouteId, DomainError, Municipality, Provider, RouteDetail, RouteIdCodec, RoutePath,
    RouteSummary, Stop,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{NationalRoutePort, RegionalRoutePort};
use crate::services::municipality_directory::MunicipalityDirectory;
use crate::services::relevance_ranker::rank_routes;

/// Default number of municipalities searched at once
const DEFAULT_MAX_CONCURRENCY: usize = 15;

/// Configuration for the route search fan-out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSearchConfig {
    /// Maximum number of concurrent municipality searches (default: 15)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

const fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

impl Default for RouteSearchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl RouteSearchConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the concurrency ceiling is zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("search.max_concurrency must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Ranked routes plus the last error observed while collecting them
#[derive(Debug, Default)]
pub struct SearchOutcome {
    /// Routes, most relevant first
    pub routes: Vec<RouteSummary>,
    /// Last error observed, if any
    pub error: Option<ApplicationError>,
}

impl SearchOutcome {
    /// Returns true if the search was cut short by a rejected service key
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        self.error.as_ref().is_some_and(ApplicationError::is_auth_error)
    }
}

/// Where a detail request for a route goes
enum Target<'a> {
    Regional(&'a dyn RegionalRoutePort),
    National {
        municipality_code: &'a str,
        route_id: &'a str,
    },
}

/// Outcome of one municipality task
type MunicipalityResult = (Municipality, Result<Vec<RouteSummary>, ApplicationError>);

/// Aggregates route searches and detail requests across providers
pub struct RouteSearchService {
    regional: Vec<Arc<dyn RegionalRoutePort>>,
    national: Arc<dyn NationalRoutePort>,
    directory: MunicipalityDirectory,
    codec: RouteIdCodec,
    config: RouteSearchConfig,
}

impl fmt::Debug for RouteSearchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let providers: Vec<Provider> = self.regional.iter().map(|p| p.provider()).collect();
        f.debug_struct("RouteSearchService")
            .field("regional", &providers)
            .field("national", &"<NationalRoutePort>")
            .field("directory", &self.directory)
            .field("config", &self.config)
            .finish()
    }
}

impl RouteSearchService {
    /// Create a search service
    ///
    /// `regional` ports are searched in the order given.
    #[must_use]
    pub fn new(
        regional: Vec<Arc<dyn RegionalRoutePort>>,
        national: Arc<dyn NationalRoutePort>,
        config: RouteSearchConfig,
    ) -> Self {
        let codec = RouteIdCodec::national();
        Self {
            regional,
            national,
            directory: MunicipalityDirectory::with_codec(codec),
            codec,
            config,
        }
    }

    /// Use an existing directory (and its name cache)
    #[must_use]
    pub fn with_directory(mut self, directory: MunicipalityDirectory) -> Self {
        self.directory = directory;
        self
    }

    /// Directory used for worklists and region labels
    #[must_use]
    pub const fn directory(&self) -> &MunicipalityDirectory {
        &self.directory
    }

    /// Search every provider for routes matching `query`
    ///
    /// Never fails as a whole: the outcome carries whatever routes were
    /// collected, ranked, and the last error observed.
    #[instrument(skip(self, key))]
    pub async fn search_routes(&self, key: &str, query: &str) -> SearchOutcome {
        let mut routes = Vec::new();
        let mut last_error = None;

        for port in &self.regional {
            match port.search_routes(key, query).await {
                Ok(found) => {
                    debug!(provider = %port.provider(), count = found.len(), "Regional search done");
                    routes.extend(found);
                },
                Err(e) => {
                    warn!(provider = %port.provider(), error = %e, "Regional search failed");
                    last_error = Some(e);
                },
            }
        }

        match self.directory.worklist(self.national.as_ref(), key).await {
            Ok(worklist) => {
                if let Some(e) = self.fan_out(key, query, worklist, &mut routes).await {
                    last_error = Some(e);
                }
            },
            Err(e) => {
                warn!(error = %e, "Municipality listing failed");
                last_error = Some(e);
            },
        }

        rank_routes(&mut routes, query, |route| self.directory.region_label(route));

        info!(
            count = routes.len(),
            failed = last_error.is_some(),
            "Route search finished"
        );
        SearchOutcome {
            routes,
            error: last_error,
        }
    }

    /// Search every municipality of the worklist concurrently
    ///
    /// Returns the key rejection that stopped the fan-out, if one did.
    /// Tasks still running at that point are detached, not awaited.
    async fn fan_out(
        &self,
        key: &str,
        query: &str,
        worklist: Vec<Municipality>,
        routes: &mut Vec<RouteSummary>,
    ) -> Option<ApplicationError> {
        let key: Arc<str> = Arc::from(key);
        let query: Arc<str> = Arc::from(query);
        let permits = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let cancelled = Arc::new(AtomicBool::new(false));
        let dispatched = worklist.len();

        let mut tasks: JoinSet<Option<MunicipalityResult>> = JoinSet::new();
        for municipality in worklist {
            let port = Arc::clone(&self.national);
            let permits = Arc::clone(&permits);
            let cancelled = Arc::clone(&cancelled);
            let key = Arc::clone(&key);
            let query = Arc::clone(&query);

            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await.ok()?;
                if cancelled.load(Ordering::Acquire) {
                    return None;
                }

                let result = port.search_routes(&key, &municipality.code, &query).await;
                if result.as_ref().is_err_and(ApplicationError::is_auth_error) {
                    cancelled.store(true, Ordering::Release);
                }
                Some((municipality, result))
            });
        }

        let mut completed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some((_, Ok(found)))) => {
                    completed += 1;
                    routes.extend(found);
                },
                Ok(Some((municipality, Err(e)))) if e.is_auth_error() => {
                    warn!(code = %municipality.code, error = %e, "Service key rejected, stopping fan-out");
                    cancelled.store(true, Ordering::Release);
                    tasks.detach_all();
                    return Some(e);
                },
                Ok(Some((municipality, Err(e)))) => {
                    completed += 1;
                    warn!(
                        code = %municipality.code,
                        name = %municipality.name,
                        error = %e,
                        "Municipality search failed"
                    );
                },
                Ok(None) => {},
                Err(e) => warn!(error = %e, "Municipality search task failed"),
            }
        }

        debug!(dispatched, completed, "Fan-out done");
        None
    }

    /// Ordered stops of a route found by [`Self::search_routes`]
    ///
    /// # Errors
    ///
    /// Returns an error if the route id is malformed, no adapter serves the
    /// route's provider, or the provider request fails.
    #[instrument(skip(self, key, route), fields(route = %route.id))]
    pub async fn get_stops(
        &self,
        key: &str,
        route: &RouteSummary,
    ) -> Result<Vec<Stop>, ApplicationError> {
        match self.resolve(route)? {
            Target::Regional(port) => port.get_stops(key, route).await,
            Target::National {
                municipality_code,
                route_id,
            } => {
                self.national
                    .get_stops(key, municipality_code, route_id)
                    .await
            },
        }
    }

    /// Route detail, `None` when the provider has no record
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::get_stops`].
    #[instrument(skip(self, key, route), fields(route = %route.id))]
    pub async fn get_route_detail(
        &self,
        key: &str,
        route: &RouteSummary,
    ) -> Result<Option<RouteDetail>, ApplicationError> {
        match self.resolve(route)? {
            Target::Regional(port) => port.get_route_detail(key, route).await,
            Target::National {
                municipality_code,
                route_id,
            } => {
                self.national
                    .get_route_detail(key, municipality_code, route_id)
                    .await
            },
        }
    }

    /// Route polyline
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::get_stops`].
    #[instrument(skip(self, key, route), fields(route = %route.id))]
    pub async fn get_route_shape(
        &self,
        key: &str,
        route: &RouteSummary,
    ) -> Result<RoutePath, ApplicationError> {
        match self.resolve(route)? {
            Target::Regional(port) => port.get_route_shape(key, route).await,
            Target::National {
                municipality_code,
                route_id,
            } => {
                self.national
                    .get_route_shape(key, municipality_code, route_id)
                    .await
            },
        }
    }

    fn resolve<'a>(&'a self, route: &'a RouteSummary) -> Result<Target<'a>, ApplicationError> {
        match self.codec.decode(&route.id)? {
            DecodedRouteId::National {
                municipality_code,
                native_id,
            } => Ok(Target::National {
                municipality_code,
                route_id: native_id,
            }),
            // National routes always carry a composite id
            DecodedRouteId::FixedRegion(raw) if !route.provider.is_fixed_region() => {
                Err(DomainError::malformed(raw).into())
            },
            DecodedRouteId::FixedRegion(_) => self
                .regional
                .iter()
                .find(|port| port.provider() == route.provider)
                .map(|port| Target::Regional(port.as_ref()))
                .ok_or_else(|| {
                    ApplicationError::Configuration(format!(
                        "no adapter registered for {}",
                        route.provider
                    ))
                }),
        }
    }
}
