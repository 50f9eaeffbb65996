//! Application services - Use case implementations

mod municipality_directory;
mod municipality_names;
mod relevance_ranker;
mod route_search_service;

pub use municipality_directory::{
    EXCLUDED_CODE, EXCLUDED_CODE_PREFIX, EXCLUDED_NAMES, MunicipalityDirectory,
};
pub use municipality_names::builtin_name;
pub use relevance_ranker::{MatchScore, match_score, rank_routes};
pub use route_search_service::{RouteSearchConfig, RouteSearchService, SearchOutcome};
