//! Value Objects - Immutable, identity-less domain primitives

mod position;
mod provider;
mod route_category;
mod route_id;

pub use position::Position;
pub use provider::Provider;
pub use route_category::RouteCategory;
pub use route_id::{DecodedRouteId, RouteId, RouteIdCodec};
