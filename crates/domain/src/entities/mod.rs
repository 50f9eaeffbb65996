//! Domain entities - normalized records produced by provider adapters

mod municipality;
mod route;
mod route_path;
mod stop;

pub use municipality::Municipality;
pub use route::{RouteDetail, RouteSummary};
pub use route_path::{BoundingBox, RoutePath};
pub use stop::Stop;
