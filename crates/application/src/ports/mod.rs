//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod bus_route_port;

#[cfg(test)]
pub use bus_route_port::{MockNationalRoutePort, MockRegionalRoutePort};
pub use bus_route_port::{NationalRoutePort, RegionalRoutePort};
