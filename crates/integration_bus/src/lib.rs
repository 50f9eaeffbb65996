//! Bus route provider integration
//!
//! Clients for the Korean bus route services: Seoul (`ws.bus.go.kr`),
//! Gyeonggi (v2), Busan (BIMS open API plus the legacy BIMS site) and the
//! nationwide TAGO service that covers every other municipality.
//!
//! # Architecture
//!
//! Fixed-region providers implement [`RegionalBusClient`]; the nationwide
//! service implements [`NationalBusClient`], addressed per municipality.
//! Every client decodes its XML payloads with `quick-xml` and classifies its
//! result codes into [`BusApiError`] before anything leaves this crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_bus::{BusApiConfig, RegionalBusClient, SeoulBusClient};
//!
//! let config = BusApiConfig::default();
//! let client = SeoulBusClient::new(&config)?;
//!
//! let routes = client.search_routes(&service_key, "6").await?;
//! ```

mod busan;
mod busan_bims;
mod category;
mod client;
mod config;
mod error;
mod gyeonggi;
mod http;
mod paginator;
mod seoul;
mod tago;

pub use busan::BusanBusClient;
pub use busan_bims::{BimsLineListing, BimsRouteShape, BusanBimsClient};
pub use category::{busan_category, tago_category};
pub use client::{NationalBusClient, RegionalBusClient};
pub use config::BusApiConfig;
pub use error::BusApiError;
pub use gyeonggi::GyeonggiBusClient;
pub use paginator::{Page, Paginator};
pub use seoul::SeoulBusClient;
pub use tago::TagoBusClient;
