// wems-api: Async Rust client for the WAGO WEMS energy-management API
//
// The WEMS cloud exposes a four-level resource hierarchy
// (endpoint -> appliance -> service -> data point) plus per-data-point
// time series. This crate covers token acquisition and caching, the
// series fetch, and the resource discovery endpoints the dashboard's
// cascading dropdowns are built from.

pub mod client;
pub mod error;
pub mod models;
pub mod resources;
pub mod series;
pub mod token;
pub mod transport;

pub use client::WemsClient;
pub use error::Error;
pub use models::{RawResponse, ResourceNode, ServiceNode};
pub use series::{SeriesQuery, TimeSeries};
pub use token::TokenManager;
pub use transport::TransportConfig;
