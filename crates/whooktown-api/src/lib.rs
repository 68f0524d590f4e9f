//! Async client SDK for the Whooktown smart-city platform.
//!
//! The platform exposes two JSON/REST services: an auth service (token
//! introspection) and a sensor service (sensor states, traffic states,
//! camera states, layouts, popup labels). [`WhooktownClient`] wraps both
//! behind one handle.
//!
//! Callers classify failures through the predicate methods on [`Error`]
//! (`is_unauthorized`, `is_network_error`, ...) rather than matching on
//! variants directly.

mod client;
mod environment;
mod error;
mod lookup;
mod models;

pub use client::{ClientConfig, WhooktownClient};
pub use environment::{Environment, ServiceUrls};
pub use error::Error;
pub use lookup::{SensorInfo, build_sensor_lookup};
pub use models::{
    Building, CameraState, Grid, LayoutData, LayoutDb, LayoutUpdate, SensorData, SensorState,
    TokenInfo, TrafficState,
};
