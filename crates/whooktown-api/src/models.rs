//! Typed models for the platform's JSON resources.
//!
//! All of these are transient projections of remote state; the platform
//! owns the data and this crate only reads it (plus whole-document layout
//! writes, see [`LayoutUpdate`]).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of token introspection on the auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    /// Token type. The CLI only accepts `"sensor"`.
    #[serde(rename = "type")]
    pub token_type: String,

    /// Role grants per service, e.g. `{"sensor": "rw"}`.
    #[serde(default)]
    pub roles: HashMap<String, String>,

    /// Account the token belongs to.
    #[serde(default)]
    pub account_id: Option<String>,
}

/// Well-known fields of a sensor's data blob, plus whatever free-form
/// fields the sender attached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `online`, `offline`, `warning`, or `critical`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// `slow`, `normal`, or `fast`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Last-known state of one sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorState {
    pub id: String,

    #[serde(default)]
    pub data: SensorData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
}

/// Per-layout traffic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficState {
    pub layout_id: String,

    /// Density percentage in `[0, 100]`.
    #[serde(default)]
    pub density: f64,

    /// `slow`, `normal`, or `fast`.
    #[serde(default)]
    pub speed: String,

    #[serde(default)]
    pub enabled: bool,
}

/// Per-layout camera configuration (read-only from this SDK).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraState {
    pub layout_id: String,

    /// `orbit`, `fps`, or `flyover`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flyover_speed: Option<f64>,
}

/// Grid dimensions of a layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Grid {
    pub width: u32,
    pub height: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
        }
    }
}

/// A building inside a layout, addressable by UUID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", default)]
    pub building_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of a layout document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildings: Option<Vec<Building>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roads: Option<serde_json::Value>,
}

/// A layout document as stored by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDb {
    pub layout_id: String,

    #[serde(default)]
    pub data: LayoutData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
}

/// Full-document replacement payload for a layout.
///
/// The platform has no partial-building-update endpoint, so any building
/// edit must re-submit the entire enclosing layout.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutUpdate {
    pub id: String,
    pub name: String,
    pub grid: Grid,
    pub buildings: Vec<Building>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub roads: Option<serde_json::Value>,
}
