//! Building-id to display-name lookup, derived from layout documents.
//!
//! Sensors are keyed by building UUID, so listing views scan every
//! layout's building array to decorate rows with human-readable names.
//! The map is ephemeral and rebuilt in full on each refresh.

use std::collections::HashMap;

use crate::models::LayoutDb;

/// Display names for the building a sensor is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorInfo {
    pub layout_name: String,
    pub building_name: String,
}

/// Scan all layouts and map each building id to its display names.
///
/// A layout without a name falls back to its id; a building without a
/// name gets a dash placeholder. Later layouts overwrite earlier ones on
/// duplicate building ids.
pub fn build_sensor_lookup(layouts: &[LayoutDb]) -> HashMap<String, SensorInfo> {
    let mut map = HashMap::new();
    for layout in layouts {
        let layout_name = layout
            .data
            .name
            .clone()
            .unwrap_or_else(|| layout.layout_id.clone());
        let Some(buildings) = &layout.data.buildings else {
            continue;
        };
        for building in buildings {
            map.insert(
                building.id.clone(),
                SensorInfo {
                    layout_name: layout_name.clone(),
                    building_name: building.name.clone().unwrap_or_else(|| "-".into()),
                },
            );
        }
    }
    map
}
