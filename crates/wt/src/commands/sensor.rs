//! `wt sensor` -- send sensor data and list sensor states.

use chrono::{DateTime, Local, Utc};
use serde_json::{Map, Value, json};
use tracing::debug;
use whooktown_api::{SensorInfo, build_sensor_lookup};
use whooktown_config::ConfigStore;

use crate::cli::{OutputFormat, SensorCommand};
use crate::client::create_client;
use crate::error::CliError;
use crate::output;

pub async fn handle(command: SensorCommand, store: &ConfigStore) -> Result<(), CliError> {
    match command {
        SensorCommand::Send {
            id,
            name,
            status,
            activity,
            json,
            quiet,
        } => {
            let payload = build_payload(
                &id,
                name.as_deref(),
                status.map(|s| s.as_str()),
                activity.map(|a| a.as_str()),
                json.as_deref(),
            )?;

            let client = create_client(store)?;
            client.send_sensor_data(&payload).await?;

            if !quiet {
                output::success(&format!("Sent data for sensor: {id}"));
            }
            Ok(())
        }
        SensorCommand::List { format } => list(format, store).await,
    }
}

// ── Send ─────────────────────────────────────────────────────────────

/// Assemble the update payload from flags plus optional inline JSON.
///
/// Enum values arrive pre-validated and lowercased from clap. Inline
/// JSON must be an object, and its keys may not collide with a
/// flag-provided field; silent overwrites are rejected.
fn build_payload(
    id: &str,
    name: Option<&str>,
    status: Option<&str>,
    activity: Option<&str>,
    extra_json: Option<&str>,
) -> Result<Map<String, Value>, CliError> {
    let mut payload = Map::new();
    payload.insert("id".into(), json!(id));
    if let Some(name) = name {
        payload.insert("name".into(), json!(name));
    }
    if let Some(status) = status {
        payload.insert("status".into(), json!(status));
    }
    if let Some(activity) = activity {
        payload.insert("activity".into(), json!(activity));
    }

    if let Some(raw) = extra_json {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| CliError::validation_with_hint("Invalid JSON in --json option", e.to_string()))?;
        let Value::Object(extra) = value else {
            return Err(CliError::validation_with_hint(
                "Invalid JSON in --json option",
                "The value must be a JSON object, e.g. '{\"cpuUsage\": 75}'",
            ));
        };
        for (key, value) in extra {
            if payload.contains_key(&key) {
                return Err(CliError::validation_with_hint(
                    format!("JSON field \"{key}\" collides with a flag-provided field"),
                    "Remove the field from --json or drop the corresponding flag",
                ));
            }
            payload.insert(key, value);
        }
    }

    Ok(payload)
}

// ── List ─────────────────────────────────────────────────────────────

async fn list(format: OutputFormat, store: &ConfigStore) -> Result<(), CliError> {
    let client = create_client(store)?;
    let sensors = client.sensor_states().await?;

    // Best-effort enrichment with building/layout names; a token without
    // layout read permission still gets the unlabeled listing.
    let lookup = match client.layouts().await {
        Ok(layouts) => build_sensor_lookup(&layouts),
        Err(e) => {
            debug!("layout fetch for enrichment failed: {e}");
            output::warn("Could not fetch layouts (token may lack layout permission)");
            std::collections::HashMap::new()
        }
    };

    if format == OutputFormat::Json {
        let enriched: Vec<Value> = sensors
            .iter()
            .map(|s| {
                let info = lookup.get(&s.id);
                let mut value = serde_json::to_value(s).unwrap_or(Value::Null);
                if let Value::Object(map) = &mut value {
                    map.insert(
                        "buildingName".into(),
                        info.map_or(Value::Null, |i| json!(i.building_name)),
                    );
                    map.insert(
                        "layoutName".into(),
                        info.map_or(Value::Null, |i| json!(i.layout_name)),
                    );
                }
                value
            })
            .collect();
        println!("{}", output::format_json(&enriched));
        return Ok(());
    }

    let headers = ["ID", "Name", "Layout", "Status", "Activity", "Updated"];
    let rows: Vec<Vec<String>> = sensors
        .iter()
        .map(|s| {
            let info: Option<&SensorInfo> = lookup.get(&s.id);
            vec![
                s.id.clone(),
                info.map_or_else(|| "-".into(), |i| i.building_name.clone()),
                info.map_or_else(|| "-".into(), |i| i.layout_name.clone()),
                output::format_status(s.data.status.as_deref().unwrap_or("")),
                output::format_pace(s.data.activity.as_deref().unwrap_or("")),
                s.received_at.map_or_else(|| "-".into(), format_timestamp),
            ]
        })
        .collect();

    println!("{}", output::format_table(&headers, &rows));
    println!("\n{} sensor(s)", sensors.len());
    Ok(())
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn payload_contains_only_provided_fields() {
        let payload = build_payload("s1", None, Some("online"), None, None).unwrap();
        assert_eq!(payload.get("id"), Some(&json!("s1")));
        assert_eq!(payload.get("status"), Some(&json!("online")));
        assert!(!payload.contains_key("name"));
        assert!(!payload.contains_key("activity"));
    }

    #[test]
    fn extra_json_merges_over_base_fields() {
        let payload =
            build_payload("s1", Some("web-01"), None, None, Some(r#"{"cpuUsage": 75}"#)).unwrap();
        assert_eq!(payload.get("name"), Some(&json!("web-01")));
        assert_eq!(payload.get("cpuUsage"), Some(&json!(75)));
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        let err = build_payload("s1", None, None, None, Some("{broken")).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn non_object_json_is_rejected() {
        let err = build_payload("s1", None, None, None, Some("[1, 2]")).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn colliding_json_key_is_rejected() {
        let err =
            build_payload("s1", None, Some("online"), None, Some(r#"{"status": "offline"}"#))
                .unwrap_err();
        let CliError::Validation { message, .. } = err else {
            panic!("expected validation error");
        };
        assert!(message.contains("status"), "message was: {message}");
    }

    #[test]
    fn id_collision_from_json_is_rejected() {
        let err = build_payload("s1", None, None, None, Some(r#"{"id": "other"}"#)).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }
}
