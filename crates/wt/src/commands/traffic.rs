//! `wt traffic` -- per-layout traffic control.

use whooktown_api::TrafficState;
use whooktown_config::ConfigStore;

use crate::cli::{OutputFormat, PaceValue, TrafficCommand};
use crate::client::create_client;
use crate::error::CliError;
use crate::output;

pub async fn handle(command: TrafficCommand, store: &ConfigStore) -> Result<(), CliError> {
    match command {
        TrafficCommand::Set {
            layout_id,
            density,
            speed,
            enabled,
            disabled,
        } => set(store, &layout_id, density, speed, enabled, disabled).await,
        TrafficCommand::List { format } => list(format, store).await,
    }
}

// ── Set ──────────────────────────────────────────────────────────────

async fn set(
    store: &ConfigStore,
    layout_id: &str,
    density: Option<u8>,
    speed: Option<PaceValue>,
    enabled: bool,
    disabled: bool,
) -> Result<(), CliError> {
    if density.is_none() && speed.is_none() && !enabled && !disabled {
        return Err(CliError::validation_with_hint(
            "At least one option is required",
            "Use: --density, --speed, --enabled, or --disabled",
        ));
    }

    // Read-modify-write: fetch the current state first so unspecified
    // fields are preserved rather than overwritten with defaults.
    let client = create_client(store)?;
    let states = client.traffic_states().await?;
    let current = states.iter().find(|s| s.layout_id == layout_id);

    let next = merge_traffic(current, layout_id, density, speed, enabled, disabled);
    client.set_traffic_state(&next).await?;

    output::success("Traffic updated");
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    output::detail(&format!("Density: {}%", next.density.round() as u32));
    output::detail(&format!("Speed: {}", next.speed));
    output::detail(&format!("Enabled: {}", next.enabled));
    Ok(())
}

/// Merge requested changes onto the current state for the layout.
///
/// Fields without a current state fall back to density 50, speed
/// "normal", enabled true.
fn merge_traffic(
    current: Option<&TrafficState>,
    layout_id: &str,
    density: Option<u8>,
    speed: Option<PaceValue>,
    enabled: bool,
    disabled: bool,
) -> TrafficState {
    let mut next = TrafficState {
        layout_id: layout_id.to_owned(),
        density: current.map_or(50.0, |c| c.density),
        speed: current.map_or_else(|| "normal".into(), |c| c.speed.clone()),
        enabled: current.is_none_or(|c| c.enabled),
    };

    if let Some(density) = density {
        next.density = f64::from(density);
    }
    if let Some(speed) = speed {
        next.speed = speed.as_str().to_owned();
    }
    if enabled {
        next.enabled = true;
    } else if disabled {
        next.enabled = false;
    }

    next
}

// ── List ─────────────────────────────────────────────────────────────

async fn list(format: OutputFormat, store: &ConfigStore) -> Result<(), CliError> {
    let client = create_client(store)?;
    let states = client.traffic_states().await?;

    if format == OutputFormat::Json {
        println!("{}", output::format_json(&states));
        return Ok(());
    }

    let headers = ["Layout ID", "Density", "Speed", "Enabled"];
    let rows: Vec<Vec<String>> = states
        .iter()
        .map(|s| {
            vec![
                output::truncate(&s.layout_id, 20),
                output::format_density(s.density),
                output::format_pace(&s.speed),
                output::format_enabled(s.enabled),
            ]
        })
        .collect();

    println!("{}", output::format_table(&headers, &rows));
    println!("\n{} layout(s)", states.len());
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn current() -> TrafficState {
        TrafficState {
            layout_id: "l1".into(),
            density: 50.0,
            speed: "fast".into(),
            enabled: true,
        }
    }

    #[test]
    fn unspecified_fields_are_preserved_from_current_state() {
        let next = merge_traffic(Some(&current()), "l1", Some(70), None, false, false);
        assert_eq!(next.density, 70.0);
        assert_eq!(next.speed, "fast");
        assert!(next.enabled);
    }

    #[test]
    fn missing_current_state_uses_defaults() {
        let next = merge_traffic(None, "l2", None, Some(PaceValue::Slow), false, false);
        assert_eq!(next.layout_id, "l2");
        assert_eq!(next.density, 50.0);
        assert_eq!(next.speed, "slow");
        assert!(next.enabled);
    }

    #[test]
    fn disabled_flag_turns_traffic_off() {
        let next = merge_traffic(Some(&current()), "l1", None, None, false, true);
        assert!(!next.enabled);
        assert_eq!(next.density, 50.0);
    }
}
