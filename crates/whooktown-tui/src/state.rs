//! Dashboard state machine, decoupled from terminal rendering.
//!
//! The event loop feeds [`Msg`] values into [`DashState::apply`]; rendering
//! is a pure function of the resulting state. Overlapping refreshes are
//! allowed and resolved by completion order: the last outcome applied wins.

use std::collections::HashMap;

use chrono::{DateTime, Local};
use whooktown_api::{CameraState, SensorInfo, SensorState, TrafficState};

/// The three mutually exclusive content panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Sensors,
    Camera,
    Traffic,
}

/// Result of one refresh cycle.
#[derive(Debug)]
pub enum FetchOutcome {
    /// All three main fetches succeeded. The lookup is best-effort and
    /// empty when layouts could not be read.
    Loaded {
        sensors: Vec<SensorState>,
        camera_states: Vec<CameraState>,
        traffic_states: Vec<TrafficState>,
        lookup: HashMap<String, SensorInfo>,
        completed_at: DateTime<Local>,
    },
    /// Any main fetch failed; previously loaded data stays visible.
    Failed { message: String },
}

/// Inputs to the state machine.
#[derive(Debug)]
pub enum Msg {
    /// A refresh cycle began (timer tick, manual refresh, or mount).
    FetchStarted,
    /// A refresh cycle finished.
    FetchCompleted(Box<FetchOutcome>),
    /// The user selected a panel; no re-fetch.
    PanelSelected(Panel),
    /// The user asked to leave the dashboard.
    Quit,
}

/// Complete dashboard state.
#[derive(Debug, Default)]
pub struct DashState {
    pub panel: Panel,
    pub loading: bool,
    pub error: Option<String>,
    pub last_refresh: Option<DateTime<Local>>,
    pub sensors: Vec<SensorState>,
    pub camera_states: Vec<CameraState>,
    pub traffic_states: Vec<TrafficState>,
    pub lookup: HashMap<String, SensorInfo>,
    pub should_quit: bool,
}

impl DashState {
    /// Initial state: sensors panel, loading, no data.
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Pure state transition.
    pub fn apply(&mut self, msg: Msg) {
        match msg {
            Msg::FetchStarted => {
                self.loading = true;
                self.error = None;
            }
            Msg::FetchCompleted(outcome) => {
                self.loading = false;
                match *outcome {
                    FetchOutcome::Loaded {
                        sensors,
                        camera_states,
                        traffic_states,
                        lookup,
                        completed_at,
                    } => {
                        self.sensors = sensors;
                        self.camera_states = camera_states;
                        self.traffic_states = traffic_states;
                        self.lookup = lookup;
                        self.last_refresh = Some(completed_at);
                        self.error = None;
                    }
                    FetchOutcome::Failed { message } => {
                        self.error = Some(message);
                    }
                }
            }
            Msg::PanelSelected(panel) => self.panel = panel,
            Msg::Quit => self.should_quit = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn loaded(sensor_id: &str) -> Msg {
        Msg::FetchCompleted(Box::new(FetchOutcome::Loaded {
            sensors: vec![SensorState {
                id: sensor_id.into(),
                data: whooktown_api::SensorData::default(),
                received_at: None,
            }],
            camera_states: vec![],
            traffic_states: vec![],
            lookup: HashMap::new(),
            completed_at: Local::now(),
        }))
    }

    #[test]
    fn initial_state_is_loading_sensors_panel() {
        let state = DashState::new();
        assert_eq!(state.panel, Panel::Sensors);
        assert!(state.loading);
        assert!(state.sensors.is_empty());
        assert!(state.last_refresh.is_none());
    }

    #[test]
    fn panel_switch_does_not_touch_data_or_loading() {
        let mut state = DashState::new();
        state.apply(loaded("s1"));
        state.apply(Msg::PanelSelected(Panel::Traffic));

        assert_eq!(state.panel, Panel::Traffic);
        assert!(!state.loading);
        assert_eq!(state.sensors.len(), 1);
    }

    #[test]
    fn failure_keeps_previous_data_visible() {
        let mut state = DashState::new();
        state.apply(loaded("s1"));
        state.apply(Msg::FetchStarted);
        state.apply(Msg::FetchCompleted(Box::new(FetchOutcome::Failed {
            message: "boom".into(),
        })));

        assert_eq!(state.error.as_deref(), Some("boom"));
        assert!(!state.loading);
        assert_eq!(state.sensors[0].id, "s1");
    }

    #[test]
    fn success_clears_a_previous_error() {
        let mut state = DashState::new();
        state.apply(Msg::FetchCompleted(Box::new(FetchOutcome::Failed {
            message: "boom".into(),
        })));
        state.apply(loaded("s1"));
        assert_eq!(state.error, None);
        assert!(state.last_refresh.is_some());
    }

    #[test]
    fn overlapping_refreshes_resolve_by_completion_order() {
        let mut state = DashState::new();
        // Two cycles started, completions arrive out of request order.
        state.apply(Msg::FetchStarted);
        state.apply(Msg::FetchStarted);
        state.apply(loaded("from-second"));
        state.apply(loaded("from-first"));
        // Last completion wins, whichever cycle it belonged to.
        assert_eq!(state.sensors[0].id, "from-first");
    }

    #[test]
    fn quit_flags_shutdown() {
        let mut state = DashState::new();
        state.apply(Msg::Quit);
        assert!(state.should_quit);
    }
}
