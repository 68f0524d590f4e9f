//! Dashboard event loop: terminal events in, state transitions, render.
//!
//! Refreshes run as spawned tasks reporting back over a channel, so a
//! manual refresh can overlap an in-flight timer refresh. Outcomes are
//! applied in completion order; the state machine documents that the
//! last completion wins.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::debug;
use whooktown_api::{WhooktownClient, build_sensor_lookup};

use crate::event::{Event, EventReader};
use crate::panels;
use crate::state::{DashState, FetchOutcome, Msg, Panel};
use crate::tui::Tui;

pub struct App {
    client: WhooktownClient,
    refresh_interval: Duration,
    state: DashState,
}

impl App {
    pub fn new(client: WhooktownClient, refresh_interval: Duration) -> Self {
        Self {
            client,
            refresh_interval,
            state: DashState::new(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::new(self.refresh_interval);
        let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel::<FetchOutcome>();

        // Initial fetch on mount.
        self.start_fetch(&fetch_tx);

        loop {
            tui.draw(|frame| panels::render(frame, &self.state))?;

            tokio::select! {
                Some(event) = events.next() => match event {
                    Event::Tick => self.start_fetch(&fetch_tx),
                    Event::Key(key) => self.handle_key(key, &fetch_tx),
                    Event::Resize => {}
                },
                Some(outcome) = fetch_rx.recv() => {
                    self.state.apply(Msg::FetchCompleted(Box::new(outcome)));
                }
                else => break,
            }

            if self.state.should_quit {
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, fetch_tx: &mpsc::UnboundedSender<FetchOutcome>) {
        match key.code {
            KeyCode::Char('q') => self.state.apply(Msg::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.apply(Msg::Quit);
            }
            KeyCode::Char('1') => self.state.apply(Msg::PanelSelected(Panel::Sensors)),
            KeyCode::Char('2') => self.state.apply(Msg::PanelSelected(Panel::Camera)),
            KeyCode::Char('3') => self.state.apply(Msg::PanelSelected(Panel::Traffic)),
            KeyCode::Char('r') => self.start_fetch(fetch_tx),
            _ => {}
        }
    }

    /// Kick off a refresh cycle in a background task. No generation
    /// guard: overlapping cycles are tolerated by design.
    fn start_fetch(&mut self, fetch_tx: &mpsc::UnboundedSender<FetchOutcome>) {
        self.state.apply(Msg::FetchStarted);
        let client = self.client.clone();
        let tx = fetch_tx.clone();
        tokio::spawn(async move {
            let outcome = fetch_all(&client).await;
            let _ = tx.send(outcome);
        });
    }
}

/// One refresh cycle: the three data fetches run concurrently; the
/// layout-based lookup is best-effort and independent.
async fn fetch_all(client: &WhooktownClient) -> FetchOutcome {
    let (sensors, camera_states, traffic_states) = tokio::join!(
        client.sensor_states(),
        client.camera_states(),
        client.traffic_states(),
    );

    match (sensors, camera_states, traffic_states) {
        (Ok(sensors), Ok(camera_states), Ok(traffic_states)) => {
            let lookup = match client.layouts().await {
                Ok(layouts) => build_sensor_lookup(&layouts),
                Err(e) => {
                    debug!("layout fetch for lookup failed: {e}");
                    HashMap::new()
                }
            };
            FetchOutcome::Loaded {
                sensors,
                camera_states,
                traffic_states,
                lookup,
                completed_at: Local::now(),
            }
        }
        (sensors, camera_states, traffic_states) => {
            let message = sensors
                .err()
                .or(camera_states.err())
                .or(traffic_states.err())
                .map_or_else(|| "Failed to fetch data".into(), |e| e.to_string());
            FetchOutcome::Failed { message }
        }
    }
}
