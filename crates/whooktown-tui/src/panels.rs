//! Rendering: a pure function of [`DashState`] to a ratatui frame.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::state::{DashState, Panel};

/// Render the whole dashboard.
pub fn render(frame: &mut Frame, state: &DashState) {
    let [header, tabs, content, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Min(10),
        Constraint::Length(3),
    ])
    .areas(frame.area());

    render_header(frame, header, state);
    render_tabs(frame, tabs, state.panel);
    match state.panel {
        Panel::Sensors => render_sensors(frame, content, state),
        Panel::Camera => render_camera(frame, content, state),
        Panel::Traffic => render_traffic(frame, content, state),
    }
    render_footer(frame, footer, state);
}

fn render_header(frame: &mut Frame, area: Rect, state: &DashState) {
    let mut spans = vec![Span::styled(
        " Whooktown CLI ",
        Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    if state.loading {
        spans.push(Span::styled(" refreshing...", Style::new().fg(Color::Yellow)));
    }
    if let Some(error) = &state.error {
        spans.push(Span::styled(
            format!(" {error}"),
            Style::new().fg(Color::Red),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, active: Panel) {
    let tab = |label: &str, panel: Panel| {
        let style = if panel == active {
            Style::new().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::new().fg(Color::DarkGray)
        };
        Span::styled(format!(" {label} "), style)
    };
    let line = Line::from(vec![
        tab("1 Sensors", Panel::Sensors),
        Span::raw(" "),
        tab("2 Camera", Panel::Camera),
        Span::raw(" "),
        tab("3 Traffic", Panel::Traffic),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &DashState) {
    let mut text = String::from("[1-3] Switch panels  [r] Refresh  [q] Quit");
    if let Some(last) = state.last_refresh {
        text.push_str(&format!("  |  Last: {}", last.format("%H:%M:%S")));
    }
    let footer = Paragraph::new(text).fg(Color::DarkGray).block(
        Block::new()
            .borders(Borders::ALL)
            .border_style(Style::new().fg(Color::DarkGray)),
    );
    frame.render_widget(footer, area);
}

// ── Panels ───────────────────────────────────────────────────────────

fn render_sensors(frame: &mut Frame, area: Rect, state: &DashState) {
    if state.sensors.is_empty() {
        return render_empty(frame, area, "No sensors found");
    }

    let rows: Vec<Row> = state
        .sensors
        .iter()
        .map(|s| {
            let info = state.lookup.get(&s.id);
            Row::new(vec![
                Cell::from(s.id.clone()).fg(Color::Cyan),
                Cell::from(short(info.map_or("-", |i| i.building_name.as_str()), 14)),
                Cell::from(short(info.map_or("-", |i| i.layout_name.as_str()), 14))
                    .fg(Color::Magenta),
                status_badge(s.data.status.as_deref()),
                pace_badge(s.data.activity.as_deref()),
                Cell::from(s.received_at.map_or_else(
                    || "-".into(),
                    |ts| {
                        ts.with_timezone(&chrono::Local)
                            .format("%H:%M:%S")
                            .to_string()
                    },
                ))
                .fg(Color::DarkGray),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(38),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(header_row(&["ID", "Name", "Layout", "Status", "Activity", "Updated"]))
        .footer(count_row(state.sensors.len(), "sensor"));
    frame.render_widget(table, area);
}

fn render_camera(frame: &mut Frame, area: Rect, state: &DashState) {
    if state.camera_states.is_empty() {
        return render_empty(frame, area, "No camera states found");
    }

    let rows: Vec<Row> = state
        .camera_states
        .iter()
        .map(|s| {
            Row::new(vec![
                Cell::from(short(&s.layout_id, 22)),
                mode_badge(s.mode.as_deref()),
                Cell::from(
                    s.flyover_speed
                        .map_or_else(|| "-".into(), |v| format!("{v:.1}")),
                )
                .fg(Color::DarkGray),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(24),
        Constraint::Length(12),
        Constraint::Length(15),
    ];
    let table = Table::new(rows, widths)
        .header(header_row(&["Layout ID", "Mode", "Flyover Speed"]))
        .footer(count_row(state.camera_states.len(), "layout"));
    frame.render_widget(table, area);
}

fn render_traffic(frame: &mut Frame, area: Rect, state: &DashState) {
    if state.traffic_states.is_empty() {
        return render_empty(frame, area, "No traffic states found");
    }

    let rows: Vec<Row> = state
        .traffic_states
        .iter()
        .map(|s| {
            Row::new(vec![
                Cell::from(short(&s.layout_id, 22)),
                density_cell(s.density),
                pace_badge(Some(&s.speed)),
                if s.enabled {
                    Cell::from("enabled").fg(Color::Green)
                } else {
                    Cell::from("disabled").fg(Color::DarkGray)
                },
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(24),
        Constraint::Length(20),
        Constraint::Length(10),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header_row(&["Layout ID", "Density", "Speed", "Enabled"]))
        .footer(count_row(state.traffic_states.len(), "layout"));
    frame.render_widget(table, area);
}

// ── Widget helpers ───────────────────────────────────────────────────

fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    frame.render_widget(Paragraph::new(message).fg(Color::DarkGray), area);
}

fn header_row(titles: &[&str]) -> Row<'static> {
    Row::new(
        titles
            .iter()
            .map(|t| {
                Cell::from((*t).to_owned())
                    .style(Style::new().fg(Color::White).add_modifier(Modifier::BOLD))
            })
            .collect::<Vec<_>>(),
    )
    .bottom_margin(1)
}

fn count_row(count: usize, noun: &str) -> Row<'static> {
    Row::new(vec![
        Cell::from(format!("{count} {noun}(s)")).fg(Color::DarkGray),
    ])
    .top_margin(1)
}

fn status_badge(status: Option<&str>) -> Cell<'static> {
    match status.map(str::to_lowercase).as_deref() {
        Some("online") => Cell::from("online").fg(Color::Green),
        Some("offline") => Cell::from("offline").fg(Color::DarkGray),
        Some("warning") => Cell::from("warning").fg(Color::Yellow),
        Some("critical") => Cell::from("critical").fg(Color::Red),
        _ => Cell::from("-").fg(Color::DarkGray),
    }
}

fn pace_badge(value: Option<&str>) -> Cell<'static> {
    match value.map(str::to_lowercase).as_deref() {
        Some("slow") => Cell::from("slow").fg(Color::Blue),
        Some("normal") => Cell::from("normal"),
        Some("fast") => Cell::from("fast").fg(Color::Cyan),
        _ => Cell::from("-").fg(Color::DarkGray),
    }
}

fn mode_badge(mode: Option<&str>) -> Cell<'static> {
    match mode.map(str::to_lowercase).as_deref() {
        Some("orbit") => Cell::from("orbit").fg(Color::Cyan),
        Some("fps") => Cell::from("fps").fg(Color::Yellow),
        Some("flyover") => Cell::from("flyover").fg(Color::Magenta),
        _ => Cell::from("-").fg(Color::DarkGray),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn density_cell(density: f64) -> Cell<'static> {
    const BAR_LEN: usize = 10;
    let percent = density.round().clamp(0.0, 100.0) as u32;
    let filled = ((f64::from(percent) / 100.0) * BAR_LEN as f64).round() as usize;
    Cell::from(Line::from(vec![
        Span::styled("█".repeat(filled), Style::new().fg(Color::Green)),
        Span::styled(
            "░".repeat(BAR_LEN - filled),
            Style::new().fg(Color::DarkGray),
        ),
        Span::raw(format!(" {percent}%")),
    ]))
}

/// Panel-local truncation with a two-character marker.
fn short(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_owned();
    }
    let kept: String = s.chars().take(max.saturating_sub(2)).collect();
    format!("{kept}..")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn short_keeps_strings_within_length() {
        assert_eq!(short("abc", 5), "abc");
        assert_eq!(short("abcde", 5), "abcde");
    }

    #[test]
    fn short_cuts_with_two_char_marker() {
        assert_eq!(short("abcdef", 4), "ab..");
        assert_eq!(short("abcdef", 4).chars().count(), 4);
    }
}
