//! Terminal output formatting: tables, badges, bars, and messages.
//!
//! Tables are plain aligned columns (header, dash separator, rows, joined
//! by two spaces). Badges colorize known enum values; unknown values pass
//! through unchanged so the platform can grow new states without breaking
//! the CLI. Colors are suppressed automatically when stdout is not a
//! terminal.

use owo_colors::{OwoColorize, Stream};

// ── Tables ───────────────────────────────────────────────────────────

/// Render headers and rows as aligned columns joined by two spaces.
///
/// Column width is the max of the header and every cell in that column.
/// Empty `rows` yields a literal placeholder instead of an empty table.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return format!(
            "{}",
            "No data".if_supports_color(Stream::Stdout, |t| t.bright_black())
        );
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| r.get(i).map_or(0, |cell| cell.chars().count()))
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let pad = |cell: &str, width: usize| {
        let len = cell.chars().count();
        format!("{cell}{}", " ".repeat(width.saturating_sub(len)))
    };

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect::<Vec<_>>()
        .join("  ");
    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");

    let mut lines = vec![
        format!(
            "{}",
            header_line.if_supports_color(Stream::Stdout, |t| t.bold())
        ),
        separator,
    ];
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(i, w)| pad(row.get(i).map_or("", String::as_str), *w))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line);
    }
    lines.join("\n")
}

// ── Badges ───────────────────────────────────────────────────────────

/// Colorize a sensor status. Unknown values pass through raw; absent
/// values render as a dash.
pub fn format_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "online" => paint(status, |t| format!("{}", t.green())),
        "offline" => paint(status, |t| format!("{}", t.bright_black())),
        "warning" => paint(status, |t| format!("{}", t.yellow())),
        "critical" => paint(status, |t| format!("{}", t.red())),
        "" => dash(),
        _ => status.to_owned(),
    }
}

/// Colorize a pace value (shared by sensor activity and traffic speed).
pub fn format_pace(value: &str) -> String {
    match value.to_lowercase().as_str() {
        "slow" => paint(value, |t| format!("{}", t.blue())),
        "normal" => paint(value, |t| format!("{}", t.white())),
        "fast" => paint(value, |t| format!("{}", t.cyan())),
        "" => dash(),
        _ => value.to_owned(),
    }
}

pub fn format_enabled(enabled: bool) -> String {
    if enabled {
        paint("enabled", |t| format!("{}", t.green()))
    } else {
        paint("disabled", |t| format!("{}", t.bright_black()))
    }
}

/// Density as a 10-cell bar plus the rounded percent value.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_density(density: f64) -> String {
    const BAR_LEN: usize = 10;
    let percent = density.round().clamp(0.0, 100.0) as u32;
    let filled = ((f64::from(percent) / 100.0) * BAR_LEN as f64).round() as usize;
    let empty = BAR_LEN - filled;
    let bar = format!(
        "{}{}",
        paint(&"█".repeat(filled), |t| format!("{}", t.green())),
        paint(&"░".repeat(empty), |t| format!("{}", t.bright_black())),
    );
    format!("{bar} {percent}%")
}

fn dash() -> String {
    paint("-", |t| format!("{}", t.bright_black()))
}

fn paint(text: &str, colorize: fn(&str) -> String) -> String {
    if supports_color() {
        colorize(text)
    } else {
        text.to_owned()
    }
}

fn supports_color() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

// ── Strings & JSON ───────────────────────────────────────────────────

/// Cut a string to `max_length`, replacing the tail with `...` when it
/// does not fit.
pub fn truncate(s: &str, max_length: usize) -> String {
    if s.chars().count() <= max_length {
        return s.to_owned();
    }
    let kept: String = s.chars().take(max_length.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Pretty-printed JSON with 2-space indentation.
pub fn format_json<T: serde::Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

// ── Messages ─────────────────────────────────────────────────────────

pub fn success(message: &str) {
    println!(
        "{} {message}",
        "✓".if_supports_color(Stream::Stdout, |t| t.green())
    );
}

pub fn error(message: &str) {
    eprintln!(
        "{} {message}",
        "✗".if_supports_color(Stream::Stderr, |t| t.red())
    );
}

pub fn info(message: &str) {
    println!(
        "{} {message}",
        "ℹ".if_supports_color(Stream::Stdout, |t| t.blue())
    );
}

// Warnings go to stdout alongside the data they annotate.
pub fn warn(message: &str) {
    println!(
        "{} {message}",
        "⚠".if_supports_color(Stream::Stdout, |t| t.yellow())
    );
}

/// Indented gray detail line under a success/info message.
pub fn detail(message: &str) {
    println!(
        "  {}",
        message.if_supports_color(Stream::Stdout, |t| t.bright_black())
    );
}

/// Indented gray detail line on stderr, under an error message.
pub fn error_detail(message: &str) {
    eprintln!(
        "  {}",
        message.if_supports_color(Stream::Stderr, |t| t.bright_black())
    );
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| (*c).to_owned()).collect())
            .collect()
    }

    #[test]
    fn table_has_header_separator_and_rows() {
        let out = format_table(
            &["ID", "Name"],
            &rows(&[&["s1", "alpha"], &["s2", "beta"]]),
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "--  -----");
    }

    #[test]
    fn table_column_width_is_max_of_header_and_cells() {
        let out = format_table(&["ID", "N"], &rows(&[&["s1", "longer"]]));
        let lines: Vec<&str> = out.lines().collect();
        // Width of column one is 2 ("ID"), column two is 6 ("longer").
        assert_eq!(lines[0], "ID  N     ");
        assert_eq!(lines[2], "s1  longer");
        for line in &lines {
            assert_eq!(line.chars().count(), 10);
        }
    }

    #[test]
    fn empty_table_is_a_placeholder() {
        assert_eq!(format_table(&["A", "B"], &[]), "No data");
    }

    #[test]
    fn short_rows_pad_missing_cells() {
        let out = format_table(&["A", "B"], &rows(&[&["x"]]));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "x   ");
    }

    #[test]
    fn truncate_is_noop_within_length() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly-10", 10), "exactly-10");
    }

    #[test]
    fn truncate_cuts_and_marks() {
        let out = truncate("this string is too long", 10);
        assert_eq!(out, "this st...");
        assert_eq!(out.chars().count(), 10);
    }

    #[test]
    fn density_bar_fill_counts() {
        assert_eq!(format_density(0.0), "░░░░░░░░░░ 0%");
        assert_eq!(format_density(100.0), "██████████ 100%");
        // round(5.5) = 6 filled cells
        assert_eq!(format_density(55.0), "██████░░░░ 55%");
    }

    #[test]
    fn density_rounds_to_integer_percent() {
        assert_eq!(format_density(49.6), "█████░░░░░ 50%");
    }

    #[test]
    fn unknown_badge_values_pass_through() {
        assert_eq!(format_status("degraded"), "degraded");
        assert_eq!(format_pace("hyperspeed"), "hyperspeed");
    }

    #[test]
    fn absent_badge_values_render_a_dash() {
        assert_eq!(format_status(""), "-");
        assert_eq!(format_pace(""), "-");
    }
}
