//! Output formatting: table, JSON, plain.
//!
//! Renders an action's result and the history log in the format selected
//! by `--output`. Tables use `tabled`, structured formats use serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use meon_core::{ActionReport, EntryKind, HistoryEntry, SessionState};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

const QR_PREVIEW_LEN: usize = 48;

// ── Color ────────────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

fn label(kind: EntryKind, color: bool) -> String {
    let text = if kind == EntryKind::Success {
        "SUCESSO"
    } else {
        "ERRO"
    };
    match (color, kind) {
        (false, _) => text.to_owned(),
        (true, EntryKind::Success) => text.green().to_string(),
        (true, _) => text.red().to_string(),
    }
}

// ── Rows ─────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Message")]
    message: String,
}

fn history_row(entry: &HistoryEntry, color: bool) -> HistoryRow {
    HistoryRow {
        time: entry.timestamp.format("%H:%M:%S").to_string(),
        result: label(entry.kind, color),
        action: entry.action.map(|a| a.to_string()).unwrap_or_default(),
        message: entry.message.clone(),
    }
}

/// Shortened QR payload for terminal display.
pub fn qr_preview(payload: &str) -> String {
    if payload.chars().count() <= QR_PREVIEW_LEN {
        return payload.to_owned();
    }
    let head: String = payload.chars().take(QR_PREVIEW_LEN).collect();
    format!("{head}…")
}

// ── Render dispatchers ───────────────────────────────────────────────

#[derive(Serialize)]
struct ReportView<'a> {
    action: &'a str,
    success: bool,
    status_text: Option<&'a str>,
    qr_payload: Option<&'a str>,
    history: &'a [HistoryEntry],
}

/// Render the outcome of one action: status, QR, then the history so far.
pub fn render_report(
    format: OutputFormat,
    report: &ActionReport,
    session: &SessionState,
    history: &[HistoryEntry],
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            let view = ReportView {
                action: report.action.name(),
                success: report.is_success(),
                status_text: session.status_text.as_deref(),
                qr_payload: session.qr_payload.as_deref(),
                history,
            };
            render_json(&view, format == OutputFormat::JsonCompact)
        }
        OutputFormat::Plain => {
            let mut lines = Vec::new();
            lines.extend(session.status_text.clone());
            lines.extend(session.qr_payload.clone());
            lines.extend(history.iter().map(ToString::to_string));
            Ok(lines.join("\n"))
        }
        OutputFormat::Table => {
            let mut out = render_session(session, color);
            if !history.is_empty() {
                out.push('\n');
                out.push_str(&render_history_table(history, color));
            }
            Ok(out)
        }
    }
}

/// Render the history on its own.
pub fn render_history(
    format: OutputFormat,
    history: &[HistoryEntry],
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => render_json(history, false),
        OutputFormat::JsonCompact => render_json(history, true),
        OutputFormat::Plain => Ok(history
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Table => Ok(render_history_table(history, color)),
    }
}

/// Status and QR summary lines.
pub fn render_session(session: &SessionState, color: bool) -> String {
    let status = session.status_text.as_deref().unwrap_or("-");
    let status = if color {
        status.bold().to_string()
    } else {
        status.to_owned()
    };

    let mut out = format!(
        "API:       {}\nInstance:  {}\nStatus:    {status}",
        session.api_base_url, session.instance_name
    );
    if let Some(ref qr) = session.qr_payload {
        out.push_str(&format!("\nQR Code:   {}", qr_preview(qr)));
    }
    out
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_history_table(history: &[HistoryEntry], color: bool) -> String {
    let rows: Vec<HistoryRow> = history.iter().map(|e| history_row(e, color)).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub(crate) fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}
