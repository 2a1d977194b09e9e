//! One-shot gateway actions: status, connect, disconnect, qr.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use meon_core::{ActionKind, ActionReport, Credentials, Orchestrator, SessionState};

use crate::cli::GlobalOpts;
use crate::commands::qr;
use crate::config;
use crate::error::CliError;
use crate::output;

fn spinner(kind: ActionKind, quiet: bool) -> ProgressBar {
    if quiet || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(format!("{kind}…"));
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Run one action against `session`, applying its update on success.
pub async fn run_action(
    orchestrator: &Orchestrator,
    session: &mut SessionState,
    credentials: &Credentials,
    kind: ActionKind,
    quiet: bool,
) -> ActionReport {
    session.begin(kind.spec());

    let bar = spinner(kind, quiet);
    let report = orchestrator
        .run_kind(kind, session.request(credentials.clone()))
        .await;
    bar.finish_and_clear();

    if let Some(update) = report.update() {
        session.apply(update);
    }
    report
}

pub async fn handle(
    kind: ActionKind,
    save: Option<&Path>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (cfg, resolved) = config::resolve(global)?;
    let format = config::output_format(global, &cfg);
    let color = output::should_color(global.color);

    let orchestrator = Orchestrator::new(&resolved.orchestrator).map_err(|e| {
        CliError::from_action(kind, &e, &resolved.profile_name, &resolved.session.api_base_url)
    })?;
    let mut session = resolved.session;

    debug!(action = %kind, profile = %resolved.profile_name, "running action");
    let report = run_action(
        &orchestrator,
        &mut session,
        &resolved.credentials,
        kind,
        global.quiet,
    )
    .await;

    if let (Some(path), Some(payload)) = (save, session.qr_payload.as_deref()) {
        let uri = qr::save(payload, path)?;
        if !global.quiet {
            eprintln!("✓ QR code ({}) written to {}", uri.mime, path.display());
        }
    } else if save.is_some() && report.is_success() && !global.quiet {
        eprintln!("No QR code returned; nothing written");
    }

    let out = output::render_report(
        format,
        &report,
        &session,
        &orchestrator.history().snapshot(),
        color,
    )?;
    output::print_output(&out, global.quiet);

    match report.error() {
        Some(err) => Err(CliError::from_action(
            kind,
            err,
            &resolved.profile_name,
            &session.api_base_url,
        )),
        None => Ok(()),
    }
}
