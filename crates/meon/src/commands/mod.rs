//! Command dispatch: bridges CLI args -> orchestrator actions -> output.

pub mod action;
pub mod config_cmd;
pub mod panel;
pub mod qr;

use meon_core::{ActionKind, ActionSpec};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a gateway-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => action::handle(ActionKind::Status, None, global).await,
        Command::Connect(args) => {
            action::handle(ActionKind::Connect, args.save.as_deref(), global).await
        }
        Command::Disconnect => action::handle(ActionKind::Disconnect, None, global).await,
        Command::Qr(args) => {
            action::handle(ActionKind::RefreshQr, args.save.as_deref(), global).await
        }
        Command::Run(args) => {
            let spec = meon_core::lookup(&args.action).ok_or_else(|| CliError::InvalidInput {
                field: "action".into(),
                reason: format!(
                    "unknown action '{}' (expected one of: {})",
                    args.action,
                    action_names()
                ),
            })?;
            action::handle(spec.kind, args.qr.save.as_deref(), global).await
        }
        Command::Panel => panel::handle(global).await,
        Command::Config(args) => config_cmd::handle(args, global),
        // Handled in main before dispatch.
        Command::Completions(_) => Ok(()),
    }
}

fn action_names() -> String {
    meon_core::registry()
        .map(ActionSpec::name)
        .collect::<Vec<_>>()
        .join(", ")
}
