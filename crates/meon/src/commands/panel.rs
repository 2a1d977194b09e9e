//! Interactive control panel.
//!
//! Holds one `SessionState` for the whole session. Each menu pick runs
//! an action and prints the history lines it appended, read from a
//! subscription to the orchestrator's history log.

use dialoguer::{Input, Select};
use secrecy::SecretString;
use tokio::sync::broadcast;

use meon_core::{ActionKind, Credentials, HistoryEntry, Orchestrator};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::commands::action::run_action;
use crate::commands::qr;
use crate::config;
use crate::error::CliError;
use crate::output;

enum MenuItem {
    Action(ActionKind),
    EditApiUrl,
    EditInstance,
    EditCredentials,
    SaveQr,
    ShowHistory,
    Quit,
}

impl MenuItem {
    fn all() -> Vec<Self> {
        let mut items: Vec<Self> = meon_core::registry()
            .map(|spec| Self::Action(spec.kind))
            .collect();
        items.extend([
            Self::EditApiUrl,
            Self::EditInstance,
            Self::EditCredentials,
            Self::SaveQr,
            Self::ShowHistory,
            Self::Quit,
        ]);
        items
    }

    fn label(&self) -> String {
        match self {
            Self::Action(kind) => kind.to_string(),
            Self::EditApiUrl => "Alterar endereço da API".into(),
            Self::EditInstance => "Alterar instância".into(),
            Self::EditCredentials => "Alterar usuário e senha".into(),
            Self::SaveQr => "Salvar QR Code em arquivo".into(),
            Self::ShowHistory => "Histórico".into(),
            Self::Quit => "Sair".into(),
        }
    }
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (_, resolved) = config::resolve(global)?;
    let color = output::should_color(global.color);
    let profile_name = resolved.profile_name;

    let orchestrator = Orchestrator::new(&resolved.orchestrator).map_err(|e| {
        CliError::from_action(
            ActionKind::Status,
            &e,
            &profile_name,
            &resolved.session.api_base_url,
        )
    })?;
    let mut session = resolved.session;
    let mut credentials = resolved.credentials;

    let items = MenuItem::all();
    let labels: Vec<String> = items.iter().map(MenuItem::label).collect();
    let mut recorded = orchestrator.history().subscribe();

    loop {
        eprintln!("\n{}", output::render_session(&session, color));

        let Some(choice) = Select::new()
            .with_prompt("Ação")
            .items(&labels)
            .default(0)
            .interact_opt()
            .map_err(CliError::prompt)?
        else {
            break;
        };

        match items.get(choice).unwrap_or(&MenuItem::Quit) {
            MenuItem::Action(kind) => {
                run_action(&orchestrator, &mut session, &credentials, *kind, false).await;
                for entry in drain(&mut recorded) {
                    eprintln!("{entry}");
                }
            }
            MenuItem::EditApiUrl => {
                session.api_base_url = Input::new()
                    .with_prompt("Endereço da API")
                    .with_initial_text(session.api_base_url.clone())
                    .allow_empty(true)
                    .interact_text()
                    .map_err(CliError::prompt)?;
            }
            MenuItem::EditInstance => {
                session.instance_name = Input::new()
                    .with_prompt("Nome da instância")
                    .with_initial_text(session.instance_name.clone())
                    .allow_empty(true)
                    .interact_text()
                    .map_err(CliError::prompt)?;
            }
            MenuItem::EditCredentials => {
                let username: String = Input::new()
                    .with_prompt("Usuário")
                    .with_initial_text(credentials.username().to_owned())
                    .allow_empty(true)
                    .interact_text()
                    .map_err(CliError::prompt)?;
                let password = rpassword::prompt_password("Senha: ").map_err(CliError::prompt)?;
                credentials = Credentials::new(username, SecretString::from(password));
            }
            MenuItem::SaveQr => save_qr(session.qr_payload.as_deref())?,
            MenuItem::ShowHistory => {
                let out = output::render_history(
                    OutputFormat::Table,
                    &orchestrator.history().snapshot(),
                    color,
                )?;
                eprintln!("{out}");
            }
            MenuItem::Quit => break,
        }
    }

    Ok(())
}

/// Entries recorded since the last drain. A lagging receiver skips what
/// it missed; the full log stays available under "Histórico".
fn drain(rx: &mut broadcast::Receiver<HistoryEntry>) -> Vec<HistoryEntry> {
    let mut entries = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(entry) => entries.push(entry),
            Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            Err(_) => break,
        }
    }
    entries
}

fn save_qr(payload: Option<&str>) -> Result<(), CliError> {
    let Some(payload) = payload else {
        eprintln!("Nenhum QR Code disponível.");
        return Ok(());
    };
    let path: String = Input::new()
        .with_prompt("Arquivo")
        .default("qrcode.png".into())
        .interact_text()
        .map_err(CliError::prompt)?;
    match qr::save(payload, path.as_ref()) {
        Ok(_) => eprintln!("✓ QR Code salvo em {path}"),
        Err(err) => eprintln!("{:?}", miette::Report::new(err)),
    }
    Ok(())
}
