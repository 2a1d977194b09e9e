//! Config subcommand handlers.

use dialoguer::{Input, Select};

use meon_config::{Config, DEFAULT_API_URL, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

/// Copy of `cfg` safe to print.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.into());
        }
    }
    cfg
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::SetPassword => set_password(global),
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = meon_config::config_path();
    eprintln!("meon: configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = meon_config::load_config_or_default();

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(global.profile.clone().unwrap_or_else(|| "default".into()))
        .interact_text()
        .map_err(CliError::prompt)?;

    let api_url: String = Input::new()
        .with_prompt("Gateway API URL")
        .default(DEFAULT_API_URL.into())
        .interact_text()
        .map_err(CliError::prompt)?;

    let instance: String = Input::new()
        .with_prompt("Instance name")
        .allow_empty(true)
        .interact_text()
        .map_err(CliError::prompt)?;

    let username: String = Input::new()
        .with_prompt("Username")
        .allow_empty(true)
        .interact_text()
        .map_err(CliError::prompt)?;

    let password = rpassword::prompt_password("Password: ").map_err(CliError::prompt)?;

    let password_field = if password.is_empty() {
        None
    } else {
        let store_choices = &[
            "Store in system keyring (recommended)",
            "Save to config file (plaintext)",
        ];
        let store_selection = Select::new()
            .with_prompt("Where to store the password?")
            .items(store_choices)
            .default(0)
            .interact()
            .map_err(CliError::prompt)?;

        if store_selection == 0 {
            meon_config::store_password(&profile_name, &password)?;
            eprintln!("   ✓ Password stored in system keyring");
            None
        } else {
            Some(password)
        }
    };

    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            api_url: non_empty(&api_url),
            instance: non_empty(&instance),
            username: non_empty(&username),
            password: password_field,
            ..Profile::default()
        },
    );
    cfg.default_profile = Some(profile_name.clone());

    let path = meon_config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: meon status");
    Ok(())
}

// ── Show ────────────────────────────────────────────────────────────

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = redacted(&meon_config::load_config()?);
    let out = match config::output_format(global, &cfg) {
        OutputFormat::Json => output::render_json(&cfg, false)?,
        OutputFormat::JsonCompact => output::render_json(&cfg, true)?,
        OutputFormat::Plain => cfg.profile_names().join("\n"),
        OutputFormat::Table => {
            let body = toml::to_string_pretty(&cfg).map_err(|e| CliError::InvalidInput {
                field: "config".into(),
                reason: format!("failed to serialize config: {e}"),
            })?;
            format!("# {}\n{body}", meon_config::config_path().display())
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── SetPassword ─────────────────────────────────────────────────────

fn set_password(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = meon_config::load_config()?;
    let (profile_name, _) = meon_config::select_profile(global.profile.as_deref(), &cfg)?;

    let secret = rpassword::prompt_password("Password: ").map_err(CliError::prompt)?;
    if secret.is_empty() {
        return Err(CliError::InvalidInput {
            field: "password".into(),
            reason: "value cannot be empty".into(),
        });
    }

    meon_config::store_password(&profile_name, &secret)?;
    eprintln!("✓ Password stored in system keyring for profile '{profile_name}'");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_hides_plaintext_passwords_only() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "a".into(),
            Profile {
                password: Some("hunter2".into()),
                ..Profile::default()
            },
        );
        cfg.profiles.insert("b".into(), Profile::default());

        let shown = redacted(&cfg);
        assert_eq!(shown.profiles["a"].password.as_deref(), Some(REDACTED));
        assert_eq!(shown.profiles["b"].password, None);
    }

    #[test]
    fn blank_answers_become_none() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" loja1 "), Some("loja1".into()));
    }
}
