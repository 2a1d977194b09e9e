//! GlobalOpts-aware wrappers over `meon_config`.

use clap::ValueEnum;
use secrecy::SecretString;

use meon_config::{Config, Overrides, Resolved};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub fn overrides(global: &GlobalOpts) -> Overrides {
    Overrides {
        profile: global.profile.clone(),
        api_url: global.api_url.clone(),
        instance: global.instance.clone(),
        username: global.username.clone(),
        password: global.password.clone().map(SecretString::from),
        insecure: global.insecure,
        timeout: global.timeout,
    }
}

/// Load the config file and resolve the active profile against the flags.
pub fn resolve(global: &GlobalOpts) -> Result<(Config, Resolved), CliError> {
    let cfg = meon_config::load_config()?;
    let resolved = meon_config::resolve(&cfg, &overrides(global))?;
    Ok((cfg, resolved))
}

/// `--output`, else `[defaults] output`, else table.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}
