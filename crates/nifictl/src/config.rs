//! CLI-side configuration: applies `GlobalOpts` overrides on top of the
//! profile loaded by `nifictl-config`.

use nifictl_config::{self as config, Config, Profile};
use nifictl_core::ConnectionConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Name of the profile in effect for this invocation.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    cfg.active_profile_name(global.profile.as_deref())
}

/// Build a `ConnectionConfig` from the config file, profile, and CLI flags.
///
/// Flags beat the profile. With no matching profile, `--url` alone is
/// enough as long as credentials come from the environment.
pub fn resolve_connection(global: &GlobalOpts) -> Result<ConnectionConfig, CliError> {
    let cfg = config::load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match (cfg.profiles.get(&profile_name), &global.url) {
        (Some(profile), _) => profile.clone(),
        (None, Some(url)) => Profile::new(url.clone()),
        (None, None) if global.profile.is_some() => {
            let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
            names.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config::config_path().display().to_string(),
            });
        }
    };

    apply_overrides(&mut profile, global);
    Ok(config::profile_to_connection_config(
        &profile,
        &profile_name,
        &cfg.defaults,
    )?)
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(url) = &global.url {
        profile.url.clone_from(url);
    }
    if let Some(username) = &global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}
