//! CLI configuration -- thin wrapper around `visonic_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--host, --panel-id, etc.).

use visonic_core::HubConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use visonic_config::{Config, Profile, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Apply flag overrides on top of a profile. Flags win over profile values.
pub fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(ref user_id) = global.user_id {
        profile.user_id.clone_from(user_id);
    }
    if let Some(ref panel_id) = global.panel_id {
        profile.panel_id.clone_from(panel_id);
    }
    if let Some(ref partition) = global.partition {
        profile.partition.clone_from(partition);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

/// Build a `HubConfig` from the config file, profile, and CLI overrides.
///
/// Without a matching profile the panel can still be addressed from
/// flags alone, as long as `--user-id` and `--panel-id` are given.
pub fn build_hub_config(global: &GlobalOpts) -> Result<HubConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = if let Some(profile) = cfg.profiles.get(&profile_name) {
        profile.clone()
    } else {
        if global.profile.is_some() {
            return Err(profile_not_found(&profile_name, &cfg));
        }
        match (&global.user_id, &global.panel_id) {
            (Some(user_id), Some(panel_id)) => Profile::new(user_id.clone(), panel_id.clone()),
            _ => {
                return Err(CliError::NoConfig {
                    path: config_path().display().to_string(),
                });
            }
        }
    };
    apply_overrides(&mut profile, global);

    let user_code = visonic_config::resolve_user_code(&profile, &profile_name)?;
    Ok(visonic_config::build_hub_config(
        &profile,
        &cfg.defaults,
        user_code,
    )?)
}

pub fn profile_not_found(name: &str, cfg: &Config) -> CliError {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    CliError::ProfileNotFound {
        name: name.into(),
        available: if names.is_empty() {
            "(none)".into()
        } else {
            names.join(", ")
        },
    }
}
