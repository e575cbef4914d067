//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::{self, prompt_err};

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the user code.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(
        out,
        "refresh_interval_secs = {}",
        cfg.defaults.refresh_interval_secs
    );
    let _ = writeln!(out, "settle_delay_ms = {}", cfg.defaults.settle_delay_ms);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "host = \"{}\"", p.host);
        let _ = writeln!(out, "user_id = \"{}\"", p.user_id);
        let _ = writeln!(out, "panel_id = \"{}\"", p.panel_id);
        let _ = writeln!(out, "partition = \"{}\"", p.partition);
        if p.user_code.is_some() {
            let _ = writeln!(out, "user_code = \"****\"");
        }
        if let Some(ref env) = p.user_code_env {
            let _ = writeln!(out, "user_code_env = \"{env}\"");
        }
        if p.no_pin_required {
            let _ = writeln!(out, "no_pin_required = true");
        }
        if p.arm_instant {
            let _ = writeln!(out, "arm_instant = true");
        }
        if p.event_hour_offset != 0 {
            let _ = writeln!(out, "event_hour_offset = {}", p.event_hour_offset);
        }
        if let Some(secs) = p.refresh_interval_secs {
            let _ = writeln!(out, "refresh_interval_secs = {secs}");
        }
        if let Some(ms) = p.settle_delay_ms {
            let _ = writeln!(out, "settle_delay_ms = {ms}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if !p.state_aliases.is_empty() {
            let _ = writeln!(out, "[profiles.{name}.state_aliases]");
            for (raw, state) in &p.state_aliases {
                let _ = writeln!(out, "\"{raw}\" = \"{state}\"");
            }
        }
    }

    out
}

/// Prompt for a user code and check it looks like a panel PIN.
fn prompt_user_code() -> Result<String, CliError> {
    let code = rpassword::prompt_password("User code: ").map_err(prompt_err)?;
    if !visonic_config::is_valid_user_code(&code) {
        return Err(CliError::Validation {
            field: "user_code".into(),
            reason: "must be digits only".into(),
        });
    }
    Ok(code)
}

/// Offer to store the user code in the system keyring or return it for
/// plaintext config.
///
/// Returns `Some(code)` if the user chose plaintext, `None` if stored in
/// the keyring.
fn prompt_keyring_storage(code: &str, profile_name: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the user code?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        visonic_config::store_user_code(profile_name, code)?;
        eprintln!("   ✓ User code stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(code.to_owned()))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let mut cfg = config::load_config()?;
            for profile in cfg.profiles.values_mut() {
                if profile.user_code.is_some() {
                    profile.user_code = Some("****".into());
                }
            }
            let out = output::render_single(
                &global.output,
                &cfg,
                format_config_redacted,
                |c| c.active_profile_name().to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::SetCode => {
            let cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(config::profile_not_found(&profile_name, &cfg));
            }
            let code = prompt_user_code()?;
            visonic_config::store_user_code(&profile_name, &code)?;
            if !global.quiet {
                eprintln!("User code for profile '{profile_name}' stored in system keyring");
            }
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("Visonic CLI -- configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = config::load_config()?;

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(global.profile.clone().unwrap_or_else(|| "default".into()))
        .interact_text()
        .map_err(prompt_err)?;

    if cfg.profiles.contains_key(&profile_name)
        && !util::confirm(
            &format!("Profile '{profile_name}' exists. Overwrite?"),
            global.yes,
        )?
    {
        return Ok(());
    }

    let host: String = Input::new()
        .with_prompt("Server")
        .default(visonic_config::DEFAULT_HOST.into())
        .interact_text()
        .map_err(prompt_err)?;

    let panel_id: String = Input::new()
        .with_prompt("Panel id")
        .interact_text()
        .map_err(prompt_err)?;

    let user_id: String = Input::new()
        .with_prompt("Installation id (UUID)")
        .default(visonic_config::new_user_id())
        .interact_text()
        .map_err(prompt_err)?;

    let no_pin_required = !Confirm::new()
        .with_prompt("Require the user code for arm/disarm?")
        .default(true)
        .interact()
        .map_err(prompt_err)?;

    let code = prompt_user_code()?;

    let mut profile = Profile::new(user_id.trim(), panel_id.trim());
    profile.host = host.trim().to_owned();
    profile.no_pin_required = no_pin_required;
    profile.validate()?;
    profile.user_code = prompt_keyring_storage(&code, &profile_name)?;

    if cfg.profiles.is_empty() {
        cfg.default_profile = Some(profile_name.clone());
    }
    cfg.profiles.insert(profile_name.clone(), profile);
    config::save_config(&cfg)?;

    eprintln!("\n   ✓ Profile '{profile_name}' saved to {}", config_path.display());
    eprintln!("   Try: visonic --profile {profile_name} status");
    Ok(())
}
