//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::{self, prompt_err};

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
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
    let _ = writeln!(out, "mock = {}", cfg.defaults.mock);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        if let Some(ref url) = p.api_url {
            let _ = writeln!(out, "api_url = \"{url}\"");
        }
        if let Some(ref url) = p.identity_url {
            let _ = writeln!(out, "identity_url = \"{url}\"");
        }
        if p.identity_key.is_some() {
            let _ = writeln!(out, "identity_key = \"****\"");
        }
        if let Some(ref env) = p.identity_key_env {
            let _ = writeln!(out, "identity_key_env = \"{env}\"");
        }
        if let Some(ref audience) = p.audience {
            let _ = writeln!(out, "audience = \"{audience}\"");
        }
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{email}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(mock) = p.mock {
            let _ = writeln!(out, "mock = {mock}");
        }
    }

    out
}

/// Offer to store a secret in the system keyring or return it for plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_keyring_storage(
    secret: &str,
    profile_name: &str,
    kind: &str,
    label: &str,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {label}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        vitrina_config::store_secret(profile_name, kind, secret)?;
        eprintln!("   ✓ {label} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret.to_owned()))
    }
}

fn prompt_text(prompt: &str, default: Option<&str>) -> Result<String, CliError> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(d) = default {
        input = input.default(d.to_owned());
    }
    input.interact_text().map_err(prompt_err)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            output::print_output(&format_config_redacted(&cfg), global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", "),
                });
            }
            let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }
            vitrina_config::store_secret(&profile_name, "password", &password)?;
            if !global.quiet {
                eprintln!("Password stored in system keyring for profile '{profile_name}'");
            }
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let mut names: Vec<&String> = cfg.profiles.keys().collect();
            names.sort();
            let default = cfg.default_profile.as_deref();
            let lines: Vec<String> = names
                .into_iter()
                .map(|n| {
                    if Some(n.as_str()) == default {
                        format!("* {n}")
                    } else {
                        format!("  {n}")
                    }
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                let mut available: Vec<&String> = cfg.profiles.keys().collect();
                available.sort();
                return Err(CliError::ProfileNotFound {
                    available: available
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

/// Interactive wizard: one profile, secrets optionally in the keyring.
fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("Vitrina CLI configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name = prompt_text("Profile name", Some("default"))?;
    let api_url = prompt_text("Marketplace API URL", None)?;
    if url::Url::parse(&api_url).is_err() {
        return Err(CliError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {api_url}"),
        });
    }

    let identity_key = rpassword::prompt_password("Identity provider API key: ").map_err(prompt_err)?;
    let identity_key = if identity_key.is_empty() {
        None
    } else {
        prompt_keyring_storage(&identity_key, &profile_name, "identity-key", "identity API key")?
    };

    let audience_choices = &["Browse anonymously", "Shop account", "Client account"];
    let audience = Select::new()
        .with_prompt("Sign in as")
        .items(audience_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let (audience, email, password) = match audience {
        0 => (None, None, None),
        n => {
            let email = prompt_text("Email", None)?;
            let secret = util::prompt_secret("Password: ")?;
            let secret = secrecy::ExposeSecret::expose_secret(&secret).to_owned();
            let stored = prompt_keyring_storage(&secret, &profile_name, "password", "password")?;
            let audience = if n == 1 { "shop" } else { "client" };
            (Some(audience.to_owned()), Some(email), stored)
        }
    };

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            api_url: Some(api_url),
            identity_key,
            audience,
            email,
            password,
            ..Profile::default()
        },
    );
    if cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }
    config::save_config(&cfg)?;
    eprintln!("\n   ✓ Profile '{profile_name}' saved to {}", config_path.display());
    Ok(())
}
