//! CLI configuration: thin wrapper around `vitrina_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --timeout, --anonymous, --no-mock).

use std::time::Duration;

use vitrina_core::{AuthCredentials, MarketplaceConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use vitrina_config::{
    Config, Profile, SecretSources, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build a `MarketplaceConfig` from the config file, profile, and flags.
///
/// Without a stored profile the API URL must come from `--api-url` /
/// `VITRINA_API_URL`.
pub fn build_marketplace_config(global: &GlobalOpts) -> Result<MarketplaceConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                available: available_profiles(&cfg),
                name: profile_name,
            });
        }
        None => Profile::default(),
    };

    // Flag > env > profile
    if let Some(ref url) = global.api_url {
        profile.api_url = Some(url.clone());
    }
    if global.anonymous {
        profile.audience = None;
    }

    let mut mc = vitrina_config::profile_to_marketplace_config(
        &profile,
        &profile_name,
        &cfg.defaults,
        &SecretSources::system(),
    )?;

    if global.anonymous {
        mc.auth = AuthCredentials::Anonymous;
    }
    if global.no_mock {
        mc.mock.enabled = false;
    }
    if let Some(secs) = global.timeout {
        mc.timeout = Duration::from_secs(secs);
    }
    Ok(mc)
}
