//! Shared configuration for the Vitrina CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `vitrina_core::MarketplaceConfig`. The CLI adds
//! flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use vitrina_core::{Audience, AuthCredentials, MarketplaceConfig, MockSettings};

/// Keyring service name for stored secrets.
pub const KEYRING_SERVICE: &str = "vitrina";

pub const ENV_API_URL: &str = "VITRINA_API_URL";
pub const ENV_IDENTITY_URL: &str = "VITRINA_IDENTITY_URL";
pub const ENV_IDENTITY_KEY: &str = "VITRINA_IDENTITY_KEY";
pub const ENV_EMAIL: &str = "VITRINA_EMAIL";
pub const ENV_PASSWORD: &str = "VITRINA_PASSWORD";
pub const ENV_TOKEN: &str = "VITRINA_TOKEN";

const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1/";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {what} configured for profile '{profile}'")]
    Missing { what: String, profile: String },

    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, falling back to the default profile.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile(name.into()))
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Fill empty days with placeholder streams and reels.
    #[serde(default = "default_mock")]
    pub mock: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            mock: default_mock(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_mock() -> bool {
    true
}

/// A named backend profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Marketplace API base URL (e.g., "https://api.vitrina.example/v1").
    pub api_url: Option<String>,

    /// Identity provider base URL.
    pub identity_url: Option<String>,

    /// Identity provider API key (plaintext; prefer keyring or env var).
    pub identity_key: Option<String>,

    /// Environment variable name containing the identity API key.
    pub identity_key_env: Option<String>,

    /// Sign-in door: "shop" or "client". Unset browses anonymously.
    pub audience: Option<String>,

    /// Account email for password sign-in.
    pub email: Option<String>,

    /// Password (plaintext; prefer keyring).
    pub password: Option<String>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override placeholder content.
    pub mock: Option<bool>,

    /// Expired-reel sweep period in seconds.
    pub reel_sweep_secs: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "vitrina", "vitrina").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("vitrina");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. Nested keys come from the environment as
/// `VITRINA_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VITRINA_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Store a profile secret (`password`, `identity-key`) in the system
/// keyring under `{profile}/{kind}`.
pub fn store_secret(profile_name: &str, kind: &str, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{kind}"))?;
    entry.set_password(secret)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Where secrets come from. Production reads the process environment and
/// the system keyring.
pub struct SecretSources<'a> {
    pub env: &'a dyn Fn(&str) -> Option<String>,
    pub keyring: &'a dyn Fn(&str) -> Option<String>,
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn system_keyring(account: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, account)
        .and_then(|entry| entry.get_password())
        .ok()
}

impl SecretSources<'static> {
    pub fn system() -> Self {
        Self {
            env: &process_env,
            keyring: &system_keyring,
        }
    }
}

/// Env var → keyring (`{profile}/{account}`) → plaintext.
fn resolve_secret(
    sources: &SecretSources<'_>,
    env_names: &[&str],
    keyring_account: &str,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    env_names
        .iter()
        .find_map(|name| (sources.env)(name))
        .or_else(|| (sources.keyring)(keyring_account))
        .or_else(|| plaintext.map(str::to_owned))
        .map(SecretString::from)
}

/// Resolve the identity provider API key.
pub fn resolve_identity_key(
    profile: &Profile,
    profile_name: &str,
    sources: &SecretSources<'_>,
) -> Result<SecretString, ConfigError> {
    let mut env_names = Vec::with_capacity(2);
    if let Some(ref custom) = profile.identity_key_env {
        env_names.push(custom.as_str());
    }
    env_names.push(ENV_IDENTITY_KEY);

    resolve_secret(
        sources,
        &env_names,
        &format!("{profile_name}/identity-key"),
        profile.identity_key.as_deref(),
    )
    .ok_or_else(|| ConfigError::Missing {
        what: "identity API key".into(),
        profile: profile_name.into(),
    })
}

/// Resolve `AuthCredentials`: a stored token wins, then the profile's
/// audience with email + password, else anonymous browsing.
pub fn resolve_auth(
    profile: &Profile,
    profile_name: &str,
    sources: &SecretSources<'_>,
) -> Result<AuthCredentials, ConfigError> {
    if let Some(token) = (sources.env)(ENV_TOKEN) {
        return Ok(AuthCredentials::Token(SecretString::from(token)));
    }

    let audience = match profile.audience.as_deref() {
        None => return Ok(AuthCredentials::Anonymous),
        Some(raw) => parse_audience(raw)?,
    };

    let email = (sources.env)(ENV_EMAIL)
        .or_else(|| profile.email.clone())
        .ok_or_else(|| ConfigError::Missing {
            what: "email".into(),
            profile: profile_name.into(),
        })?;

    let password = resolve_secret(
        sources,
        &[ENV_PASSWORD],
        &format!("{profile_name}/password"),
        profile.password.as_deref(),
    )
    .ok_or_else(|| ConfigError::Missing {
        what: "password".into(),
        profile: profile_name.into(),
    })?;

    Ok(AuthCredentials::Password {
        audience,
        email,
        password,
    })
}

pub fn parse_audience(raw: &str) -> Result<Audience, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "shop" | "tienda" => Ok(Audience::Shop),
        "client" | "cliente" => Ok(Audience::Client),
        other => Err(ConfigError::Validation {
            field: "audience".into(),
            reason: format!("expected 'shop' or 'client', got '{other}'"),
        }),
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// Build a `MarketplaceConfig` from a profile. No CLI flag overrides.
///
/// URLs from `VITRINA_API_URL` / `VITRINA_IDENTITY_URL` take precedence
/// over the profile.
pub fn profile_to_marketplace_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    sources: &SecretSources<'_>,
) -> Result<MarketplaceConfig, ConfigError> {
    let api_raw = (sources.env)(ENV_API_URL)
        .or_else(|| profile.api_url.clone())
        .ok_or_else(|| ConfigError::Missing {
            what: "API URL".into(),
            profile: profile_name.into(),
        })?;
    let identity_raw = (sources.env)(ENV_IDENTITY_URL)
        .or_else(|| profile.identity_url.clone())
        .unwrap_or_else(|| DEFAULT_IDENTITY_URL.into());

    let mut cfg = MarketplaceConfig::new(
        parse_url("api_url", &api_raw)?,
        parse_url("identity_url", &identity_raw)?,
        resolve_identity_key(profile, profile_name, sources)?,
    );
    cfg.auth = resolve_auth(profile, profile_name, sources)?;
    cfg.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    cfg.mock = MockSettings {
        enabled: profile.mock.unwrap_or(defaults.mock),
        ..MockSettings::default()
    };
    if let Some(secs) = profile.reel_sweep_secs {
        cfg.reel_sweep_interval_secs = secs;
    }
    Ok(cfg)
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn no_secret(_: &str) -> Option<String> {
        None
    }

    fn profile() -> Profile {
        Profile {
            api_url: Some("https://api.vitrina.example/v1/".into()),
            identity_key: Some("plain-key".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "prod"

[defaults]
output = "json"

[profiles.prod]
api_url = "https://api.vitrina.example/v1/"
audience = "shop"
email = "tienda@example.com"
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.output, "json");
        assert!(cfg.defaults.mock);

        let (name, prof) = cfg.profile(None).unwrap();
        assert_eq!(name, "prod");
        assert_eq!(prof.audience.as_deref(), Some("shop"));
        assert!(cfg.profile(Some("staging")).is_err());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert("default".into(), profile());

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(
            loaded.profiles["default"].api_url.as_deref(),
            Some("https://api.vitrina.example/v1/")
        );
    }

    #[test]
    fn anonymous_without_audience() {
        let sources = SecretSources {
            env: &no_secret,
            keyring: &no_secret,
        };
        let auth = resolve_auth(&profile(), "default", &sources).unwrap();
        assert!(matches!(auth, AuthCredentials::Anonymous));
    }

    #[test]
    fn env_beats_keyring_beats_plaintext() {
        let mut p = profile();
        p.audience = Some("client".into());
        p.email = Some("ana@example.com".into());
        p.password = Some("plain".into());

        let env: HashMap<&str, &str> = HashMap::from([(ENV_PASSWORD, "from-env")]);
        let env_lookup = |k: &str| env.get(k).map(|v| (*v).to_owned());
        let keyring_lookup = |k: &str| (k == "default/password").then(|| "from-keyring".to_owned());

        let with_env = SecretSources {
            env: &env_lookup,
            keyring: &keyring_lookup,
        };
        let AuthCredentials::Password {
            audience, password, ..
        } = resolve_auth(&p, "default", &with_env).unwrap()
        else {
            panic!("expected password credentials");
        };
        assert_eq!(audience, Audience::Client);
        assert_eq!(password.expose_secret(), "from-env");

        let keyring_only = SecretSources {
            env: &no_secret,
            keyring: &keyring_lookup,
        };
        let AuthCredentials::Password { password, .. } =
            resolve_auth(&p, "default", &keyring_only).unwrap()
        else {
            panic!("expected password credentials");
        };
        assert_eq!(password.expose_secret(), "from-keyring");

        let plaintext = SecretSources {
            env: &no_secret,
            keyring: &no_secret,
        };
        let AuthCredentials::Password { password, .. } =
            resolve_auth(&p, "default", &plaintext).unwrap()
        else {
            panic!("expected password credentials");
        };
        assert_eq!(password.expose_secret(), "plain");
    }

    #[test]
    fn token_env_overrides_profile_audience() {
        let mut p = profile();
        p.audience = Some("shop".into());
        let env_lookup = |k: &str| (k == ENV_TOKEN).then(|| "tok".to_owned());
        let sources = SecretSources {
            env: &env_lookup,
            keyring: &no_secret,
        };
        assert!(matches!(
            resolve_auth(&p, "default", &sources).unwrap(),
            AuthCredentials::Token(_)
        ));
    }

    #[test]
    fn missing_password_is_reported() {
        let mut p = profile();
        p.audience = Some("shop".into());
        p.email = Some("tienda@example.com".into());
        let sources = SecretSources {
            env: &no_secret,
            keyring: &no_secret,
        };
        let err = resolve_auth(&p, "default", &sources).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { ref what, .. } if what == "password"));
    }

    #[test]
    fn bad_audience_is_rejected() {
        assert!(parse_audience("Tienda").is_ok());
        assert!(parse_audience("vendor").is_err());
    }

    #[test]
    fn builds_marketplace_config_with_env_url() {
        let env_lookup =
            |k: &str| (k == ENV_API_URL).then(|| "https://staging.vitrina.example/".to_owned());
        let sources = SecretSources {
            env: &env_lookup,
            keyring: &no_secret,
        };
        let mut p = profile();
        p.mock = Some(false);
        p.timeout = Some(5);

        let cfg =
            profile_to_marketplace_config(&p, "default", &Defaults::default(), &sources).unwrap();
        assert_eq!(cfg.api_url.as_str(), "https://staging.vitrina.example/");
        assert_eq!(cfg.identity_url.as_str(), DEFAULT_IDENTITY_URL);
        assert_eq!(cfg.identity_key.expose_secret(), "plain-key");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert!(!cfg.mock.enabled);
    }

    #[test]
    fn missing_api_url_is_reported() {
        let sources = SecretSources {
            env: &no_secret,
            keyring: &no_secret,
        };
        let p = Profile {
            identity_key: Some("k".into()),
            ..Profile::default()
        };
        let err = profile_to_marketplace_config(&p, "default", &Defaults::default(), &sources)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }
}
