// ── Runtime marketplace configuration ──
//
// Describes which backend to talk to and how to behave. Carries
// credentials but never touches disk: the CLI builds a
// `MarketplaceConfig` from its profile and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::mock::MockDay;

/// Which sign-in door configured credentials go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Shop,
    Client,
}

/// How `Marketplace::connect` signs in, if at all.
#[derive(Debug, Clone, Default)]
pub enum AuthCredentials {
    /// Browse anonymously.
    #[default]
    Anonymous,
    Password {
        audience: Audience,
        email: String,
        password: SecretString,
    },
    /// A previously issued provider token.
    Token(SecretString),
}

/// Placeholder content settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSettings {
    pub enabled: bool,
    pub streams: usize,
    pub reels: usize,
    /// Fixed calendar day; `None` means today in local time.
    pub day: Option<MockDay>,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            streams: 10,
            reels: 6,
            day: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    /// Marketplace REST API base, e.g. `https://api.vitrina.example/v1/`.
    pub api_url: Url,
    /// Identity provider base, e.g. `https://identitytoolkit.googleapis.com/v1/`.
    pub identity_url: Url,
    pub identity_key: SecretString,
    /// Origin reported for federated sign-in.
    pub request_uri: String,
    pub auth: AuthCredentials,
    pub timeout: Duration,
    pub mock: MockSettings,
    /// Expired-reel sweep period (seconds). 0 = never.
    pub reel_sweep_interval_secs: u64,
    /// Full refresh period (seconds). 0 = never.
    pub refresh_interval_secs: u64,
    /// Spawn a background full refresh after each successful mutation.
    pub refresh_after_mutation: bool,
}

impl MarketplaceConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_REEL_SWEEP_SECS: u64 = 60;

    pub fn new(api_url: Url, identity_url: Url, identity_key: SecretString) -> Self {
        Self {
            api_url,
            identity_url,
            identity_key,
            request_uri: "http://localhost".into(),
            auth: AuthCredentials::Anonymous,
            timeout: Self::DEFAULT_TIMEOUT,
            mock: MockSettings::default(),
            reel_sweep_interval_secs: Self::DEFAULT_REEL_SWEEP_SECS,
            refresh_interval_secs: 0,
            refresh_after_mutation: true,
        }
    }
}
