// vitrina-api: Async Rust client for the Vitrina marketplace API and identity provider.

pub mod client;
pub mod error;
pub mod identity;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::Error;
pub use identity::{IdentityClient, IdentitySession};
pub use transport::TransportConfig;
