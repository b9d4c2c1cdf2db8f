// siteview-api: Async HTTP client for fetching site.json content manifests

pub mod client;
pub mod error;
pub mod transport;

pub use client::ManifestClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
