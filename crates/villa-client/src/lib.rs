//! Typed HTTP client for the villa API.
//!
//! [`VillaApiClient`] implements [`VillaService`] and [`VillaNumberService`],
//! one explicit method per remote operation with a concrete result type.
pub mod error;
pub mod villa;
pub mod villa_number;

pub use error::ClientError;
pub use villa::VillaService;
pub use villa_number::VillaNumberService;

#[derive(Clone, Debug)]
pub struct VillaApiClient {
    url: String,
    client: reqwest::Client,
}

impl VillaApiClient {
    /// `url` is the service root, e.g. `http://localhost:8080`.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        let url = url.into().trim_end_matches('/').to_string();
        Self { url, client }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
