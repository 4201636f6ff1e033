use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{Error, Response, StatusCode};

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("request error: {0}")]
    Generic(#[from] anyhow::Error),
    #[error("network error: {status_code} {message}")]
    NetworkError { status_code: u16, message: String },
    /// The service answered with an envelope whose `isSuccess` is false.
    #[error("api error: {status_code} {}", .messages.join("; "))]
    Api {
        status_code: u16,
        messages: Vec<String>,
    },
}

impl ClientError {
    /// HTTP or envelope status, when the service answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Generic(_) => None,
            ClientError::NetworkError { status_code, .. } | ClientError::Api { status_code, .. } => {
                Some(*status_code)
            }
        }
    }
}

#[async_trait]
pub trait ResponseExt {
    async fn map_client_error(self) -> Result<Response, ClientError>;
}

#[async_trait]
impl ResponseExt for Response {
    async fn map_client_error(self) -> Result<Response, ClientError> {
        match self.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED | StatusCode::NO_CONTENT => {
                Ok(self)
            }
            status => Err(ClientError::NetworkError {
                status_code: status.as_u16(),
                message: self.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl ResponseExt for Result<Response, Error> {
    async fn map_client_error(self) -> Result<Response, ClientError> {
        match self {
            Ok(response) => response.map_client_error().await,
            Err(e) => Err(ClientError::Generic(anyhow!(e.to_string()))),
        }
    }
}
