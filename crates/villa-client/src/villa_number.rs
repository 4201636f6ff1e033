//! Villa number operations.
//!
//! The service wraps villa number results in an [`ApiResponse`] envelope;
//! these calls unwrap it and turn `isSuccess: false` into
//! [`ClientError::Api`].
use super::VillaApiClient;
use crate::error::{ClientError, ResponseExt};
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use villa_model::{ApiResponse, VillaNumberCreateDto, VillaNumberDto, VillaNumberUpdateDto};

#[async_trait]
pub trait VillaNumberService {
    async fn get_all(&self) -> Result<Vec<VillaNumberDto>, ClientError>;
    async fn get(&self, villa_no: i32) -> Result<VillaNumberDto, ClientError>;
    async fn create(&self, number: &VillaNumberCreateDto) -> Result<VillaNumberDto, ClientError>;
    async fn update(&self, number: &VillaNumberUpdateDto) -> Result<(), ClientError>;
    async fn delete(&self, villa_no: i32) -> Result<(), ClientError>;
}

impl VillaApiClient {
    fn villa_number_url(&self) -> String {
        format!("{}/api/VillaNumberAPI", self.url)
    }
}

/// Read an envelope body; an empty 204 yields `None`.
async fn read_envelope<T: DeserializeOwned>(
    response: Response,
    operation: &str,
) -> Result<Option<T>, ClientError> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    let envelope = response.json::<ApiResponse<T>>().await.map_err(|e| {
        ClientError::Generic(anyhow::anyhow!(
            "unable to parse response from {}: {}",
            operation,
            e
        ))
    })?;
    if !envelope.is_success {
        return Err(ClientError::Api {
            status_code: envelope.status_code,
            messages: envelope.error_messages,
        });
    }
    Ok(envelope.result)
}

fn require_result<T>(result: Option<T>, operation: &str) -> Result<T, ClientError> {
    result.ok_or_else(|| {
        ClientError::Generic(anyhow::anyhow!("{} returned no result", operation))
    })
}

#[async_trait]
impl VillaNumberService for VillaApiClient {
    #[tracing::instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<VillaNumberDto>, ClientError> {
        let response = self
            .client
            .get(self.villa_number_url())
            .send()
            .await
            .map_client_error()
            .await?;
        let result = read_envelope::<Vec<VillaNumberDto>>(response, "get_all villa numbers").await?;
        Ok(result.unwrap_or_default())
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, villa_no: i32) -> Result<VillaNumberDto, ClientError> {
        let response = self
            .client
            .get(format!("{}/{}", self.villa_number_url(), villa_no))
            .send()
            .await
            .map_client_error()
            .await?;
        let result = read_envelope::<VillaNumberDto>(response, "get villa number").await?;
        require_result(result, "get villa number")
    }

    #[tracing::instrument(skip(self, number), fields(villa_no = number.villa_no))]
    async fn create(&self, number: &VillaNumberCreateDto) -> Result<VillaNumberDto, ClientError> {
        let response = self
            .client
            .post(self.villa_number_url())
            .json(number)
            .send()
            .await
            .map_client_error()
            .await?;
        let result = read_envelope::<VillaNumberDto>(response, "create villa number").await?;
        require_result(result, "create villa number")
    }

    #[tracing::instrument(skip(self, number), fields(villa_no = number.villa_no))]
    async fn update(&self, number: &VillaNumberUpdateDto) -> Result<(), ClientError> {
        let response = self
            .client
            .put(format!("{}/{}", self.villa_number_url(), number.villa_no))
            .json(number)
            .send()
            .await
            .map_client_error()
            .await?;
        read_envelope::<villa_model::Empty>(response, "update villa number").await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, villa_no: i32) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(format!("{}/{}", self.villa_number_url(), villa_no))
            .send()
            .await
            .map_client_error()
            .await?;
        read_envelope::<villa_model::Empty>(response, "delete villa number").await?;
        Ok(())
    }
}
