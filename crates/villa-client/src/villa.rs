//! Villa operations.
use super::VillaApiClient;
use crate::error::{ClientError, ResponseExt};
use async_trait::async_trait;
use villa_model::{VillaCreateDto, VillaDto, VillaUpdateDto};

#[async_trait]
pub trait VillaService {
    async fn get_all(&self) -> Result<Vec<VillaDto>, ClientError>;
    async fn get(&self, id: i32) -> Result<VillaDto, ClientError>;
    async fn create(&self, villa: &VillaCreateDto) -> Result<VillaDto, ClientError>;
    async fn update(&self, villa: &VillaUpdateDto) -> Result<(), ClientError>;
    async fn delete(&self, id: i32) -> Result<(), ClientError>;
}

impl VillaApiClient {
    fn villa_url(&self) -> String {
        format!("{}/api/VillaAPI", self.url)
    }
}

#[async_trait]
impl VillaService for VillaApiClient {
    #[tracing::instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<VillaDto>, ClientError> {
        let response = self
            .client
            .get(self.villa_url())
            .send()
            .await
            .map_client_error()
            .await?;

        response.json::<Vec<VillaDto>>().await.map_err(|e| {
            ClientError::Generic(anyhow::anyhow!(
                "unable to parse response from get_all villas: {}",
                e
            ))
        })
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: i32) -> Result<VillaDto, ClientError> {
        let response = self
            .client
            .get(format!("{}/{}", self.villa_url(), id))
            .send()
            .await
            .map_client_error()
            .await?;

        response.json::<VillaDto>().await.map_err(|e| {
            ClientError::Generic(anyhow::anyhow!(
                "unable to parse response from get villa: {}",
                e
            ))
        })
    }

    #[tracing::instrument(skip(self, villa), fields(name = %villa.name))]
    async fn create(&self, villa: &VillaCreateDto) -> Result<VillaDto, ClientError> {
        let response = self
            .client
            .post(self.villa_url())
            .json(villa)
            .send()
            .await
            .map_client_error()
            .await?;

        response.json::<VillaDto>().await.map_err(|e| {
            ClientError::Generic(anyhow::anyhow!(
                "unable to parse response from create villa: {}",
                e
            ))
        })
    }

    #[tracing::instrument(skip(self, villa), fields(id = villa.id))]
    async fn update(&self, villa: &VillaUpdateDto) -> Result<(), ClientError> {
        self.client
            .put(format!("{}/{}", self.villa_url(), villa.id))
            .json(villa)
            .send()
            .await
            .map_client_error()
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<(), ClientError> {
        self.client
            .delete(format!("{}/{}", self.villa_url(), id))
            .send()
            .await
            .map_client_error()
            .await?;
        Ok(())
    }
}
