use async_trait::async_trait;
use reqwest::{Client, Response, multipart};
use serde::de::DeserializeOwned;

use super::DashboardError;
use crate::db::models::{
    DailyVisitCount, IdentityField, IdentityFieldUpdate, NewProgram, ProgramEntry, UploadedFile,
};

/// The backend calls the dashboard makes. Each call is independent; there is
/// no transaction across them.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_identity(&self) -> Result<Vec<IdentityField>, DashboardError>;

    async fn update_identity(
        &self,
        updates: &[IdentityFieldUpdate],
    ) -> Result<Vec<IdentityField>, DashboardError>;

    async fn list_programs(&self) -> Result<Vec<ProgramEntry>, DashboardError>;

    /// Appends programs to the catalog (no implicit clear).
    async fn add_programs(&self, programs: &[NewProgram]) -> Result<Vec<ProgramEntry>, DashboardError>;

    async fn clear_programs(&self) -> Result<(), DashboardError>;

    async fn upload_structure_image(&self, file: UploadedFile) -> Result<IdentityField, DashboardError>;

    async fn recent_visits(&self, days: u64) -> Result<Vec<DailyVisitCount>, DashboardError>;
}

/// [`AdminApi`] over the portal's HTTP endpoints.
pub struct HttpAdminApi {
    client: Client,
    base_url: String,
}

impl HttpAdminApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turns a non-2xx response into [`DashboardError::Status`], using the
    /// server's `{"error": ...}` body when it has one.
    async fn check(response: Response) -> Result<Response, DashboardError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_owned))
            .unwrap_or(text);
        Err(DashboardError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, DashboardError> {
        Ok(Self::check(response).await?.json::<T>().await?)
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn list_identity(&self) -> Result<Vec<IdentityField>, DashboardError> {
        let response = self.client.get(self.url("/api/identitas")).send().await?;
        Self::json(response).await
    }

    async fn update_identity(
        &self,
        updates: &[IdentityFieldUpdate],
    ) -> Result<Vec<IdentityField>, DashboardError> {
        let response = self
            .client
            .put(self.url("/api/identitasDetails"))
            .json(updates)
            .send()
            .await?;
        Self::json(response).await
    }

    async fn list_programs(&self) -> Result<Vec<ProgramEntry>, DashboardError> {
        let response = self.client.get(self.url("/api/prodi")).send().await?;
        Self::json(response).await
    }

    async fn add_programs(&self, programs: &[NewProgram]) -> Result<Vec<ProgramEntry>, DashboardError> {
        let response = self
            .client
            .post(self.url("/api/prodi"))
            .json(programs)
            .send()
            .await?;
        Self::json(response).await
    }

    async fn clear_programs(&self) -> Result<(), DashboardError> {
        let response = self.client.delete(self.url("/api/prodi")).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn upload_structure_image(&self, file: UploadedFile) -> Result<IdentityField, DashboardError> {
        let mime = mime_guess::from_path(&file.file_name).first_or_octet_stream();
        let part = multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name)
            .mime_str(mime.essence_str())?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .put(self.url("/api/strukturorganisasi"))
            .multipart(form)
            .send()
            .await?;
        Self::json(response).await
    }

    async fn recent_visits(&self, days: u64) -> Result<Vec<DailyVisitCount>, DashboardError> {
        let response = self
            .client
            .get(self.url("/api/visits"))
            .query(&[("days", days)])
            .send()
            .await?;
        Self::json(response).await
    }
}
