//! HTTP client for the metadata-preparation backend.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use tknz_common::metadata::{MetadataConnector, PrepareMetadataRequest, PrepareMetadataResponse};
use tknz_common::Error as CommonError;

use super::Error;

/// Bounded wait for the backend; it may be cold-starting.
const BACKEND_TIMEOUT: Duration = Duration::from_secs(60);

/// Metadata-preparation client with async HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpMetadataClient {
    base: Url,
    client: reqwest::Client,
}

impl HttpMetadataClient {
    /// New client for the given backend base URL.
    pub fn new(base: Url) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(BACKEND_TIMEOUT).build()?;
        Ok(Self { base, client })
    }
}

#[async_trait]
impl MetadataConnector for HttpMetadataClient {
    async fn prepare(
        &self,
        request: PrepareMetadataRequest,
    ) -> Result<PrepareMetadataResponse, CommonError> {
        let url = self
            .base
            .join("prepare-metadata")
            .map_err(|err| CommonError::Custom(err.to_string()))?;

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest)?;

        if !status.is_success() {
            return Err(CommonError::MetadataApi {
                status: status.as_u16(),
                detail: body,
            });
        }

        serde_json::from_str(&body).map_err(|err| {
            tracing::warn!("metadata response parse error: {}", err);
            CommonError::Json(err)
        })
    }

    fn wake(&self) {
        let Ok(url) = self.base.join("gm") else {
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            // Outcome ignored entirely; this only mitigates cold starts.
            let _ = client.get(url).send().await;
        });
    }
}

/// A reqwest timeout means the bounded wait was exceeded; everything else
/// is a transport failure.
fn map_reqwest(err: reqwest::Error) -> CommonError {
    if err.is_timeout() {
        CommonError::BackendTimeout
    } else {
        CommonError::Http(err.to_string())
    }
}
