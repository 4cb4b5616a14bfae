use std::future::Future;
use std::pin::Pin;

use shared::models::{GenerateRequest, GenerateResponse};
use thiserror::Error;

pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GenerateResponse, GenerateApiError>> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum GenerateApiError {
    #[error("generation request failed: {0}")]
    Transport(String),
    #[error("generation endpoint returned an unreadable body (status {status}): {reason}")]
    Decode { status: u16, reason: String },
}

pub trait GenerateApi: Send + Sync {
    fn generate<'a>(&'a self, request: GenerateRequest) -> GenerateFuture<'a>;
}

/// Calls `POST /api/generate`. Error statuses still carry a JSON envelope, so
/// the body is decoded whatever the status code.
#[derive(Debug, Clone)]
pub struct HttpGenerateApi {
    client: reqwest::Client,
    generate_url: String,
}

impl HttpGenerateApi {
    pub fn new(generate_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), generate_url)
    }

    pub fn with_client(client: reqwest::Client, generate_url: impl Into<String>) -> Self {
        Self {
            client,
            generate_url: generate_url.into(),
        }
    }

    pub fn generate_url(&self) -> &str {
        &self.generate_url
    }

    async fn send_once(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, GenerateApiError> {
        let response = self
            .client
            .post(&self.generate_url)
            .json(request)
            .send()
            .await
            .map_err(|err| GenerateApiError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| GenerateApiError::Transport(err.to_string()))?;

        serde_json::from_slice::<GenerateResponse>(&body).map_err(|err| GenerateApiError::Decode {
            status,
            reason: err.to_string(),
        })
    }
}

impl GenerateApi for HttpGenerateApi {
    fn generate<'a>(&'a self, request: GenerateRequest) -> GenerateFuture<'a> {
        Box::pin(async move { self.send_once(&request).await })
    }
}
