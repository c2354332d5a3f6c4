use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables forwarded to the image model with every request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenerationParams {
    pub image_size: String,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    pub num_images: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            image_size: "portrait".to_string(),
            num_inference_steps: 28,
            guidance_scale: 3.5,
            num_images: 1,
        }
    }
}

/// One unit of work for the image provider.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(flatten)]
    pub params: GenerationParams,
}

/// Something that turns a prompt into a generated image reference.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Submit the request and wait for a terminal result. Returns the URL of
    /// the first generated image.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, JobError>;
}

/// Client for the fal.ai queue API.
pub struct FalClient {
    http: Client,
    queue_url: String,
    model: String,
    api_key: String,
    poll_interval: Duration,
}

#[derive(Debug, Deserialize)]
struct QueueHandle {
    request_id: String,
    status_url: String,
    response_url: String,
}

#[derive(Debug, Deserialize)]
struct QueueStatus {
    status: String,
}

#[derive(Debug, Deserialize)]
struct GenerationOutput {
    #[serde(default)]
    images: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: String,
}

impl FalClient {
    pub fn new(queue_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            http: Client::new(),
            queue_url: queue_url.trim_end_matches('/').to_string(),
            model: model.trim_matches('/').to_string(),
            api_key: api_key.to_string(),
            poll_interval: Duration::from_millis(500),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    fn auth_header(&self) -> String {
        format!("Key {}", self.api_key)
    }

    async fn submit(&self, request: &GenerationRequest) -> Result<QueueHandle, JobError> {
        let url = format!("{}/{}", self.queue_url, self.model);
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, JobError> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl ImageGenerator for FalClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, JobError> {
        let handle = self.submit(request).await?;
        tracing::info!(request_id = %handle.request_id, model = %self.model, "Submitted generation job");

        loop {
            let status: QueueStatus = self.fetch(&handle.status_url).await?;
            match status.status.as_str() {
                "COMPLETED" => break,
                "IN_QUEUE" | "IN_PROGRESS" => {
                    tracing::trace!(request_id = %handle.request_id, status = %status.status, "Job still running");
                    tokio::time::sleep(self.poll_interval).await;
                }
                other => return Err(JobError::UnexpectedStatus(other.to_string())),
            }
        }

        let output: GenerationOutput = self.fetch(&handle.response_url).await?;
        let url = first_image_url(output)?;
        tracing::info!(request_id = %handle.request_id, image_url = %url, "Generation job completed");
        Ok(url)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, JobError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(JobError::Provider {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }
    Ok(serde_json::from_slice(&body)?)
}

fn first_image_url(output: GenerationOutput) -> Result<String, JobError> {
    output
        .images
        .into_iter()
        .find(|image| !image.url.trim().is_empty())
        .map(|image| image.url)
        .ok_or(JobError::NoImages)
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Malformed provider response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unexpected job status: {0}")]
    UnexpectedStatus(String),

    #[error("No images generated by fal.ai")]
    NoImages,
}
