use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:8001").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// PostgreSQL connection string
    pub database_url: String,

    /// fal.ai API key
    pub fal_key: String,

    /// fal.ai model id
    #[serde(default = "default_fal_model")]
    pub fal_model: String,

    /// Base URL of the fal.ai queue API
    #[serde(default = "default_fal_queue_url")]
    pub fal_queue_url: String,

    /// Delay between job status polls, in milliseconds
    #[serde(default = "default_fal_poll_interval_ms")]
    pub fal_poll_interval_ms: u64,

    /// Largest accepted request body. Two base64 photos need headroom.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8001".to_string()
}

fn default_fal_model() -> String {
    "fal-ai/flux/dev".to_string()
}

fn default_fal_queue_url() -> String {
    "https://queue.fal.run".to_string()
}

fn default_fal_poll_interval_ms() -> u64 {
    500
}

fn default_max_body_bytes() -> usize {
    20 * 1024 * 1024
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
