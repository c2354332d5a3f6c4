use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Lifecycle status of a try-on record.
///
/// A record starts out `Processing` and moves exactly once to one of the
/// terminal states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, AsRefStr, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TryOnStatus {
    Processing,
    Completed,
    Failed,
}

impl TryOnStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TryOnStatus::Processing)
    }
}

/// Body measurements supplied by the user. Forwarded into the prompt verbatim,
/// never parsed as numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Measurements {
    pub height: String,
    pub weight: String,
    pub chest: String,
    pub waist: String,
    pub hips: String,
}

/// Incoming try-on request as posted to `/api/tryon/generate`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TryOnRequest {
    #[garde(length(min = 1))]
    #[serde(default)]
    pub user_image: String,

    #[garde(length(min = 1))]
    #[serde(default)]
    pub clothing_image: String,

    #[garde(custom(non_blank))]
    #[serde(default)]
    pub name: String,

    #[garde(skip)]
    pub measurements: Measurements,

    #[garde(skip)]
    #[serde(default = "default_style")]
    pub style: String,
}

fn default_style() -> String {
    "casual".to_string()
}

fn non_blank(value: &str, _context: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("must not be blank"));
    }
    Ok(())
}

/// A persisted try-on result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TryOnRecord {
    pub id: Uuid,
    pub name: String,
    pub measurements: Measurements,
    pub style: String,
    /// Reference to the generated image (the provider's URL).
    pub tryon_image: Option<String>,
    pub feedback: Option<String>,
    pub status: TryOnStatus,
    pub created_at: DateTime<Utc>,
}

impl TryOnRecord {
    /// Start a new record in the `processing` state.
    pub fn new(name: String, measurements: Measurements, style: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            measurements,
            style,
            tryon_image: None,
            feedback: None,
            status: TryOnStatus::Processing,
            created_at: Utc::now(),
        }
    }

    /// Apply a terminal update. Returns `false` (and leaves the record alone)
    /// if the record has already settled.
    pub fn apply(&mut self, update: &TryOnUpdate) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        match update {
            TryOnUpdate::Completed {
                tryon_image,
                feedback,
            } => {
                self.tryon_image = Some(tryon_image.clone());
                self.feedback = Some(feedback.clone());
                self.status = TryOnStatus::Completed;
            }
            TryOnUpdate::Failed => {
                self.status = TryOnStatus::Failed;
            }
        }
        true
    }
}

/// The single transition a record goes through after its job settles.
#[derive(Debug, Clone, PartialEq)]
pub enum TryOnUpdate {
    Completed { tryon_image: String, feedback: String },
    Failed,
}

impl TryOnUpdate {
    pub fn status(&self) -> TryOnStatus {
        match self {
            TryOnUpdate::Completed { .. } => TryOnStatus::Completed,
            TryOnUpdate::Failed => TryOnStatus::Failed,
        }
    }
}

/// Response to a successful generate call.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub id: Uuid,
    pub tryon_image: Option<String>,
    pub feedback: Option<String>,
    pub status: TryOnStatus,
}

impl From<TryOnRecord> for GenerateResponse {
    fn from(record: TryOnRecord) -> Self {
        Self {
            success: true,
            id: record.id,
            tryon_image: record.tryon_image,
            feedback: record.feedback,
            status: record.status,
        }
    }
}

/// Response for `/api/tryon/{id}/base64`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageResponse {
    pub success: bool,
    pub image_base64: String,
    pub id: Uuid,
}
