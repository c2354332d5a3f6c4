use garde::Validate;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::db::RecordStore;
use crate::error::TryOnError;
use crate::models::tryon::{Measurements, TryOnRecord, TryOnRequest, TryOnStatus, TryOnUpdate};
use crate::services::fal::{GenerationParams, GenerationRequest, ImageGenerator};
use crate::services::images;

/// Cap applied by `/api/tryons`.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// A generated image reference that belongs to a completed record.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub id: Uuid,
    pub reference: String,
}

/// Drives a try-on request from validation through generation to the final
/// record update.
pub struct TryOnService {
    store: Arc<dyn RecordStore>,
    generator: Arc<dyn ImageGenerator>,
    params: GenerationParams,
}

impl TryOnService {
    pub fn new(store: Arc<dyn RecordStore>, generator: Arc<dyn ImageGenerator>) -> Self {
        Self {
            store,
            generator,
            params: GenerationParams::default(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Validate, persist a `processing` record, run the generation job and
    /// settle the record. A failed job leaves the record `failed`.
    pub async fn submit(&self, request: TryOnRequest) -> Result<TryOnRecord, TryOnError> {
        if let Err(report) = request.validate() {
            let field = report
                .iter()
                .next()
                .map(|(path, _)| path.to_string())
                .unwrap_or_else(|| "request".to_string());
            return Err(TryOnError::Validation(format!("{field} is required")));
        }

        metrics::counter!("tryon_requests_total").increment(1);
        let TryOnRequest {
            user_image,
            clothing_image,
            name,
            measurements,
            style,
        } = request;

        let mut record = TryOnRecord::new(name, measurements, style);
        self.store.insert_tryon(&record).await?;
        tracing::info!(tryon_id = %record.id, name = %record.name, "Received try-on request");

        let tryon_image = match self.run_generation(&record, &user_image, &clothing_image).await {
            Ok(tryon_image) => tryon_image,
            Err(message) => return Err(self.fail(&record, message).await),
        };

        let update = TryOnUpdate::Completed {
            tryon_image,
            feedback: format!(
                "Virtual try-on generated successfully for {} style!",
                record.style
            ),
        };
        match self.store.update_tryon(record.id, &update).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(tryon_id = %record.id, "Record was already settled");
                return match self.store.find_tryon(record.id).await? {
                    Some(stored) if stored.status == TryOnStatus::Completed => Ok(stored),
                    _ => Err(TryOnError::Generation(
                        "Try-on record was settled by another writer".to_string(),
                    )),
                };
            }
            Err(e) => {
                tracing::error!(tryon_id = %record.id, error = %e, "Failed to store try-on result");
                self.mark_failed(&record).await;
                metrics::counter!("tryon_failed_total").increment(1);
                return Err(TryOnError::Store(e));
            }
        }

        record.apply(&update);
        metrics::counter!("tryon_completed_total").increment(1);
        tracing::info!(tryon_id = %record.id, "Try-on completed");
        Ok(record)
    }

    async fn fail(&self, record: &TryOnRecord, message: String) -> TryOnError {
        metrics::counter!("tryon_failed_total").increment(1);
        tracing::error!(tryon_id = %record.id, error = %message, "Try-on generation failed");
        self.mark_failed(record).await;
        TryOnError::Generation(message)
    }

    async fn mark_failed(&self, record: &TryOnRecord) {
        if let Err(e) = self.store.update_tryon(record.id, &TryOnUpdate::Failed).await {
            tracing::error!(tryon_id = %record.id, error = %e, "Failed to mark try-on as failed");
        }
    }

    async fn run_generation(
        &self,
        record: &TryOnRecord,
        user_image: &str,
        clothing_image: &str,
    ) -> Result<String, String> {
        let user = images::decode_payload(user_image);
        let clothing = images::decode_payload(clothing_image);
        let (user, clothing) = match (user, clothing) {
            (Ok(user), Ok(clothing)) => (user, clothing),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(tryon_id = %record.id, error = %e, "Could not decode uploaded image");
                return Err("Failed to process uploaded images".to_string());
            }
        };
        tracing::debug!(
            tryon_id = %record.id,
            user_image = ?(user.width, user.height),
            clothing_image = ?(clothing.width, clothing.height),
            "Decoded uploaded images"
        );

        let request = GenerationRequest {
            prompt: build_prompt(&record.measurements, &record.style),
            params: self.params.clone(),
        };

        let start = Instant::now();
        let result = self.generator.generate(&request).await;
        metrics::histogram!("tryon_generation_seconds").record(start.elapsed().as_secs_f64());

        match result {
            Ok(url) if url.trim().is_empty() => {
                Err("Generation returned an empty image reference".to_string())
            }
            Ok(url) => Ok(url),
            Err(e) => Err(e.to_string()),
        }
    }

    pub async fn get(&self, id: &str) -> Result<TryOnRecord, TryOnError> {
        let uuid = Uuid::parse_str(id).map_err(|_| TryOnError::NotFound(id.to_string()))?;
        self.store
            .find_tryon(uuid)
            .await?
            .ok_or_else(|| TryOnError::NotFound(id.to_string()))
    }

    pub async fn get_artifact(&self, id: &str) -> Result<Artifact, TryOnError> {
        let record = self.get(id).await?;
        match record.tryon_image {
            Some(reference) if !reference.is_empty() => Ok(Artifact {
                id: record.id,
                reference,
            }),
            _ => Err(TryOnError::ArtifactUnavailable(record.id)),
        }
    }

    /// Newest first, at most `limit` records.
    pub async fn list_all(&self, limit: i64) -> Result<Vec<TryOnRecord>, TryOnError> {
        Ok(self.store.list_tryons(limit).await?)
    }
}

/// Describe the desired picture for the image model.
pub fn build_prompt(measurements: &Measurements, style: &str) -> String {
    format!(
        "Create a photorealistic virtual try-on image showing a person wearing the provided clothing item. \
         The person should match these measurements: height {}cm, weight {}kg, \
         chest {}cm, waist {}cm, hips {}cm. \
         Style preference: {}. \
         The clothing should fit naturally and realistically on the person's body. \
         Maintain the original person's appearance and facial features while showing them wearing the new outfit. \
         The final image should look natural, well-lit, and professional.",
        measurements.height,
        measurements.weight,
        measurements.chest,
        measurements.waist,
        measurements.hips,
        style
    )
}
