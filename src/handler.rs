use crate::{
    bedrock::{decode_image_response, BedrockClient, ImageModel},
    config::Config,
    error::{EditError, Result},
    models::{
        AuditRecord, EditRequest, EditResponse, HandlerResponse, RequestEnvelope,
        TitanEditRequest, TitanImageResponse, SEED_UPPER_BOUND, TITAN_IMAGE_MODEL_ID,
        UNKNOWN_MODEL_ID,
    },
    size::{estimate_decoded_size, total_decoded_size},
    storage::{AuditLogger, AuditStore, DynamoAuditStore},
};
use rand::Rng;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

const JSON_CONTENT_TYPE: &str = "application/json";

pub fn random_seed() -> u32 {
    rand::thread_rng().gen_range(0..SEED_UPPER_BOUND)
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}

/// Handles one inpainting/outpainting request end to end: parse, validate,
/// translate, invoke the image model, write the audit record, respond.
#[derive(Clone)]
pub struct EditHandler {
    model: Arc<dyn ImageModel>,
    audit: AuditLogger,
}

impl EditHandler {
    pub fn new(model: Arc<dyn ImageModel>, audit_store: Arc<dyn AuditStore>) -> Self {
        Self {
            model,
            audit: AuditLogger::new(audit_store),
        }
    }

    /// Builds a handler on the process-wide Bedrock client, auditing to the
    /// configured DynamoDB table.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let client = BedrockClient::shared(&config.bedrock).await?;
        let store = DynamoAuditStore::new(client.sdk_config(), config.table_name.clone());

        log::info!("Audit records go to DynamoDB table {}", store.table_name());

        Ok(Self::new(
            Arc::new(client.image().clone()),
            Arc::new(store),
        ))
    }

    pub async fn handle(&self, envelope: RequestEnvelope) -> HandlerResponse {
        self.handle_with_seed(envelope, random_seed()).await
    }

    /// Same as [`EditHandler::handle`] with a caller-chosen generation seed.
    pub async fn handle_with_seed(&self, envelope: RequestEnvelope, seed: u32) -> HandlerResponse {
        self.handle_started_at(envelope, seed, Instant::now()).await
    }

    /// `started` marks the arrival of the request; failure timings are
    /// measured from it.
    pub(crate) async fn handle_started_at(
        &self,
        envelope: RequestEnvelope,
        seed: u32,
        started: Instant,
    ) -> HandlerResponse {
        let request_id = Uuid::new_v4().to_string();

        let request = match envelope
            .parse_body()
            .and_then(|body| EditRequest::from_body(&body))
        {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Rejected request {}: {}", request_id, e);
                return HandlerResponse::client_error(&e);
            }
        };

        let image_size = estimate_decoded_size(&request.base_image);
        let mask_size = estimate_decoded_size(&request.mask);

        log::info!(
            "Received request {}: mode={} model={} image={}B mask={}B",
            request_id,
            request.mode,
            request.model,
            image_size,
            mask_size
        );

        if !request.is_supported_model() {
            let error = EditError::UnsupportedModel(request.model.clone());
            let record = AuditRecord::new(
                &request_id,
                UNKNOWN_MODEL_ID,
                &request.prompt,
                request.mode.as_str(),
            )
            .with_input_sizes(image_size, mask_size)
            .with_generation_time(elapsed_ms(started))
            .failed(&error.to_string());

            self.audit.record(record).await;
            log::warn!("Rejected request {}: {}", request_id, error);
            return HandlerResponse::client_error(&error);
        }

        let payload = match TitanEditRequest::build(&request, seed).to_bytes() {
            Ok(payload) => payload,
            Err(e) => {
                let error = EditError::Preparation(e.to_string());
                log::error!("Request {}: {}", request_id, error);
                return HandlerResponse::client_error(&error);
            }
        };

        let record = AuditRecord::new(
            &request_id,
            TITAN_IMAGE_MODEL_ID,
            &request.prompt,
            request.mode.as_str(),
        )
        .with_input_sizes(image_size, mask_size);

        match self.generate(payload).await {
            Ok((response, generation_time_ms)) => {
                let output_size = total_decoded_size(response.images.as_deref());
                log::info!(
                    "Request {} generated {} image(s), {}B in {}ms",
                    request_id,
                    response.images.as_ref().map_or(0, Vec::len),
                    output_size,
                    generation_time_ms
                );

                self.audit
                    .record(
                        record
                            .with_output_size(output_size)
                            .with_generation_time(generation_time_ms),
                    )
                    .await;

                HandlerResponse::success(&EditResponse {
                    images: response.images,
                    model_used: request.model,
                    request_id,
                    generation_time_ms,
                })
            }
            Err(e) => {
                let generation_time_ms = elapsed_ms(started);
                log::error!("Request {} failed: {}", request_id, e);

                self.audit
                    .record(
                        record
                            .with_generation_time(generation_time_ms)
                            .failed(&e.to_string()),
                    )
                    .await;

                HandlerResponse::server_error(&e, &request_id)
            }
        }
    }

    /// Invokes the model and decodes its reply. The returned duration covers
    /// the invocation only.
    async fn generate(&self, payload: Vec<u8>) -> Result<(TitanImageResponse, u64)> {
        let invoke_started = Instant::now();
        let body = self
            .model
            .invoke(
                TITAN_IMAGE_MODEL_ID,
                payload,
                JSON_CONTENT_TYPE,
                JSON_CONTENT_TYPE,
            )
            .await?;
        let generation_time_ms = elapsed_ms(invoke_started);

        Ok((decode_image_response(&body)?, generation_time_ms))
    }
}
