use super::ImageModel;
use crate::{
    error::{EditError, Result},
    models::TitanImageResponse,
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
}

impl ImageClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageModel for ImageClient {
    async fn invoke(
        &self,
        model_id: &str,
        payload: Vec<u8>,
        content_type: &str,
        accept: &str,
    ) -> Result<Vec<u8>> {
        log::info!("Invoking image model: {}", model_id);

        let response = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type(content_type)
            .accept(accept)
            .body(Blob::new(payload))
            .send()
            .await
            .map_err(|e| {
                log::error!("Bedrock image invocation failed: {:?}", e);

                if let Some(service_error) = e.as_service_error() {
                    EditError::ServiceError(format!(
                        "Bedrock service error: {} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    EditError::Invocation(format!("AWS SDK error: {}", e))
                }
            })?;

        Ok(response.body.into_inner())
    }
}

/// Decodes an image-generation response body. A body without `images` is not
/// an error.
pub fn decode_image_response(body: &[u8]) -> Result<TitanImageResponse> {
    serde_json::from_slice(body).map_err(|e| EditError::Response(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_images() {
        let response = decode_image_response(br#"{"images":["YQ==","YmM="]}"#).unwrap();
        assert_eq!(response.images, Some(vec!["YQ==".into(), "YmM=".into()]));
    }

    #[test]
    fn test_decode_missing_images() {
        let response = decode_image_response(br#"{"error":null}"#).unwrap();
        assert!(response.images.is_none());
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_image_response(b"<html>").unwrap_err();
        assert!(matches!(err, EditError::Response(_)));
        assert_eq!(err.status_code(), 500);
    }
}
