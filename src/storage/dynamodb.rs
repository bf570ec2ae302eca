use crate::{
    error::{EditError, Result},
    models::AuditRecord,
    storage::traits::AuditStore,
};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::{error::ProvideErrorMetadata, types::AttributeValue, Client};
use std::collections::HashMap;

pub struct DynamoAuditStore {
    client: Client,
    table_name: String,
}

impl DynamoAuditStore {
    pub fn new(sdk_config: &SdkConfig, table_name: impl Into<String>) -> Self {
        Self::from_client(Client::new(sdk_config), table_name)
    }

    pub fn from_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

/// Maps a record onto DynamoDB attributes. `error_message` is omitted when
/// unset.
pub fn to_item(record: &AuditRecord) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::from([
        ("id".to_string(), AttributeValue::S(record.id.clone())),
        (
            "timestamp".to_string(),
            AttributeValue::S(record.timestamp.clone()),
        ),
        (
            "model_id".to_string(),
            AttributeValue::S(record.model_id.clone()),
        ),
        ("prompt".to_string(), AttributeValue::S(record.prompt.clone())),
        ("mode".to_string(), AttributeValue::S(record.mode.clone())),
        (
            "image_base64_size_bytes".to_string(),
            AttributeValue::N(record.image_size_bytes.to_string()),
        ),
        (
            "mask_base64_size_bytes".to_string(),
            AttributeValue::N(record.mask_size_bytes.to_string()),
        ),
        (
            "output_images_size_bytes".to_string(),
            AttributeValue::N(record.output_size_bytes.to_string()),
        ),
        (
            "generation_time_ms".to_string(),
            AttributeValue::N(record.generation_time_ms.to_string()),
        ),
        ("success".to_string(), AttributeValue::Bool(record.success)),
    ]);

    if let Some(error_message) = &record.error_message {
        item.insert(
            "error_message".to_string(),
            AttributeValue::S(error_message.clone()),
        );
    }

    item
}

#[async_trait]
impl AuditStore for DynamoAuditStore {
    async fn put_record(&self, record: &AuditRecord) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_item(record)))
            .send()
            .await
            .map_err(|e| {
                if let Some(service_error) = e.as_service_error() {
                    EditError::AuditStore(format!(
                        "DynamoDB service error: {} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    EditError::AuditStore(format!("AWS SDK error: {}", e))
                }
            })?;

        log::debug!("Audit record {} written to {}", record.id, self.table_name);
        Ok(())
    }

    fn name(&self) -> &str {
        "dynamodb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_attributes() {
        let record = AuditRecord::new("req-1", "amazon.titan-image-generator-v2:0", "p", "INPAINTING")
            .with_input_sizes(3, 4)
            .with_output_size(5)
            .with_generation_time(6);
        let item = to_item(&record);

        assert_eq!(item["id"], AttributeValue::S("req-1".into()));
        assert_eq!(item["image_base64_size_bytes"], AttributeValue::N("3".into()));
        assert_eq!(item["mask_base64_size_bytes"], AttributeValue::N("4".into()));
        assert_eq!(item["output_images_size_bytes"], AttributeValue::N("5".into()));
        assert_eq!(item["generation_time_ms"], AttributeValue::N("6".into()));
        assert_eq!(item["success"], AttributeValue::Bool(true));
        assert!(!item.contains_key("error_message"));
    }

    #[test]
    fn test_item_with_error() {
        let record = AuditRecord::new("req-2", "unknown", "p", "OUTPAINTING")
            .failed("Unsupported model: sdxl");
        let item = to_item(&record);

        assert_eq!(item["model_id"], AttributeValue::S("unknown".into()));
        assert_eq!(item["success"], AttributeValue::Bool(false));
        assert_eq!(
            item["error_message"],
            AttributeValue::S("Unsupported model: sdxl".into())
        );
    }
}
