use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_PROMPT_CHARS: usize = 1000;
pub const MAX_ERROR_CHARS: usize = 500;
pub const UNKNOWN_MODEL_ID: &str = "unknown";

/// One row in the audit table per handled request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: String,
    pub timestamp: String,
    pub model_id: String,
    pub prompt: String,
    pub mode: String,
    #[serde(rename = "image_base64_size_bytes")]
    pub image_size_bytes: u64,
    #[serde(rename = "mask_base64_size_bytes")]
    pub mask_size_bytes: u64,
    #[serde(rename = "output_images_size_bytes")]
    pub output_size_bytes: u64,
    pub generation_time_ms: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AuditRecord {
    pub fn new(
        request_id: impl Into<String>,
        model_id: impl Into<String>,
        prompt: &str,
        mode: impl Into<String>,
    ) -> Self {
        Self {
            id: request_id.into(),
            timestamp: format_timestamp(Utc::now().naive_utc()),
            model_id: model_id.into(),
            prompt: truncate_chars(prompt, MAX_PROMPT_CHARS),
            mode: mode.into(),
            image_size_bytes: 0,
            mask_size_bytes: 0,
            output_size_bytes: 0,
            generation_time_ms: 0,
            success: true,
            error_message: None,
        }
    }

    pub fn with_input_sizes(mut self, image_size_bytes: u64, mask_size_bytes: u64) -> Self {
        self.image_size_bytes = image_size_bytes;
        self.mask_size_bytes = mask_size_bytes;
        self
    }

    pub fn with_output_size(mut self, output_size_bytes: u64) -> Self {
        self.output_size_bytes = output_size_bytes;
        self
    }

    pub fn with_generation_time(mut self, generation_time_ms: u64) -> Self {
        self.generation_time_ms = generation_time_ms;
        self
    }

    /// Marks the record failed. Empty messages are not stored.
    pub fn failed(mut self, error_message: &str) -> Self {
        self.success = false;
        self.error_message = if error_message.is_empty() {
            None
        } else {
            Some(truncate_chars(error_message, MAX_ERROR_CHARS))
        };
        self
    }
}

fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_prompt_truncated() {
        let prompt = "é".repeat(1500);
        let record = AuditRecord::new("id", "m", &prompt, "INPAINTING");
        assert_eq!(record.prompt.chars().count(), 1000);
        assert!(record.success);
        assert!(record.error_message.is_none());
    }

    #[test]
    fn test_failed_truncates_error() {
        let record = AuditRecord::new("id", "unknown", "p", "OUTPAINTING").failed(&"x".repeat(600));
        assert!(!record.success);
        assert_eq!(record.error_message.unwrap().len(), 500);
    }

    #[test]
    fn test_empty_error_not_stored() {
        let record = AuditRecord::new("id", "m", "p", "m").failed("");
        assert!(!record.success);
        assert!(record.error_message.is_none());
    }

    #[test]
    fn test_serialized_field_names() {
        let record = AuditRecord::new("id", "m", "p", "INPAINTING")
            .with_input_sizes(10, 20)
            .with_output_size(30)
            .with_generation_time(40);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["image_base64_size_bytes"], 10);
        assert_eq!(value["mask_base64_size_bytes"], 20);
        assert_eq!(value["output_images_size_bytes"], 30);
        assert_eq!(value["generation_time_ms"], 40);
        assert!(value.get("error_message").is_none());
    }

    #[test]
    fn test_timestamp_format() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(7, 5, 1, 42)
            .unwrap();
        assert_eq!(format_timestamp(at), "2024-03-09T07:05:01.000042");
    }
}
