use crate::{
    error::{EditError, Result},
    size::strip_data_uri,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const DEFAULT_MODEL: &str = "titan";

/// Incoming invocation, shaped like an API-gateway proxy event. Only `body`
/// is read; it may be a JSON string or an already-decoded object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub body: Option<Value>,
}

impl RequestEnvelope {
    pub fn new(body: Value) -> Self {
        Self { body: Some(body) }
    }

    pub fn empty() -> Self {
        Self { body: None }
    }

    /// Wraps a raw HTTP body. An empty body counts as missing; a body that is
    /// not valid UTF-8 is rejected.
    pub fn from_raw_body(raw: &[u8]) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self::empty());
        }
        let text = String::from_utf8(raw.to_vec())
            .map_err(|e| EditError::InvalidBody(e.to_string()))?;
        Ok(Self::new(Value::String(text)))
    }

    /// Returns the decoded JSON body.
    pub fn parse_body(&self) -> Result<Value> {
        match &self.body {
            None | Some(Value::Null) => Err(EditError::MissingBody),
            Some(Value::String(raw)) => {
                serde_json::from_str(raw).map_err(|e| EditError::InvalidBody(e.to_string()))
            }
            Some(value @ Value::Object(_)) => Ok(value.clone()),
            Some(other) => Err(EditError::InvalidBody(format!(
                "expected a JSON object or string, got {}",
                json_kind(other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintingMode {
    Inpainting,
    Outpainting,
    PreciseOutpaint,
    /// Any unrecognised mode; handled as inpainting.
    Other(String),
}

impl PaintingMode {
    /// Matching is exact: only `"OUTPAINTING"` and `"precise-outpaint"` select
    /// outpainting.
    pub fn parse(mode: &str) -> Self {
        match mode {
            "INPAINTING" => PaintingMode::Inpainting,
            "OUTPAINTING" => PaintingMode::Outpainting,
            "precise-outpaint" => PaintingMode::PreciseOutpaint,
            other => PaintingMode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaintingMode::Inpainting => "INPAINTING",
            PaintingMode::Outpainting => "OUTPAINTING",
            PaintingMode::PreciseOutpaint => "precise-outpaint",
            PaintingMode::Other(mode) => mode,
        }
    }

    pub fn is_outpainting(&self) -> bool {
        matches!(
            self,
            PaintingMode::Outpainting | PaintingMode::PreciseOutpaint
        )
    }
}

impl fmt::Display for PaintingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated edit request. Base64 fields have any data-URI prefix removed.
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub prompt: String,
    pub mode: PaintingMode,
    pub base_image: String,
    pub mask: String,
    /// Lower-cased model name; defaults to `"titan"`.
    pub model: String,
}

impl EditRequest {
    pub fn from_body(body: &Value) -> Result<Self> {
        let prompt = body.get("prompt");
        let prompt_text = required_str(prompt.and_then(|p| p.get("text")), "prompt.text")?;
        let mode = required_str(prompt.and_then(|p| p.get("mode")), "prompt.mode")?;
        let mask = required_str(body.get("mask"), "mask")?;
        let base_image = required_str(body.get("base_image"), "base_image")?;

        let model = match body.get("model") {
            None | Some(Value::Null) => DEFAULT_MODEL.to_string(),
            Some(Value::String(model)) => model.to_lowercase(),
            Some(_) => return Err(EditError::MissingField("model".into())),
        };

        Ok(Self {
            prompt: prompt_text.to_string(),
            mode: PaintingMode::parse(mode),
            base_image: strip_data_uri(base_image).to_string(),
            mask: strip_data_uri(mask).to_string(),
            model,
        })
    }

    pub fn is_supported_model(&self) -> bool {
        self.model == DEFAULT_MODEL
    }
}

fn required_str<'a>(value: Option<&'a Value>, field: &str) -> Result<&'a str> {
    value
        .and_then(Value::as_str)
        .ok_or_else(|| EditError::MissingField(field.to_string()))
}
