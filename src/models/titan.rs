use super::request::{EditRequest, PaintingMode};
use serde::{Deserialize, Serialize};

pub const TITAN_IMAGE_MODEL_ID: &str = "amazon.titan-image-generator-v2:0";
pub const SEED_UPPER_BOUND: u32 = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationConfig {
    pub number_of_images: u32,
    pub quality: String,
    pub height: u32,
    pub width: u32,
    pub cfg_scale: f32,
    pub seed: u32,
}

impl ImageGenerationConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            number_of_images: 2,
            quality: "premium".to_string(),
            height: 1024,
            width: 1024,
            cfg_scale: 8.0,
            seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutPaintingMode {
    Default,
    Precise,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintingParams {
    pub image: String,
    pub text: String,
    pub mask_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_painting_mode: Option<OutPaintingMode>,
}

/// Body sent to `InvokeModel` for an inpainting or outpainting task. Exactly
/// one of the params blocks is set; `taskType` carries the request mode as
/// submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanEditRequest {
    pub task_type: String,
    pub image_generation_config: ImageGenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_painting_params: Option<PaintingParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_painting_params: Option<PaintingParams>,
}

impl TitanEditRequest {
    pub fn build(request: &EditRequest, seed: u32) -> Self {
        let out_painting_mode = match request.mode {
            PaintingMode::Outpainting => Some(OutPaintingMode::Default),
            PaintingMode::PreciseOutpaint => Some(OutPaintingMode::Precise),
            PaintingMode::Inpainting | PaintingMode::Other(_) => None,
        };

        let params = PaintingParams {
            image: request.base_image.clone(),
            text: request.prompt.clone(),
            mask_image: request.mask.clone(),
            out_painting_mode,
        };

        let (in_painting_params, out_painting_params) = if request.mode.is_outpainting() {
            (None, Some(params))
        } else {
            (Some(params), None)
        };

        Self {
            task_type: request.mode.as_str().to_string(),
            image_generation_config: ImageGenerationConfig::with_seed(seed),
            in_painting_params,
            out_painting_params,
        }
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitanImageResponse {
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
