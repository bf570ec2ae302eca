pub mod image_client;

use crate::{config::BedrockConfig, error::Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_bedrockruntime::{
    config::{Credentials, Region},
    Client,
};
use tokio::sync::OnceCell;

pub use image_client::{decode_image_response, ImageClient};

/// Synchronous request/response invocation of a hosted model.
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Sends `payload` to `model_id` and returns the raw response body.
    async fn invoke(
        &self,
        model_id: &str,
        payload: Vec<u8>,
        content_type: &str,
        accept: &str,
    ) -> Result<Vec<u8>>;
}

static SHARED_CLIENT: OnceCell<BedrockClient> = OnceCell::const_new();

/// Loads the AWS SDK configuration. Explicit credentials take precedence over
/// the default provider chain.
pub async fn load_sdk_config(config: &BedrockConfig) -> SdkConfig {
    let loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region_or_default()));

    let loader = if let (Some(access_key), Some(secret_key)) =
        (&config.access_key, &config.secret_key)
    {
        loader.credentials_provider(Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "bedrock-edit",
        ))
    } else {
        loader
    };

    loader.load().await
}

#[derive(Clone)]
pub struct BedrockClient {
    sdk_config: SdkConfig,
    image_client: ImageClient,
}

impl BedrockClient {
    pub async fn new(bedrock_config: BedrockConfig) -> Result<Self> {
        let sdk_config = load_sdk_config(&bedrock_config).await;
        let client = Client::new(&sdk_config);

        log::info!(
            "Bedrock client initialized for region {}",
            bedrock_config.region_or_default()
        );

        Ok(Self {
            sdk_config,
            image_client: ImageClient::new(client),
        })
    }

    /// Process-wide client, created on first use and reused afterwards. The
    /// config passed on later calls is ignored.
    pub async fn shared(bedrock_config: &BedrockConfig) -> Result<&'static BedrockClient> {
        SHARED_CLIENT
            .get_or_try_init(|| Self::new(bedrock_config.clone()))
            .await
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn sdk_config(&self) -> &SdkConfig {
        &self.sdk_config
    }
}
