//! Inpainting/outpainting request handler for Amazon Titan Image Generator on
//! AWS Bedrock. Each request is translated into a Titan edit payload, invoked
//! synchronously, and audited to DynamoDB on a best-effort basis.

pub mod bedrock;
pub mod config;
pub mod error;
pub mod handler;
pub mod logger;
pub mod models;
#[cfg(feature = "server")]
pub mod server;
pub mod size;
pub mod storage;

pub use bedrock::{BedrockClient, ImageClient, ImageModel};
pub use config::{BedrockConfig, Config};
pub use error::{EditError, Result};
pub use handler::EditHandler;
pub use models::*;
pub use storage::{AuditLogger, AuditStore, DynamoAuditStore};
