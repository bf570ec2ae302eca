use crate::{error::Result, models::AuditRecord};
use async_trait::async_trait;

/// Append-only destination for audit records, keyed by `AuditRecord::id`.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn put_record(&self, record: &AuditRecord) -> Result<()>;

    fn name(&self) -> &str;
}
