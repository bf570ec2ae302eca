pub mod dynamodb;
pub mod traits;

use crate::models::AuditRecord;
use std::sync::Arc;

pub use dynamodb::DynamoAuditStore;
pub use traits::AuditStore;

/// Best-effort audit writer. Store failures go to the error log and are
/// never returned to the caller.
#[derive(Clone)]
pub struct AuditLogger {
    backend: Arc<dyn AuditStore>,
}

impl AuditLogger {
    pub fn new(backend: Arc<dyn AuditStore>) -> Self {
        Self { backend }
    }

    /// Returns whether the record was stored.
    pub async fn record(&self, record: AuditRecord) -> bool {
        match self.backend.put_record(&record).await {
            Ok(()) => true,
            Err(e) => {
                log::error!(
                    "Failed to log to {} (request {}): {}",
                    self.backend.name(),
                    record.id,
                    e
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EditError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FlakyStore {
        fail: bool,
        written: Mutex<Vec<AuditRecord>>,
    }

    #[async_trait]
    impl AuditStore for FlakyStore {
        async fn put_record(&self, record: &AuditRecord) -> Result<()> {
            if self.fail {
                return Err(EditError::AuditStore("table not found".into()));
            }
            self.written.lock().unwrap().push(record.clone());
            Ok(())
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    #[tokio::test]
    async fn test_record_written() {
        let store = Arc::new(FlakyStore {
            fail: false,
            written: Mutex::new(Vec::new()),
        });
        let logger = AuditLogger::new(store.clone());

        assert!(logger.record(AuditRecord::new("a", "m", "p", "INPAINTING")).await);
        assert_eq!(store.written.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_swallowed() {
        let store = Arc::new(FlakyStore {
            fail: true,
            written: Mutex::new(Vec::new()),
        });
        let logger = AuditLogger::new(store);

        assert!(!logger.record(AuditRecord::new("b", "m", "p", "INPAINTING")).await);
    }
}
