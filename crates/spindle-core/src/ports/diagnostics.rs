//! StoreDiagnostics port - read-only info about the backing store instance.

use async_trait::async_trait;

use crate::domain::{Result, StoreInfo};

#[async_trait]
pub trait StoreDiagnostics: Send + Sync {
    async fn info(&self) -> Result<StoreInfo>;
}
