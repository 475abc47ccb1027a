use crate::adapters::blob_storage::BlobStorage;
use crate::common::context::Context;
use crate::common::redis_pool::{PoolResult, RedisPool};
use async_trait::async_trait;
use sqlx::{MySql, Pool};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<MySql>,
    pub redis: RedisPool,
    pub blobs: Arc<dyn BlobStorage>,
}

#[async_trait]
impl Context for AppState {
    fn db(&self) -> &Pool<MySql> {
        &self.db
    }

    async fn redis(&self) -> PoolResult {
        self.redis.get().await
    }

    fn blobs(&self) -> &dyn BlobStorage {
        self.blobs.as_ref()
    }
}
