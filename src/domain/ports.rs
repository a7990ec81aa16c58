use crate::domain::model::{Listing, Product};
use crate::domain::policy::MatchPolicy;
use crate::domain::report::Reconciliation;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn products_path(&self) -> &str;
    fn listings_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn skip_malformed(&self) -> bool;
    fn policy(&self) -> MatchPolicy;
}

/// Both input sequences, fully materialized.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub products: Vec<Product>,
    pub listings: Vec<Listing>,
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Batch>;
    async fn transform(&self, batch: Batch) -> Result<Reconciliation>;
    async fn load(&self, result: Reconciliation) -> Result<String>;
}
