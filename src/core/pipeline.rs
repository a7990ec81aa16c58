use crate::core::jsonl::{parse_bytes, write_records};
use crate::core::reconciler::Reconciler;
use crate::core::{Batch, ConfigProvider, Listing, Pipeline, Product, Reconciliation, Storage};
use crate::utils::error::{ReconcileError, Result};

pub struct ReconcilePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ReconcilePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ReconcilePipeline<S, C> {
    async fn extract(&self) -> Result<Batch> {
        let skip = self.config.skip_malformed();

        tracing::debug!("Reading products from: {}", self.config.products_path());
        let data = self.storage.read_file(self.config.products_path()).await?;
        let products: Vec<Product> = parse_bytes(&data, "product", skip)?;

        tracing::debug!("Reading listings from: {}", self.config.listings_path());
        let data = self.storage.read_file(self.config.listings_path()).await?;
        let listings: Vec<Listing> = parse_bytes(&data, "listing", skip)?;

        Ok(Batch { products, listings })
    }

    async fn transform(&self, batch: Batch) -> Result<Reconciliation> {
        let reconciler = Reconciler::new(self.config.policy());

        // 比對為 CPU 密集工作，移出 async runtime
        tokio::task::spawn_blocking(move || {
            reconciler.reconcile_with_report(&batch.products, &batch.listings)
        })
        .await
        .map_err(|e| ReconcileError::ProcessingError {
            message: format!("matching task failed: {}", e),
        })
    }

    async fn load(&self, result: Reconciliation) -> Result<String> {
        for failure in &result.failures {
            tracing::warn!(
                "⚠️ No result written for '{}': {} ({})",
                failure.product_name,
                failure.error,
                failure.error.recovery_suggestion()
            );
        }

        let output = write_records(&result.results)?;
        tracing::debug!(
            "Writing {} results ({} bytes) to storage",
            result.results.len(),
            output.len()
        );
        self.storage
            .write_file(self.config.output_path(), output.as_bytes())
            .await?;

        Ok(self.config.output_path().to_string())
    }
}
