use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting reconciliation...");
        let started = Instant::now();

        // Extract
        tracing::info!("📥 Reading products and listings...");
        let batch = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Read {} products and {} listings in {:?}",
            batch.products.len(),
            batch.listings.len(),
            started.elapsed()
        );

        // Transform
        let phase = Instant::now();
        tracing::info!("🔗 Matching listings to products...");
        let reconciliation = self.pipeline.transform(batch).await?;
        tracing::info!(
            "🔗 Produced {} results in {:?}",
            reconciliation.results.len(),
            phase.elapsed()
        );

        // Load
        let phase = Instant::now();
        tracing::info!("💾 Writing results...");
        let output_path = self.pipeline.load(reconciliation).await?;
        tracing::info!("💾 Output saved to: {} ({:?})", output_path, phase.elapsed());

        tracing::info!("Total time: {:?}", started.elapsed());
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Batch, Listing, Product, ProductMatches, Reconciliation};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct RecordingPipeline {
        phases: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl Pipeline for RecordingPipeline {
        async fn extract(&self) -> Result<Batch> {
            self.phases.lock().unwrap().push("extract");
            Ok(Batch {
                products: vec![Product {
                    product_name: "Alpha Cam".to_string(),
                    manufacturer: "Acme".to_string(),
                    model: "X100".to_string(),
                    family: None,
                    announced_date: None,
                }],
                listings: Vec::<Listing>::new(),
            })
        }

        async fn transform(&self, batch: Batch) -> Result<Reconciliation> {
            self.phases.lock().unwrap().push("transform");
            Ok(Reconciliation {
                results: batch
                    .products
                    .into_iter()
                    .map(|p| ProductMatches {
                        product_name: p.product_name,
                        listings: vec![],
                    })
                    .collect(),
                failures: vec![],
            })
        }

        async fn load(&self, result: Reconciliation) -> Result<String> {
            self.phases.lock().unwrap().push("load");
            assert_eq!(result.results.len(), 1);
            Ok("results.txt".to_string())
        }
    }

    #[test]
    fn test_engine_runs_phases_in_order() {
        let phases = Arc::new(Mutex::new(Vec::new()));
        let engine = EtlEngine::new(RecordingPipeline {
            phases: phases.clone(),
        });

        let output = tokio_test::block_on(engine.run()).unwrap();
        assert_eq!(output, "results.txt");
        assert_eq!(*phases.lock().unwrap(), vec!["extract", "transform", "load"]);
    }
}
