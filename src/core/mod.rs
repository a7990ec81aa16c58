pub mod ambiguity;
pub mod etl;
pub mod jsonl;
pub mod label;
pub mod outlier;
pub mod pipeline;
pub mod product_matcher;
pub mod reconciler;

pub use crate::domain::model::{Listing, Price, Product, ProductMatches};
pub use crate::domain::policy::MatchPolicy;
pub use crate::domain::ports::{Batch, ConfigProvider, Pipeline, Storage};
pub use crate::domain::report::Reconciliation;
pub use crate::utils::error::Result;
