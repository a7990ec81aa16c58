pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};
pub use core::{
    etl::EtlEngine,
    pipeline::ReconcilePipeline,
    reconciler::{reconcile, Reconciler},
};
pub use domain::model::{Listing, Price, Product, ProductMatches};
pub use domain::policy::{CurrencyTable, MatchPolicy, UnknownCurrencyPolicy};
pub use domain::report::{ProductFailure, Reconciliation};
pub use utils::error::{ReconcileError, Result};
