use anyhow::Context;
use clap::Parser;
use listing_recon::core::jsonl::parse_bytes;
use listing_recon::core::{ConfigProvider, Storage};
use listing_recon::utils::{logger, validation::Validate};
use listing_recon::{EtlEngine, Listing, LocalStorage, Product, ReconcilePipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-reconcile")]
#[command(about = "Listing reconciliation driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "recon-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override ambiguity resolution from config
    #[arg(long)]
    resolve_ambiguity: Option<bool>,

    /// Override outlier filtering from config
    #[arg(long)]
    filter_outliers: Option<bool>,

    /// Dry run - read and summarize the inputs without matching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    // 初始化日誌
    let verbose = args.verbose || config.verbose();
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("🚀 Starting TOML-based reconciliation");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(resolve) = args.resolve_ambiguity {
        config.matching.resolve_ambiguity = resolve;
        tracing::info!("🔧 Ambiguity resolution overridden to: {}", resolve);
    }
    if let Some(filter) = args.filter_outliers {
        config.matching.filter_outliers = filter;
        tracing::info!("🔧 Outlier filtering overridden to: {}", filter);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config, &args);

    let storage = LocalStorage::new(config.input.data_dir.clone());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No matching will occur");
        perform_dry_run(&storage, &config).await?;
        return Ok(());
    }

    let pipeline = ReconcilePipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Reconciliation completed successfully!");
            println!("✅ Reconciliation completed successfully!");
            println!("📁 Results saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Reconciliation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let policy = &config.matching;

    println!("📋 Configuration Summary:");
    println!("  Pipeline: {}", config.pipeline.name);
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Data dir: {}", config.input.data_dir);
    println!("  Products: {}", config.products_path());
    println!("  Listings: {}", config.listings_path());
    println!("  Output: {}", config.output_path());
    println!("  Strip bonus text: {}", policy.strip_bonus_suffix);
    println!("  Resolve ambiguity: {}", policy.resolve_ambiguity);
    println!(
        "  Filter outliers: {} (mean / {})",
        policy.filter_outliers, policy.outlier_divisor
    );
    println!("  Keep decimal points: {}", policy.keep_decimal_points);
    println!("  Unknown currency: {:?}", policy.unknown_currency);

    let mut currencies: Vec<_> = policy.currencies.factors().iter().collect();
    currencies.sort_by(|a, b| a.0.cmp(b.0));
    let currencies: Vec<String> = currencies
        .into_iter()
        .map(|(code, factor)| format!("{}={}", code, factor))
        .collect();
    println!("  Currencies: {}", currencies.join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(storage: &LocalStorage, config: &TomlConfig) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");
    println!();

    let data = storage
        .read_file(config.products_path())
        .await
        .with_context(|| format!("Cannot read products from '{}'", config.products_path()))?;
    let products: Vec<Product> = parse_bytes(&data, "product", config.skip_malformed())?;

    let data = storage
        .read_file(config.listings_path())
        .await
        .with_context(|| format!("Cannot read listings from '{}'", config.listings_path()))?;
    let listings: Vec<Listing> = parse_bytes(&data, "listing", config.skip_malformed())?;

    let unknown_currency = listings
        .iter()
        .filter(|l| config.matching.currencies.factor(&l.currency).is_err())
        .count();

    println!("📦 Products: {}", products.len());
    println!("🏷️ Listings: {}", listings.len());
    if unknown_currency > 0 {
        println!("⚠️ Listings in unknown currencies: {}", unknown_currency);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
