use clap::Parser;
use pulsar_feed::core::{ConfigProvider, Storage};
use pulsar_feed::utils::{logger, validation::Validate};
use pulsar_feed::{
    AtnfCatalogue, CliConfig, EtlEngine, FeedError, FetchConfig, LocalStorage, OutputTarget,
    PulsarPipeline, StdoutStorage,
};

// 單執行緒執行：查詢、轉換、寫出依序進行
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting pulsar-feed");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    // 載入並驗證配置
    let config = match args.load().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    display_config_summary(&config);

    let catalogue = match config.timeout() {
        Some(timeout) => AtnfCatalogue::with_timeout(
            &config.catalogue.endpoint,
            &config.catalogue.version,
            timeout,
        )
        .unwrap_or_else(|e| fail(&e)),
        None => AtnfCatalogue::new(&config.catalogue.endpoint, &config.catalogue.version),
    };

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be fetched or written");
        let url = catalogue
            .query_url(&config.catalogue_query())
            .unwrap_or_else(|e| fail(&e));
        tracing::info!("Query URL: {}", url);
        return Ok(());
    }

    let monitor_enabled = config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let result = match config.output() {
        OutputTarget::File(_) => {
            run(catalogue, LocalStorage::default(), config, monitor_enabled).await
        }
        OutputTarget::Stdout => run(catalogue, StdoutStorage, config, monitor_enabled).await,
    };

    match result {
        Ok(output_path) => {
            tracing::info!("✅ Pulsar refresh completed");
            tracing::info!("📁 Output saved to: {}", output_path);
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

async fn run<S: Storage>(
    catalogue: AtnfCatalogue,
    storage: S,
    config: FetchConfig,
    monitor_enabled: bool,
) -> pulsar_feed::Result<String> {
    let pipeline = PulsarPipeline::new(catalogue, storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);
    engine.run().await
}

fn display_config_summary(config: &FetchConfig) {
    let fields = config.fields();
    tracing::info!("📋 Policy: {}, limit: {}", config.policy(), config.limit());
    tracing::info!(
        "📋 Fields: {}",
        if fields.is_empty() {
            "catalogue defaults".to_string()
        } else {
            fields.join(",")
        }
    );
    tracing::info!(
        "📋 Condition: {}",
        config.condition().unwrap_or_else(|| "none".to_string())
    );
    tracing::info!(
        "📋 Output: {} ({:?})",
        config.output(),
        config.json_style()
    );
}

fn fail(e: &FeedError) -> ! {
    tracing::error!(
        "❌ Pulsar refresh failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code());
}
