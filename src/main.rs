use clap::Parser;
use taskprice::config::credential_store::mask_credential;
use taskprice::config::{Command, EstimateArgs, KeyAction, LogFormat};
use taskprice::utils::{format::format_rupiah, logger, validation::Validate};
use taskprice::{
    CliConfig, CredentialProvider, FileCredentialStore, GeminiEstimator, PriceAdjustmentSession,
    PricingConfig, PricingOrchestrator, RequestDescriptor, Result,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::debug!("CLI config: {:?}", cli.command);

    if let Err(e) = run(cli).await {
        tracing::error!("❌ taskprice failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    let config = match cli.config.as_deref() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            PricingConfig::from_file(path)?
        }
        None => PricingConfig::default(),
    };
    config.validate()?;

    let mut store = FileCredentialStore::new(&config.credentials.store_path);
    if let Some(key) = &config.credentials.default_api_key {
        store = store.with_default(key.clone());
    }

    match cli.command {
        Command::Estimate(args) => run_estimate(&config, store, &args).await,
        Command::Key { action } => run_key(&store, action).await,
    }
}

async fn run_estimate(
    config: &PricingConfig,
    store: FileCredentialStore,
    args: &EstimateArgs,
) -> Result<()> {
    let request = args.to_request()?;

    let orchestrator = if args.offline || !config.remote.enabled {
        PricingOrchestrator::<GeminiEstimator, _>::offline(store)
    } else {
        let remote = GeminiEstimator::new(&config.remote, config.generation.clone())?;
        PricingOrchestrator::new(remote, store).with_timeout(config.remote.timeout())
    };

    let estimate = orchestrator.estimate(&request).await;
    let mut session = PriceAdjustmentSession::new(estimate);
    for delta in &args.adjust {
        session.adjust(*delta);
    }

    if args.json {
        let output = serde_json::json!({
            "estimate": session.estimate(),
            "finalPrice": session.current_price(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&request, &session);
    }

    session.commit();
    Ok(())
}

fn print_summary(request: &RequestDescriptor, session: &PriceAdjustmentSession) {
    println!("Request: {}", request.title());
    if !request.description().is_empty() {
        println!("  {}", request.description());
    }
    println!(
        "  {} orang • {}",
        request.people_needed(),
        request.urgency()
    );
    println!();
    println!("Rincian Harga:");
    for item in session.breakdown().items() {
        println!("  {:<24}{:>14}", item.label, format_rupiah(item.amount));
    }
    println!(
        "  {:<24}{:>14}",
        "Total",
        format_rupiah(session.recommended_price())
    );
    println!();
    println!(
        "Harga final: {}  (source: {:?})",
        format_rupiah(session.current_price()),
        session.estimate().source
    );
}

async fn run_key(store: &FileCredentialStore, action: KeyAction) -> Result<()> {
    match action {
        KeyAction::Set { value } => {
            store.set(value.trim()).await?;
            println!("✅ API key saved to {}", store.path().display());
        }
        KeyAction::Clear => {
            store.delete().await?;
            println!("✅ API key removed");
        }
        KeyAction::Status => match store.get().await? {
            Some(key) => println!("🔑 API key stored: {}", mask_credential(&key)),
            None if store.default_credential().is_empty() => {
                println!("⚠️  No API key stored, prices come from the heuristic")
            }
            None => println!("🔑 No API key stored, using the default key"),
        },
    }
    Ok(())
}
