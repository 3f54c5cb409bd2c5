use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vault_initialize::bootstrap::{self, Completion, Plan};
use vault_initialize::config::Settings;
use vault_initialize::shutdown::{self, ShutdownCoordinator};
use vault_initialize::vault::VaultClient;
use vault_initialize::Args;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    bootstrap::install_crypto_provider();
    info!("Starting vault-initialize");

    match run(&args).await {
        Ok(Completion::Persisted) => info!("Vault initialized, unsealed and material stored."),
        Ok(Completion::AlreadyInitialized) => info!("Nothing to do. Exiting."),
        Ok(Completion::Cancelled) => info!("Shutdown complete."),
        Err(err) => {
            error!("{err:#}");
            std::process::exit(1);
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<Completion> {
    let settings = load_settings(args)?;
    info!(
        vault_addr = %settings.vault_addr,
        check_interval = %humantime::format_duration(settings.check_interval),
        namespace = %settings.kube_namespace,
        "Loaded settings."
    );

    let vault = VaultClient::new(&settings.vault_addr, settings.request_timeout)?;
    let sinks = bootstrap::build_sinks(&settings).await?;
    let plan = Plan::from_settings(&settings);

    let (shutdown_tx, mut coordinator) = ShutdownCoordinator::channel();
    let listener = shutdown::spawn_signal_listener(shutdown_tx);
    let completion = bootstrap::run(&vault, &sinks, &plan, &mut coordinator).await;
    listener.abort();
    Ok(completion?)
}

fn load_settings(args: &Args) -> anyhow::Result<Settings> {
    let mut settings = Settings::new(args.config.as_deref())?;
    settings.merge_with_args(args);
    settings.validate()?;
    Ok(settings)
}
