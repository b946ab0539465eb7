//! gardener-syncer binary

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gardener_syncer::client::{KubeConfigMapClient, KubeSeedLister};
use gardener_syncer::config::Config;
use gardener_syncer::fetch::SeedFetcher;
use gardener_syncer::store::ConfigMapStore;
use gardener_syncer::sync::sync;
use gardener_syncer::Result;
use gardener_syncer_common::kube_utils::create_client_with_timeout;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match Config::from_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level().as_directive())),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    config.log();
    info!("application started");

    if let Err(err) = run(&config).await {
        error!(stage = err.stage(), error = %err, "application failed");
        std::process::exit(1);
    }
}

async fn run(config: &Config) -> Result<()> {
    let kcp_timeout = config.kcp_timeout()?;
    let gardener_timeout = config.gardener_timeout()?;

    let kcp = create_client_with_timeout(
        "kcp",
        config.kcp_kubeconfig_path.as_deref(),
        kcp_timeout,
        kcp_timeout,
    )
    .await?;
    let gardener = create_client_with_timeout(
        "gardener",
        Some(config.gardener_kubeconfig()),
        gardener_timeout,
        gardener_timeout,
    )
    .await?;

    let fetcher = SeedFetcher::new(KubeSeedLister::new(gardener), gardener_timeout);
    let store = ConfigMapStore::new(
        KubeConfigMapClient::new(kcp),
        config.seed_map_key(),
        kcp_timeout,
    );

    sync(&fetcher, &store).await
}
