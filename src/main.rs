use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();
    info!("Starting pod cluster simulator");

    pod_cluster_sim::cli::run().await
}
