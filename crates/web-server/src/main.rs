use tracing_subscriber::EnvFilter;

// This main function is the entry point when running `cargo run -p web-server`.
// It loads the configuration and hands over to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    web_server::run_server(&config).await
}
