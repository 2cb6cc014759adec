use noteful::config::Args;
use noteful::routes;
use noteful::store::Store;
use noteful::types::seed::SeedData;
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), handle_errors::Error> {
    dotenv::dotenv().ok();
    let config = Args::load()?;

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!(
            "handle_errors={},noteful={},warp={}",
            config.log_level, config.log_level, config.log_level
        )
    });

    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let store = Store::connect(&config).await?;

    if let Some(path) = &config.seed_file {
        let data = SeedData::from_file(path)?;
        info!(
            "seeding {} folders, {} tags, {} notes from {}",
            data.folders.len(),
            data.tags.len(),
            data.notes.len(),
            path
        );
        store.seed(data).await?;
    }

    let routes = routes::build(store.clone());

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], config.port), async {
            tokio::signal::ctrl_c().await.ok();
        });
    info!("listening on {}", addr);
    server.await;

    store.close().await;
    info!("store closed");
    Ok(())
}
