use anyhow::Context;
use catalog_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    let logger = Logger::stdout(&LoggingSettings::from_config(&config));
    logger
        .install_global()
        .context("installing log dispatcher")?;
    tracing::info!("Tracing initialized for service: {}", config.service.name);

    let seed = match &config.storage.seed_path {
        Some(path) => {
            tracing::info!("Loading seed data from {}", path.display());
            SeedData::load(path)
                .with_context(|| format!("loading seed data from {}", path.display()))?
        }
        None => SeedData::default(),
    };
    tracing::info!(
        categories = seed.categories.len(),
        products = seed.products.len(),
        "Seeded in-memory repositories"
    );

    let categories = MemoryRepository::with_records("Category", seed.categories)
        .context("seeding categories")?;
    let products = MemoryRepository::with_records("Product", seed.products)
        .context("seeding products")?;

    let state = AppState::new(&config, &logger, categories, products);

    Server::new(config).serve(router(state)).await?;

    Ok(())
}
